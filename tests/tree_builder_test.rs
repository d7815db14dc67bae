//! Tests for level resolution and hierarchy building over a realistic dataset

use std::path::Path;

use rstest::rstest;

use cohort::application::services::{parse_dataset, DatasetFormat};
use cohort::domain::{
    build_hierarchy, build_levels, AttributePath, Hierarchy, Record, TreeNode, Value,
    DEFAULT_PLACEHOLDER,
};
use cohort::util::testing::{init_test_setup, STROKE_SAMPLE};

fn stroke_records() -> Vec<Record> {
    parse_dataset(STROKE_SAMPLE, Path::new("stroke.csv"), &DatasetFormat::default())
        .expect("parse sample")
        .records
}

fn hierarchy(attrs: &[&str]) -> Hierarchy {
    let path = AttributePath::parse(attrs.iter().copied(), DEFAULT_PLACEHOLDER);
    build_hierarchy(&stroke_records(), &path, "stroke")
}

fn assert_partitions(node: &TreeNode) {
    assert_eq!(node.value, node.points.len(), "value of {}", node.label());
    if let Some(children) = &node.children {
        let sum: usize = children.iter().map(|c| c.value).sum();
        assert_eq!(sum, node.value, "children of {}", node.label());
        children.iter().for_each(assert_partitions);
    }
}

fn all_nodes(nodes: &[TreeNode]) -> Vec<&TreeNode> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node);
        out.extend(all_nodes(node.children()));
    }
    out
}

#[rstest]
#[case(&["gender"])]
#[case(&["gender", "hypertension"])]
#[case(&["work_type", "Residence_type", "stroke"])]
#[case(&["gender", "_placeholder", "smoking_status"])]
fn given_complete_field_when_building_then_root_partitions_dataset(#[case] attrs: &[&str]) {
    init_test_setup();
    // Arrange / Act
    let hierarchy = hierarchy(attrs);

    // Assert
    let sum: usize = hierarchy.children.iter().map(|c| c.value).sum();
    assert_eq!(sum, 10);
    assert_eq!(hierarchy.value, 10);
    hierarchy.children.iter().for_each(assert_partitions);
}

#[test]
fn given_field_with_missing_cells_when_building_then_missing_forms_its_own_group() {
    let hierarchy = hierarchy(&["bmi"]);

    let missing: Vec<_> = hierarchy
        .children
        .iter()
        .filter(|c| c.name.is_missing())
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].value, 1);
    // missing sorts after every present value
    assert!(hierarchy.children.last().map(|c| c.name.is_missing()).unwrap_or(false));
}

#[test]
fn given_same_inputs_when_building_twice_then_trees_are_identical() {
    let first = hierarchy(&["smoking_status", "gender"]);
    let second = hierarchy(&["smoking_status", "gender"]);
    assert_eq!(first, second);
}

#[test]
fn given_leading_placeholder_when_building_levels_then_first_real_attribute_is_used() {
    let path = AttributePath::parse(["_placeholder", "gender"], DEFAULT_PLACEHOLDER);
    let levels = build_levels(&stroke_records(), &path, "stroke");

    assert_eq!(levels.len(), 2);
    assert!(levels[0].iter().all(|e| e.attr == "gender"));
    assert!(levels[1].iter().all(|e| e.attr == "gender"));
}

#[test]
fn given_trailing_placeholder_when_building_levels_then_previous_attribute_repeats() {
    let path = AttributePath::parse(["gender", "ever_married", "_placeholder"], DEFAULT_PLACEHOLDER);
    let levels = build_levels(&stroke_records(), &path, "stroke");

    let attrs: Vec<&str> = levels
        .iter()
        .map(|l| l.first().map(|e| e.attr.as_str()).unwrap_or(""))
        .collect();
    assert_eq!(attrs, vec!["gender", "ever_married", "ever_married"]);
}

#[test]
fn given_value_absent_from_data_when_building_then_no_node_carries_it() {
    let hierarchy = hierarchy(&["ever_married", "smoking_status"]);

    let nodes = all_nodes(&hierarchy.children);
    // the only never-married record has never smoked
    let never_married = hierarchy
        .children
        .iter()
        .find(|c| c.name == Value::from("No"))
        .expect("never married group");
    assert_eq!(never_married.children().len(), 1);
    assert!(nodes.iter().all(|n| n.name != Value::from("90+")));
    assert!(nodes.iter().all(|n| n.value > 0));
}

#[rstest]
#[case(&[])]
#[case(&["_placeholder"])]
#[case(&["_placeholder", "_placeholder"])]
fn given_path_without_real_attribute_when_building_then_groups_by_outcome(#[case] attrs: &[&str]) {
    let hierarchy = hierarchy(attrs);

    assert_eq!(hierarchy.depth(), 1);
    assert!(hierarchy.children.iter().all(|c| c.attr == "stroke"));
    // first appearance order: the sample starts with stroke cases
    let names: Vec<String> = hierarchy.children.iter().map(|c| c.name.to_string()).collect();
    assert_eq!(names, vec!["1", "0"]);
    assert_eq!(hierarchy.children[0].value, 3);
    assert_eq!(hierarchy.children[1].value, 7);
}

#[test]
fn given_empty_dataset_when_building_then_hierarchy_is_empty() {
    let path = AttributePath::parse(["gender"], DEFAULT_PLACEHOLDER);
    let hierarchy = build_hierarchy(&[], &path, "stroke");

    assert!(hierarchy.is_empty());
    assert_eq!(hierarchy.value, 0);
}

#[test]
fn given_three_record_example_when_grouping_by_sex_then_f_precedes_m() {
    let records: Vec<Record> = vec![
        [("sex", Value::from("M")), ("stroke", Value::from(1i64))].into_iter().collect(),
        [("sex", Value::from("F")), ("stroke", Value::from(0i64))].into_iter().collect(),
        [("sex", Value::from("F")), ("stroke", Value::from(1i64))].into_iter().collect(),
    ];
    let path = AttributePath::parse(["sex"], DEFAULT_PLACEHOLDER);

    let hierarchy = build_hierarchy(&records, &path, "stroke");

    assert_eq!(hierarchy.children.len(), 2);
    assert_eq!(hierarchy.children[0].name, Value::from("F"));
    assert_eq!(hierarchy.children[0].attr, "sex");
    assert_eq!(hierarchy.children[0].value, 2);
    assert_eq!(hierarchy.children[1].name, Value::from("M"));
    assert_eq!(hierarchy.children[1].value, 1);
    assert!(hierarchy.children.iter().all(TreeNode::is_leaf));
}

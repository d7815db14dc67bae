//! Grouping levels: the distinct values of one field at one depth

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::path::AttributePath;
use crate::domain::record::Record;
use crate::domain::value::Value;

/// One group candidate: records whose `attr` equals `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelEntry {
    pub name: Value,
    pub attr: String,
}

pub type Level = Vec<LevelEntry>;

/// Build one level per path position.
///
/// Each level holds the distinct values of its resolved field, sorted in
/// ascending natural order. A path without any real attribute is ignored and
/// a single level over `fallback_attribute` is returned instead, its values
/// kept in order of first appearance.
#[instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn build_levels(records: &[Record], path: &AttributePath, fallback_attribute: &str) -> Vec<Level> {
    match path.resolve() {
        Some(fields) => fields
            .into_iter()
            .map(|attr| sorted_level(records, attr))
            .collect(),
        None => {
            debug!("no real attribute in path, grouping by {}", fallback_attribute);
            vec![first_seen_level(records, fallback_attribute.to_string())]
        }
    }
}

fn sorted_level(records: &[Record], attr: String) -> Level {
    records
        .iter()
        .map(|r| r.get(&attr))
        .unique()
        .sorted()
        .map(|name| LevelEntry {
            name: name.clone(),
            attr: attr.clone(),
        })
        .collect()
}

fn first_seen_level(records: &[Record], attr: String) -> Level {
    records
        .iter()
        .map(|r| r.get(&attr))
        .unique()
        .map(|name| LevelEntry {
            name: name.clone(),
            attr: attr.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::path::DEFAULT_PLACEHOLDER;

    fn records() -> Vec<Record> {
        vec![
            [("gender", Value::from("Male")), ("stroke", Value::from(1i64))]
                .into_iter()
                .collect(),
            [("gender", Value::from("Female")), ("stroke", Value::from(0i64))]
                .into_iter()
                .collect(),
            [("gender", Value::from("Female")), ("stroke", Value::from(1i64))]
                .into_iter()
                .collect(),
        ]
    }

    fn names(level: &Level) -> Vec<String> {
        level.iter().map(|e| e.name.to_string()).collect()
    }

    #[test]
    fn given_real_attribute_when_building_levels_then_values_sorted_ascending() {
        let path = AttributePath::parse(["gender"], DEFAULT_PLACEHOLDER);
        let levels = build_levels(&records(), &path, "stroke");
        assert_eq!(levels.len(), 1);
        assert_eq!(names(&levels[0]), vec!["Female", "Male"]);
        assert!(levels[0].iter().all(|e| e.attr == "gender"));
    }

    #[test]
    fn given_only_placeholders_when_building_levels_then_uses_fallback_in_first_seen_order() {
        let path = AttributePath::parse(["_placeholder", "_placeholder"], DEFAULT_PLACEHOLDER);
        let levels = build_levels(&records(), &path, "stroke");
        assert_eq!(levels.len(), 1);
        assert_eq!(names(&levels[0]), vec!["1", "0"]);
        assert!(levels[0].iter().all(|e| e.attr == "stroke"));
    }

    #[test]
    fn given_absent_field_when_building_levels_then_single_missing_entry() {
        let path = AttributePath::parse(["bmi"], DEFAULT_PLACEHOLDER);
        let levels = build_levels(&records(), &path, "stroke");
        assert_eq!(levels[0].len(), 1);
        assert!(levels[0][0].name.is_missing());
    }

    #[test]
    fn given_no_records_when_building_levels_then_levels_are_empty() {
        let path = AttributePath::parse(["gender", "_placeholder"], DEFAULT_PLACEHOLDER);
        let levels = build_levels(&[], &path, "stroke");
        assert_eq!(levels.len(), 2);
        assert!(levels.iter().all(|l| l.is_empty()));
    }
}

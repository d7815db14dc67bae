//! Counted hierarchy built from grouping levels

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::level::{build_levels, Level};
use crate::domain::path::AttributePath;
use crate::domain::record::Record;
use crate::domain::value::Value;

/// One group in the hierarchy.
///
/// `value` is the number of `points`. When `children` is present, the
/// children partition `points` exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub name: Value,
    pub attr: String,
    pub value: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn label(&self) -> String {
        format!("{}: {}", self.attr, self.name)
    }

    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a TreeNode>) {
        match &self.children {
            Some(children) => children.iter().for_each(|c| c.collect_leaves(leaves)),
            None => leaves.push(self),
        }
    }

    fn drop_points(&mut self) {
        self.points = Vec::new();
        if let Some(children) = self.children.as_mut() {
            children.iter_mut().for_each(TreeNode::drop_points);
        }
    }
}

/// Group `records` depth-first, consuming one level per step.
///
/// Returns `None` once the levels are exhausted. Level entries that match no
/// record produce no node.
pub fn build_tree(records: &[Record], levels: &[Level]) -> Option<Vec<TreeNode>> {
    let (current, rest) = levels.split_first()?;

    let mut grouped = Vec::with_capacity(current.len());
    for entry in current {
        let points: Vec<Record> = records
            .iter()
            .filter(|r| r.get(&entry.attr) == &entry.name)
            .cloned()
            .collect();
        if points.is_empty() {
            continue;
        }

        let children = build_tree(&points, rest);
        grouped.push(TreeNode {
            name: entry.name.clone(),
            attr: entry.attr.clone(),
            value: points.len(),
            points,
            children,
        });
    }
    Some(grouped)
}

/// Root of a hierarchy, the shape a treemap consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hierarchy {
    pub value: usize,
    pub children: Vec<TreeNode>,
}

impl Hierarchy {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of grouping levels below the root.
    pub fn depth(&self) -> usize {
        self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut leaves = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut leaves);
        }
        leaves
    }

    /// Same hierarchy without member records, for compact output.
    pub fn without_points(mut self) -> Self {
        self.children.iter_mut().for_each(TreeNode::drop_points);
        self
    }
}

/// Resolve levels for `path` and group `records` into a rooted hierarchy.
#[instrument(level = "debug", skip(records, path), fields(records = records.len(), path = %path))]
pub fn build_hierarchy(records: &[Record], path: &AttributePath, fallback_attribute: &str) -> Hierarchy {
    let levels = build_levels(records, path, fallback_attribute);
    let children = build_tree(records, &levels).unwrap_or_default();
    let value = children.iter().map(|c| c.value).sum();
    debug!("built {} top-level groups covering {} records", children.len(), value);
    Hierarchy { value, children }
}

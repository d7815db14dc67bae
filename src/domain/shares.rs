//! Treemap cell shares
//!
//! A treemap labels every leaf with its percentage of the nearest enclosing
//! branch that actually splits. Single-child chains are skipped so a leaf
//! under a lone parent reports its share of the grandparent instead of 100%.

use serde::Serialize;

use crate::domain::level::LevelEntry;
use crate::domain::tree::{Hierarchy, TreeNode};

/// Percentage label of one treemap leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafShare {
    /// Groups from the top level down to the leaf
    pub path: Vec<LevelEntry>,
    pub value: usize,
    /// Denominator the percentage was taken against
    pub base: usize,
    pub percent: f64,
}

impl LeafShare {
    pub fn label(&self) -> String {
        self.path
            .iter()
            .map(|e| format!("{}: {}", e.attr, e.name))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Top-level group header (`attr: name` with its count).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupHeader {
    pub entry: LevelEntry,
    pub value: usize,
}

#[derive(Debug, Clone, Copy)]
struct Branch {
    value: usize,
    fanout: usize,
}

/// Shares of every leaf, in depth-first order.
pub fn leaf_shares(hierarchy: &Hierarchy) -> Vec<LeafShare> {
    let mut shares = Vec::new();
    let mut ancestors = vec![Branch {
        value: hierarchy.value,
        fanout: hierarchy.children.len(),
    }];
    let mut path = Vec::new();
    for child in &hierarchy.children {
        walk(child, &mut ancestors, &mut path, &mut shares);
    }
    shares
}

pub fn group_headers(hierarchy: &Hierarchy) -> Vec<GroupHeader> {
    hierarchy
        .children
        .iter()
        .map(|node| GroupHeader {
            entry: LevelEntry {
                name: node.name.clone(),
                attr: node.attr.clone(),
            },
            value: node.value,
        })
        .collect()
}

fn walk(
    node: &TreeNode,
    ancestors: &mut Vec<Branch>,
    path: &mut Vec<LevelEntry>,
    shares: &mut Vec<LeafShare>,
) {
    path.push(LevelEntry {
        name: node.name.clone(),
        attr: node.attr.clone(),
    });

    match &node.children {
        Some(children) => {
            ancestors.push(Branch {
                value: node.value,
                fanout: children.len(),
            });
            for child in children {
                walk(child, ancestors, path, shares);
            }
            ancestors.pop();
        }
        None => {
            let base = branch_base(ancestors);
            shares.push(LeafShare {
                path: path.clone(),
                value: node.value,
                base,
                percent: percent(node.value, base),
            });
        }
    }

    path.pop();
}

/// Value of the nearest ancestor with two or more children, else the root.
fn branch_base(ancestors: &[Branch]) -> usize {
    ancestors
        .iter()
        .rev()
        .find(|b| b.fanout >= 2)
        .or_else(|| ancestors.first())
        .map(|b| b.value)
        .unwrap_or(0)
}

fn percent(value: usize, base: usize) -> f64 {
    if base == 0 {
        0.0
    } else {
        value as f64 / base as f64 * 100.0
    }
}

//! Plain-text renderings of hierarchies, levels, shares and graphs

use termtree::Tree;

use crate::domain::{Graph, Hierarchy, LeafShare, Level, TreeNode};

/// Convert a grouping structure into a printable `termtree`.
pub trait ToTermTree {
    fn to_term_tree(&self, root_label: &str) -> Tree<String>;
}

impl ToTermTree for Hierarchy {
    fn to_term_tree(&self, root_label: &str) -> Tree<String> {
        Tree::new(format!("{} ({})", root_label, self.value))
            .with_leaves(self.children.iter().map(node_tree))
    }
}

fn node_tree(node: &TreeNode) -> Tree<String> {
    Tree::new(format!("{} ({})", node.label(), node.value))
        .with_leaves(node.children().iter().map(node_tree))
}

/// One line per level: `1. gender: Female, Male`.
pub fn levels_lines(levels: &[Level]) -> Vec<String> {
    levels
        .iter()
        .enumerate()
        .map(|(idx, level)| {
            let attr = level.first().map(|e| e.attr.as_str()).unwrap_or("-");
            let values: Vec<String> = level.iter().map(|e| e.name.to_string()).collect();
            format!("{}. {}: {}", idx + 1, attr, values.join(", "))
        })
        .collect()
}

pub fn share_line(share: &LeafShare) -> String {
    format!(
        "{:>6.2}%  {:>6}/{:<6}  {}",
        share.percent,
        share.value,
        share.base,
        share.label()
    )
}

pub fn graph_lines(graph: &Graph) -> (Vec<String>, Vec<String>) {
    let nodes = graph
        .nodes
        .iter()
        .map(|n| format!("{:<16} {}", n.name, n.value))
        .collect();
    let links = graph
        .links
        .iter()
        .map(|l| format!("{} -- {}: {}", l.source, l.target, l.value))
        .collect();
    (nodes, links)
}

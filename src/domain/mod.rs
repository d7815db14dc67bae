//! Domain layer: records, grouping, and derived views
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod graph;
pub mod level;
pub mod path;
pub mod record;
pub mod shares;
pub mod tree;
pub mod value;

pub use error::DomainError;
pub use graph::{build_graph, default_indicators, validate_indicators, Graph, GraphLink, GraphNode, Indicator};
pub use level::{build_levels, Level, LevelEntry};
pub use path::{AttributePath, PathEntry, DEFAULT_PLACEHOLDER};
pub use record::Record;
pub use shares::{group_headers, leaf_shares, GroupHeader, LeafShare};
pub use tree::{build_hierarchy, build_tree, Hierarchy, TreeNode};
pub use value::Value;

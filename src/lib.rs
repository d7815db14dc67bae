//! cohort: group flat records into counted hierarchies
//!
//! Records (one row per patient) are grouped level by level along an
//! attribute path. The path may contain placeholders which repeat a real
//! attribute, which lets a treemap show the same split at two depths.
//! The resulting hierarchy carries a record count on every node and is
//! consumed by treemap and force-graph views as JSON.
//!
//! Layers:
//! - `domain`: values, records, paths, levels, the tree builder, shares, graph
//! - `application`: dataset loading and the services driving the domain
//! - `infrastructure`: filesystem seam and service container
//! - `cli`: argument parsing, dispatch and rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

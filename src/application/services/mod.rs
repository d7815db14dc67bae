//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod dataset;
mod graph;
mod hierarchy;

pub use dataset::{parse_dataset, Dataset, DatasetFormat, DatasetService};
pub use graph::GraphService;
pub use hierarchy::HierarchyService;

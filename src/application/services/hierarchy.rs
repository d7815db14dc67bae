//! Hierarchy service
//!
//! Turns a dataset and a raw attribute list into the grouping views a
//! treemap consumes.

use tracing::{debug, instrument, warn};

use crate::application::services::Dataset;
use crate::config::Settings;
use crate::domain::{
    build_hierarchy, build_levels, group_headers, leaf_shares, AttributePath, GroupHeader,
    Hierarchy, LeafShare, Level,
};

/// Service for building grouping hierarchies.
pub struct HierarchyService {
    placeholder: String,
    outcome_attribute: String,
}

impl HierarchyService {
    pub fn new(placeholder: impl Into<String>, outcome_attribute: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            outcome_attribute: outcome_attribute.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.placeholder, &settings.outcome_attribute)
    }

    /// Parse raw attribute names, marking the configured placeholder.
    pub fn path(&self, attrs: &[String]) -> AttributePath {
        AttributePath::parse(attrs, &self.placeholder)
    }

    pub fn levels(&self, dataset: &Dataset, attrs: &[String]) -> Vec<Level> {
        let path = self.checked_path(dataset, attrs);
        build_levels(&dataset.records, &path, &self.outcome_attribute)
    }

    #[instrument(level = "debug", skip(self, dataset), fields(records = dataset.len()))]
    pub fn build(&self, dataset: &Dataset, attrs: &[String]) -> Hierarchy {
        let path = self.checked_path(dataset, attrs);
        let hierarchy = build_hierarchy(&dataset.records, &path, &self.outcome_attribute);
        debug!(
            "hierarchy depth {} with {} leaves",
            hierarchy.depth(),
            hierarchy.leaves().len()
        );
        hierarchy
    }

    pub fn shares(&self, dataset: &Dataset, attrs: &[String]) -> (Vec<GroupHeader>, Vec<LeafShare>) {
        let hierarchy = self.build(dataset, attrs);
        (group_headers(&hierarchy), leaf_shares(&hierarchy))
    }

    /// Unknown fields are legal (every record groups as missing), but almost
    /// always a typo, so they are reported.
    fn checked_path(&self, dataset: &Dataset, attrs: &[String]) -> AttributePath {
        let path = self.path(attrs);
        for attr in path.real_attributes() {
            if !dataset.has_column(attr) {
                warn!("attribute '{}' is not a column of {}", attr, dataset.source.display());
            }
        }
        if path.resolve().is_none() && !dataset.has_column(&self.outcome_attribute) {
            warn!(
                "outcome attribute '{}' is not a column of {}",
                self.outcome_attribute,
                dataset.source.display()
            );
        }
        path
    }
}

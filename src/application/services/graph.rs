//! Co-occurrence graph service

use tracing::{debug, warn};

use crate::application::services::Dataset;
use crate::application::ApplicationResult;
use crate::domain::{build_graph, validate_indicators, Graph, Indicator};

/// Service for deriving the force-layout node/link lists.
pub struct GraphService {
    indicators: Vec<Indicator>,
    /// Tokens the dataset reads as missing; indicator targets use them too
    missing_values: Vec<String>,
}

impl GraphService {
    /// Create a service; rejects unnamed or duplicate indicators.
    pub fn new(indicators: Vec<Indicator>, missing_values: Vec<String>) -> ApplicationResult<Self> {
        validate_indicators(&indicators)?;
        Ok(Self {
            indicators,
            missing_values,
        })
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn build(&self, dataset: &Dataset) -> Graph {
        for indicator in &self.indicators {
            if !dataset.has_column(&indicator.field) {
                warn!(
                    "indicator '{}' reads unknown column '{}'",
                    indicator.name, indicator.field
                );
            }
        }
        let graph = build_graph(&dataset.records, &self.indicators, &self.missing_values);
        debug!("graph: {} nodes, {} links", graph.nodes.len(), graph.links.len());
        graph
    }
}

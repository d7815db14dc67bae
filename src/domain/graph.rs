//! Indicator co-occurrence graph for the force-layout view

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::record::Record;
use crate::domain::value::Value;

/// Named predicate over one field: `field == equals`.
///
/// `equals` is parsed like a dataset cell with the same missing tokens, so
/// `"1"` matches a numeric 1 and `"N/A"` matches cells read as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub field: String,
    pub equals: String,
}

impl Indicator {
    pub fn new(name: impl Into<String>, field: impl Into<String>, equals: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            equals: equals.into(),
        }
    }

    fn target(&self, missing_tokens: &[String]) -> Value {
        Value::parse(&self.equals, missing_tokens)
    }
}

/// Indicators of the stroke prediction dataset.
pub fn default_indicators() -> Vec<Indicator> {
    vec![
        Indicator::new("heartDisease", "heart_disease", "1"),
        Indicator::new("ever_married", "ever_married", "Yes"),
        Indicator::new("never_married", "ever_married", "No"),
        Indicator::new("hypertension", "hypertension", "1"),
        Indicator::new("male", "gender", "Male"),
        Indicator::new("female", "gender", "Female"),
        Indicator::new("stroke", "stroke", "1"),
    ]
}

/// Reject indicators a graph could not key unambiguously.
pub fn validate_indicators(indicators: &[Indicator]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for indicator in indicators {
        if indicator.name.trim().is_empty() {
            return Err(DomainError::InvalidIndicator {
                name: indicator.name.clone(),
                reason: "name is empty".to_string(),
            });
        }
        if indicator.field.trim().is_empty() {
            return Err(DomainError::InvalidIndicator {
                name: indicator.name.clone(),
                reason: "field is empty".to_string(),
            });
        }
        if !seen.insert(indicator.name.as_str()) {
            return Err(DomainError::DuplicateIndicator(indicator.name.clone()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl Graph {
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn link(&self, a: &str, b: &str) -> Option<&GraphLink> {
        self.links.iter().find(|l| {
            (l.source == a && l.target == b) || (l.source == b && l.target == a)
        })
    }

    pub fn max_link_value(&self) -> usize {
        self.links.iter().map(|l| l.value).max().unwrap_or(0)
    }
}

/// Count indicator hits and pairwise co-occurrences.
///
/// Every indicator becomes a node, even with no hits. A link exists only for
/// pairs that co-occur in at least one record.
#[instrument(level = "debug", skip_all, fields(records = records.len(), indicators = indicators.len()))]
pub fn build_graph(records: &[Record], indicators: &[Indicator], missing_tokens: &[String]) -> Graph {
    let n = indicators.len();
    let targets: Vec<Value> = indicators.iter().map(|i| i.target(missing_tokens)).collect();

    let mut hits = vec![0usize; n];
    let mut pairs = vec![vec![0usize; n]; n];
    let mut matched = Vec::with_capacity(n);

    for record in records {
        matched.clear();
        matched.extend(
            indicators
                .iter()
                .zip(&targets)
                .enumerate()
                .filter(|(_, (ind, target))| record.get(&ind.field) == *target)
                .map(|(i, _)| i),
        );
        for (pos, &i) in matched.iter().enumerate() {
            hits[i] += 1;
            for &j in &matched[pos + 1..] {
                pairs[i][j] += 1;
            }
        }
    }

    let nodes = indicators
        .iter()
        .zip(&hits)
        .map(|(ind, &value)| GraphNode {
            name: ind.name.clone(),
            value,
        })
        .collect();

    let mut links = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if pairs[i][j] > 0 {
                links.push(GraphLink {
                    source: indicators[i].name.clone(),
                    target: indicators[j].name.clone(),
                    value: pairs[i][j],
                });
            }
        }
    }

    Graph { nodes, links }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(gender: &str, hypertension: i64, stroke: i64) -> Record {
        [
            ("gender", Value::from(gender)),
            ("hypertension", Value::from(hypertension)),
            ("stroke", Value::from(stroke)),
        ]
        .into_iter()
        .collect()
    }

    fn indicators() -> Vec<Indicator> {
        vec![
            Indicator::new("male", "gender", "Male"),
            Indicator::new("female", "gender", "Female"),
            Indicator::new("hypertension", "hypertension", "1"),
            Indicator::new("stroke", "stroke", "1"),
        ]
    }

    #[test]
    fn given_records_when_building_graph_then_counts_hits_and_cooccurrence() {
        let records = vec![
            patient("Male", 1, 1),
            patient("Female", 1, 0),
            patient("Female", 0, 1),
            patient("Male", 0, 0),
        ];
        let graph = build_graph(&records, &indicators(), &[]);

        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.node("male").unwrap().value, 2);
        assert_eq!(graph.node("hypertension").unwrap().value, 2);
        assert_eq!(graph.link("male", "stroke").unwrap().value, 1);
        assert_eq!(graph.link("stroke", "hypertension").unwrap().value, 1);
        // exclusive indicators never co-occur
        assert!(graph.link("male", "female").is_none());
        assert_eq!(graph.max_link_value(), 1);
    }

    #[test]
    fn given_indicator_without_hits_when_building_graph_then_node_has_zero_value() {
        let records = vec![patient("Female", 0, 0)];
        let graph = build_graph(&records, &indicators(), &[]);
        assert_eq!(graph.node("stroke").unwrap().value, 0);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn given_missing_token_as_target_when_building_graph_then_matches_missing_cells() {
        let mut unmeasured: Record = [("gender", "Male")].into_iter().collect();
        unmeasured.insert("bmi", Value::Missing);
        let measured: Record = [("gender", Value::from("Female")), ("bmi", Value::from(22.5))]
            .into_iter()
            .collect();
        let indicators = vec![
            Indicator::new("no_bmi", "bmi", "N/A"),
            Indicator::new("male", "gender", "Male"),
        ];
        let tokens = vec!["".to_string(), "N/A".to_string()];

        let graph = build_graph(&[unmeasured, measured], &indicators, &tokens);

        assert_eq!(graph.node("no_bmi").unwrap().value, 1);
        assert_eq!(graph.link("no_bmi", "male").unwrap().value, 1);
    }

    #[test]
    fn given_duplicate_names_when_validating_then_fails() {
        let dup = vec![
            Indicator::new("stroke", "stroke", "1"),
            Indicator::new("stroke", "stroke", "0"),
        ];
        assert!(matches!(
            validate_indicators(&dup),
            Err(DomainError::DuplicateIndicator(name)) if name == "stroke"
        ));
    }

    #[test]
    fn given_empty_field_when_validating_then_fails() {
        let bad = vec![Indicator::new("stroke", " ", "1")];
        assert!(validate_indicators(&bad).is_err());
        assert!(validate_indicators(&default_indicators()).is_ok());
    }
}

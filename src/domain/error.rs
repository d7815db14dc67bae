//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid grouping or graph definitions.
/// Grouping itself never fails: unknown fields read as missing values.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid indicator '{name}': {reason}")]
    InvalidIndicator { name: String, reason: String },

    #[error("duplicate indicator name: {0}")]
    DuplicateIndicator(String),
}

//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent inconsistencies in the layer records handed to the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("layer {layer} references missing parent {parent}")]
    MissingParent { layer: String, parent: String },

    #[error("layer identifier is required")]
    MissingIdentifier,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

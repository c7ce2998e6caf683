//! Unified error types for the domain layer
//!
//! Provides a common error type for world-graph invariants and value parsing,
//! so adapters never have to fall back to String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for enums and value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Following an owner chain came back to where it started
    #[error("Containment cycle through item {0}")]
    ContainmentCycle(String),

    /// Owner chain did not reach a location within the hop limit
    #[error("Containment deeper than {max_depth} hops starting at {start}")]
    ContainmentTooDeep { start: String, max_depth: usize },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if seed.locations.is_empty() {
    ///     return Err(DomainError::validation("A world needs at least one location"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn containment_cycle(item: impl ToString) -> Self {
        Self::ContainmentCycle(item.to_string())
    }

    pub fn containment_too_deep(start: impl ToString, max_depth: usize) -> Self {
        Self::ContainmentTooDeep {
            start: start.to_string(),
            max_depth,
        }
    }
}

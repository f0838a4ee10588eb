//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;
use crate::item::ItemStatus;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is reported synchronously to the caller of the failing
/// operation. Nothing here is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An item with the same identifier already exists.
    #[error("item already exists: {0}")]
    Conflict(ItemId),

    /// No item is stored under the identifier.
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// The requested status change is not allowed from the current status.
    #[error("item {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ItemId,
        from: ItemStatus,
        to: ItemStatus,
    },

    /// Input could not be decoded at the boundary.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store could not be accessed (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    pub fn conflict(id: impl Into<ItemId>) -> Self {
        Self::Conflict(id.into())
    }

    pub fn not_found(id: impl Into<ItemId>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Conflict(_) => "conflict",
            DomainError::NotFound(_) => "not_found",
            DomainError::InvalidTransition { .. } => "invalid_transition",
            DomainError::Validation(_) => "invalid_payload",
            DomainError::Unavailable(_) => "unavailable",
        }
    }
}

//! # Engine Error
//!
//! The two failure classes a transport cares about, kept apart: business rule
//! violations (map to client errors) and storage failures (map to server
//! errors, surfaced unchanged and never retried here).

use thiserror::Error;

use till_core::DomainError;
use till_db::StoreError;

/// Failure of a service operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A business rule was violated; no state changed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage layer failed; surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// The domain kind, when this is a business rule violation.
    pub fn domain(&self) -> Option<DomainError> {
        match self {
            EngineError::Domain(kind) => Some(*kind),
            EngineError::Store(_) => None,
        }
    }
}

/// Result type for service operations.
pub type EngineResult<T> = Result<T, EngineError>;

//! Error types for the persistence layer.
//!
//! Missing records are never errors; every accessor has a defined default.
//! [`StoreError`] covers the backend itself failing.

/// Errors a [`ProgressionStore`](crate::ProgressionStore) can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Why the store is unavailable.
        reason: String,
    },

    /// The backend rejected or failed an operation.
    #[error("store backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

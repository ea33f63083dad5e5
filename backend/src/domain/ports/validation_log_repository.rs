//! Driven port for the append-only validation log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ValidationLogEntry;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by validation log adapters.
    pub enum ValidationLogRepositoryError {
        /// Repository connection could not be established.
        Connection => "validation log connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "validation log query failed: {message}",
    }
}

/// Append-only storage for validation log entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidationLogRepository: Send + Sync {
    /// Persist one entry. Entries are never updated afterwards.
    async fn append(&self, entry: &ValidationLogEntry) -> Result<(), ValidationLogRepositoryError>;

    /// All entries in insertion order.
    async fn list(&self) -> Result<Vec<ValidationLogEntry>, ValidationLogRepositoryError>;

    /// Newest stored timestamp, or `None` for an empty log.
    async fn latest_timestamp(&self)
    -> Result<Option<DateTime<Utc>>, ValidationLogRepositoryError>;
}

//! Driven port for the card registry's backing store.

use async_trait::async_trait;

use crate::domain::{Card, CardId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by card repository adapters.
    pub enum CardRepositoryError {
        /// Repository connection could not be established.
        Connection => "card repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "card repository query failed: {message}",
    }
}

/// Result of inserting a card.
///
/// A duplicate identifier is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardInsertOutcome {
    /// A new row was written.
    Inserted,
    /// A card with the same identifier already exists; nothing was written.
    AlreadyExists,
}

/// Storage for registered cards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Insert a card unless one with the same id exists.
    async fn insert(&self, id: &CardId) -> Result<CardInsertOutcome, CardRepositoryError>;

    /// Remove a card, returning whether a row was deleted.
    async fn remove(&self, id: &CardId) -> Result<bool, CardRepositoryError>;

    /// All cards ordered by identifier.
    async fn list(&self) -> Result<Vec<Card>, CardRepositoryError>;
}

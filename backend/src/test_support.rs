//! Test utilities for the ticket validator crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use argon2::Params;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::domain::ports::{
    CardInsertOutcome, CardRepository, CardRepositoryError, ValidationLogRepository,
    ValidationLogRepositoryError,
};
use crate::domain::{AdminCredential, Card, CardId, ValidationLogEntry};

/// Management username used by test fixtures.
pub const ADMIN_USER: &str = "admin";
/// Management password used by test fixtures.
pub const ADMIN_PASSWORD: &str = "correct horse";

/// Administrator credential hashed with minimal Argon2 cost.
///
/// # Panics
/// Panics if the fixed fixture parameters are rejected by the hasher.
pub fn cheap_credential() -> AdminCredential {
    let params = Params::new(8, 1, 1, None).expect("minimal argon2 params");
    AdminCredential::hash_with_params(
        ADMIN_USER,
        Zeroizing::new(ADMIN_PASSWORD.to_owned()),
        params,
    )
    .expect("hash fixture credential")
}

/// `Authorization` header value for the given pair.
///
/// # Examples
/// ```
/// use ticket_validator::test_support::basic_auth;
///
/// assert_eq!(basic_auth("admin", "hunter2"), "Basic YWRtaW46aHVudGVyMg==");
/// ```
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Card repository held in memory, ordered by id.
#[derive(Debug, Default)]
pub struct InMemoryCardRepository {
    cards: Mutex<BTreeSet<String>>,
}

impl InMemoryCardRepository {
    /// Repository pre-populated with `ids`.
    pub fn with_cards<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cards: Mutex::new(ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Snapshot of stored ids.
    pub fn ids(&self) -> Vec<String> {
        self.cards
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn insert(&self, id: &CardId) -> Result<CardInsertOutcome, CardRepositoryError> {
        let mut cards = self.cards.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(if cards.insert(id.to_string()) {
            CardInsertOutcome::Inserted
        } else {
            CardInsertOutcome::AlreadyExists
        })
    }

    async fn remove(&self, id: &CardId) -> Result<bool, CardRepositoryError> {
        let mut cards = self.cards.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cards.remove(id.as_ref()))
    }

    async fn list(&self) -> Result<Vec<Card>, CardRepositoryError> {
        self.ids()
            .into_iter()
            .map(|id| {
                CardId::new(id)
                    .map(Card::new)
                    .map_err(|err| CardRepositoryError::query(err.to_string()))
            })
            .collect()
    }
}

/// Validation log repository held in memory.
#[derive(Debug, Default)]
pub struct InMemoryValidationLogRepository {
    entries: Mutex<Vec<ValidationLogEntry>>,
}

impl InMemoryValidationLogRepository {
    /// Snapshot of stored entries in insertion order.
    pub fn entries(&self) -> Vec<ValidationLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ValidationLogRepository for InMemoryValidationLogRepository {
    async fn append(&self, entry: &ValidationLogEntry) -> Result<(), ValidationLogRepositoryError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries
            .iter()
            .any(|e| e.timestamp() == entry.timestamp() && e.card_id() == entry.card_id())
        {
            return Err(ValidationLogRepositoryError::query(
                "UNIQUE constraint failed: validation_logs.timestamp, validation_logs.card_id",
            ));
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ValidationLogEntry>, ValidationLogRepositoryError> {
        Ok(self.entries())
    }

    async fn latest_timestamp(
        &self,
    ) -> Result<Option<DateTime<Utc>>, ValidationLogRepositoryError> {
        Ok(self.entries().iter().map(ValidationLogEntry::timestamp).max())
    }
}

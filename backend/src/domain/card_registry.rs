//! Card registry domain service.
//!
//! Owns the rules for seeding, registering and removing cards. Every
//! business outcome is returned as a value; only infrastructure failures are
//! errors. Mutations are mirrored into the validation log when one is wired.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::ports::{CardInsertOutcome, CardRepository, CardRepositoryError};
use crate::domain::{
    ADDED_STATUS, Card, CardId, CardIdValidationError, DELETED_STATUS, Error, ValidationLog,
};

/// Outcome of [`CardRegistry::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCardOutcome {
    /// The card was registered.
    Added(CardId),
    /// The card was already registered; nothing changed.
    AlreadyExists(CardId),
    /// The identifier failed validation; nothing changed.
    Rejected(CardIdValidationError),
}

/// Outcome of [`CardRegistry::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteCardOutcome {
    /// The card was removed.
    Deleted(CardId),
    /// No card matched; nothing changed.
    NotFound,
}

/// Per-identifier summary of a seeding pass.
#[derive(Debug, Default)]
pub struct SeedReport {
    /// Identifiers written by this pass.
    pub inserted: Vec<CardId>,
    /// Identifiers that were already registered.
    pub already_present: Vec<CardId>,
    /// Identifiers whose insert failed, with the mapped error.
    pub failed: Vec<(CardId, Error)>,
}

/// Registry of cards authorised for entry.
#[derive(Clone)]
pub struct CardRegistry {
    cards: Arc<dyn CardRepository>,
    audit_log: Option<Arc<ValidationLog>>,
}

impl CardRegistry {
    /// Create a registry backed by `cards`, mirroring mutations into
    /// `audit_log` when present.
    pub fn new(cards: Arc<dyn CardRepository>, audit_log: Option<Arc<ValidationLog>>) -> Self {
        Self { cards, audit_log }
    }

    /// Insert each seed identifier independently.
    ///
    /// Duplicates are expected on restart and skipped. A failing insert is
    /// logged and recorded in the report; the remaining identifiers are
    /// still attempted.
    pub async fn seed(&self, ids: &[CardId]) -> SeedReport {
        let mut report = SeedReport::default();
        for id in ids {
            match self.cards.insert(id).await {
                Ok(CardInsertOutcome::Inserted) => report.inserted.push(id.clone()),
                Ok(CardInsertOutcome::AlreadyExists) => report.already_present.push(id.clone()),
                Err(err) => {
                    error!(card_id = %id, error = %err, "failed to seed card");
                    report.failed.push((id.clone(), map_card_error(err)));
                }
            }
        }
        info!(
            inserted = report.inserted.len(),
            already_present = report.already_present.len(),
            failed = report.failed.len(),
            "card seeding finished"
        );
        report
    }

    /// All registered cards in identifier order.
    pub async fn list(&self) -> Result<Vec<Card>, Error> {
        self.cards.list().await.map_err(map_card_error)
    }

    /// Register `raw` if it is a valid, unregistered identifier.
    pub async fn add(&self, raw: &str) -> Result<AddCardOutcome, Error> {
        let id = match CardId::registrable(raw) {
            Ok(id) => id,
            Err(reason) => {
                warn!(%reason, "card id rejected");
                return Ok(AddCardOutcome::Rejected(reason));
            }
        };

        match self.cards.insert(&id).await.map_err(map_card_error)? {
            CardInsertOutcome::Inserted => {
                info!(card_id = %id, "Added access to: {id}");
                self.audit(&id, ADDED_STATUS).await;
                Ok(AddCardOutcome::Added(id))
            }
            CardInsertOutcome::AlreadyExists => {
                warn!(card_id = %id, "card already registered");
                Ok(AddCardOutcome::AlreadyExists(id))
            }
        }
    }

    /// Remove `raw` if it is registered.
    pub async fn delete(&self, raw: &str) -> Result<DeleteCardOutcome, Error> {
        let Ok(id) = CardId::new(raw) else {
            return Ok(DeleteCardOutcome::NotFound);
        };

        if self.cards.remove(&id).await.map_err(map_card_error)? {
            info!(card_id = %id, "Removed access from: {id}");
            self.audit(&id, DELETED_STATUS).await;
            Ok(DeleteCardOutcome::Deleted(id))
        } else {
            warn!(card_id = %id, "card to delete is not registered");
            Ok(DeleteCardOutcome::NotFound)
        }
    }

    async fn audit(&self, id: &CardId, status: &str) {
        let Some(log) = &self.audit_log else {
            return;
        };
        if let Err(err) = log.append(id.as_ref(), status).await {
            error!(card_id = %id, status, error = %err, "failed to write audit entry");
        }
    }
}

fn map_card_error(error: CardRepositoryError) -> Error {
    match error {
        CardRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("card repository unavailable: {message}"))
        }
        CardRepositoryError::Query { message } => {
            Error::internal(format!("card repository error: {message}"))
        }
    }
}

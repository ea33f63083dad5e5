//! SQLite-backed `CardRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{CardInsertOutcome, CardRepository, CardRepositoryError};
use crate::domain::{Card, CardId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CardRow, NewCardRow};
use super::pool::{DbPool, PoolError};
use super::schema::cards;

/// Diesel-backed implementation of the `CardRepository` port.
#[derive(Clone)]
pub struct DieselCardRepository {
    pool: DbPool,
}

impl DieselCardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CardRepositoryError {
    map_basic_pool_error(error, CardRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CardRepositoryError {
    map_basic_diesel_error(
        error,
        CardRepositoryError::query,
        CardRepositoryError::connection,
    )
}

/// Rows with an empty id can only come from manual edits; they are skipped.
fn row_to_card(row: CardRow) -> Option<Card> {
    match CardId::new(row.id) {
        Ok(id) => Some(Card::new(id)),
        Err(err) => {
            tracing::warn!(error = %err, "skipping unreadable card row");
            None
        }
    }
}

#[async_trait]
impl CardRepository for DieselCardRepository {
    async fn insert(&self, id: &CardId) -> Result<CardInsertOutcome, CardRepositoryError> {
        let id = id.to_string();
        let written = self
            .pool
            .interact(move |conn| {
                diesel::insert_or_ignore_into(cards::table)
                    .values(&NewCardRow { id: &id })
                    .execute(conn)
            })
            .await
            .map_err(map_pool_error)?
            .map_err(map_diesel_error)?;

        Ok(if written == 0 {
            CardInsertOutcome::AlreadyExists
        } else {
            CardInsertOutcome::Inserted
        })
    }

    async fn remove(&self, id: &CardId) -> Result<bool, CardRepositoryError> {
        let id = id.to_string();
        let removed = self
            .pool
            .interact(move |conn| {
                diesel::delete(cards::table.filter(cards::id.eq(id))).execute(conn)
            })
            .await
            .map_err(map_pool_error)?
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn list(&self) -> Result<Vec<Card>, CardRepositoryError> {
        let rows: Vec<CardRow> = self
            .pool
            .interact(|conn| {
                cards::table
                    .select(CardRow::as_select())
                    .order(cards::id.asc())
                    .load(conn)
            })
            .await
            .map_err(map_pool_error)?
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().filter_map(row_to_card).collect())
    }
}

//! SQLite-backed `ValidationLogRepository` implementation using Diesel ORM.
//!
//! Timestamps are stored as naive UTC values; the conversion back to
//! `DateTime<Utc>` happens here so the domain never sees naive times.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::dsl::{max, sql};
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::domain::ValidationLogEntry;
use crate::domain::ports::{ValidationLogRepository, ValidationLogRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewValidationLogRow, ValidationLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::validation_logs;

/// Diesel-backed implementation of the `ValidationLogRepository` port.
#[derive(Clone)]
pub struct DieselValidationLogRepository {
    pool: DbPool,
}

impl DieselValidationLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ValidationLogRepositoryError {
    map_basic_pool_error(error, ValidationLogRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ValidationLogRepositoryError {
    map_basic_diesel_error(
        error,
        ValidationLogRepositoryError::query,
        ValidationLogRepositoryError::connection,
    )
}

fn row_to_entry(row: ValidationLogRow) -> ValidationLogEntry {
    ValidationLogEntry::new(row.timestamp.and_utc(), row.card_id, row.status)
}

#[async_trait]
impl ValidationLogRepository for DieselValidationLogRepository {
    async fn append(&self, entry: &ValidationLogEntry) -> Result<(), ValidationLogRepositoryError> {
        let timestamp = entry.timestamp().naive_utc();
        let card_id = entry.card_id().to_owned();
        let status = entry.status().to_owned();

        self.pool
            .interact(move |conn| {
                diesel::insert_into(validation_logs::table)
                    .values(&NewValidationLogRow {
                        timestamp,
                        card_id: &card_id,
                        status: &status,
                    })
                    .execute(conn)
            })
            .await
            .map_err(map_pool_error)?
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<ValidationLogEntry>, ValidationLogRepositoryError> {
        // rowid follows insertion order even if the wall clock stepped back
        // between restarts.
        let rows: Vec<ValidationLogRow> = self
            .pool
            .interact(|conn| {
                validation_logs::table
                    .select(ValidationLogRow::as_select())
                    .order(sql::<BigInt>("rowid"))
                    .load(conn)
            })
            .await
            .map_err(map_pool_error)?
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    async fn latest_timestamp(
        &self,
    ) -> Result<Option<DateTime<Utc>>, ValidationLogRepositoryError> {
        let latest: Option<NaiveDateTime> = self
            .pool
            .interact(|conn| {
                validation_logs::table
                    .select(max(validation_logs::timestamp))
                    .first(conn)
            })
            .await
            .map_err(map_pool_error)?
            .map_err(map_diesel_error)?;

        Ok(latest.map(|timestamp| timestamp.and_utc()))
    }
}

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{cards, validation_logs};

/// Row struct for reading from the cards table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CardRow {
    pub id: String,
}

/// Insertable struct for registering a card.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub(crate) struct NewCardRow<'a> {
    pub id: &'a str,
}

/// Row struct for reading from the validation_logs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validation_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ValidationLogRow {
    pub timestamp: NaiveDateTime,
    pub card_id: String,
    pub status: String,
}

/// Insertable struct for appending a log entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = validation_logs)]
pub(crate) struct NewValidationLogRow<'a> {
    pub timestamp: NaiveDateTime,
    pub card_id: &'a str,
    pub status: &'a str,
}

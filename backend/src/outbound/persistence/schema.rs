//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the database migrations exactly. When a
//! migration changes a table, update the matching block here.

diesel::table! {
    /// Cards authorised for entry.
    cards (id) {
        /// Card identifier as read from the card.
        id -> Text,
    }
}

diesel::table! {
    /// Append-only validation history.
    ///
    /// `card_id` is free text: it may name a deleted card or the invalid
    /// input sentinel.
    validation_logs (timestamp, card_id) {
        /// UTC creation time with microsecond precision.
        timestamp -> Timestamp,
        /// Reported card identifier.
        card_id -> Text,
        /// Reported or management outcome.
        status -> Text,
    }
}

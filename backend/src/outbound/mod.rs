//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Only persistence exists today: SQLite-backed repositories for cards and
//! the validation log. Adapters translate between domain types and storage
//! representations and contain no business logic.

pub mod persistence;

//! SQLite persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by a
//! single SQLite file through Diesel and an `r2d2` connection pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Off-runtime I/O**: every query runs on the blocking thread pool via
//!   [`DbPool::interact`].
//! - **Strongly typed errors**: Diesel and pool failures are mapped to the
//!   port error types.
//!
//! # Example
//!
//! ```ignore
//! use ticket_validator::outbound::persistence::{DbPool, DieselCardRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("base.db"))?;
//! pool.run_migrations().await?;
//! let cards = DieselCardRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_card_repository;
mod diesel_validation_log_repository;
mod models;
mod pool;
mod schema;

pub use diesel_card_repository::DieselCardRepository;
pub use diesel_validation_log_repository::DieselValidationLogRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

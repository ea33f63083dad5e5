//! Domain primitives, services and ports.
//!
//! Purpose: define the card registry and validation log independently of
//! HTTP and SQLite. Adapters depend on this module; it depends on nothing
//! outside the crate except through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - CardId / Card: access card identity and its registration rules.
//! - ValidationEvent / ValidationLogEntry: reader events and log records.
//! - CardRegistry / ValidationLog: services the HTTP layer calls.
//! - BasicCredentials / AdminCredential: management authentication.

pub mod card;
pub mod card_registry;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod validation_log;
pub mod validation_log_service;

pub use self::card::{Card, CardId, CardIdValidationError, REGISTRABLE_CARD_ID_LENGTH};
pub use self::card_registry::{AddCardOutcome, CardRegistry, DeleteCardOutcome, SeedReport};
pub use self::clock::MonotonicClock;
pub use self::credentials::{
    AdminCredential, AdminIdentity, BasicCredentials, BasicCredentialsError, CredentialError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation_log::{
    ADDED_STATUS, DELETED_STATUS, INVALID_INPUT_CARD_ID, INVALID_INPUT_STATUS, ValidationEvent,
    ValidationLogEntry,
};
pub use self::validation_log_service::ValidationLog;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use ticket_validator::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

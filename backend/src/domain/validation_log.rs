//! Validation log entries and the inbound validation event shape.
//!
//! The log is append-only. Entries reference cards by their raw identifier
//! string so history survives card deletion and malformed readers can still
//! leave a trace.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Card identifier recorded when a validation payload cannot be understood.
pub const INVALID_INPUT_CARD_ID: &str = "HAXORS";
/// Status recorded alongside [`INVALID_INPUT_CARD_ID`].
pub const INVALID_INPUT_STATUS: &str = "invalid input";
/// Status recorded when a card is registered through the management interface.
pub const ADDED_STATUS: &str = "added";
/// Status recorded when a card is removed through the management interface.
pub const DELETED_STATUS: &str = "deleted";

/// One immutable record in the validation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationLogEntry {
    timestamp: DateTime<Utc>,
    card_id: String,
    status: String,
}

impl ValidationLogEntry {
    /// Assemble an entry from its parts.
    pub fn new(timestamp: DateTime<Utc>, card_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            timestamp,
            card_id: card_id.into(),
            status: status.into(),
        }
    }

    /// Server-assigned creation time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Identifier reported for the card; not guaranteed to be registered.
    pub fn card_id(&self) -> &str {
        self.card_id.as_str()
    }

    /// Free-text outcome.
    pub fn status(&self) -> &str {
        self.status.as_str()
    }
}

/// A validation reported by a reader device.
///
/// # Examples
/// ```
/// use ticket_validator::domain::ValidationEvent;
///
/// let event = ValidationEvent::from_json(br#"{"UID":"ABCD1234","status":"valid"}"#);
/// assert_eq!(event.card_id(), "ABCD1234");
///
/// let garbage = ValidationEvent::from_json(b"not json");
/// assert_eq!(garbage.card_id(), "HAXORS");
/// assert_eq!(garbage.status(), "invalid input");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvent {
    card_id: String,
    status: String,
}

impl ValidationEvent {
    /// Event reported by a reader.
    pub fn new(card_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            status: status.into(),
        }
    }

    /// Sentinel event recorded for unusable payloads.
    pub fn invalid_input() -> Self {
        Self::new(INVALID_INPUT_CARD_ID, INVALID_INPUT_STATUS)
    }

    /// Parse a reader payload of the form `{"UID": "...", "status": "..."}`.
    ///
    /// Anything that is not a JSON object carrying both fields as strings
    /// yields [`ValidationEvent::invalid_input`].
    pub fn from_json(body: &[u8]) -> Self {
        let Ok(fields) = serde_json::from_slice::<Map<String, Value>>(body) else {
            return Self::invalid_input();
        };
        match (
            fields.get("UID").and_then(Value::as_str),
            fields.get("status").and_then(Value::as_str),
        ) {
            (Some(uid), Some(status)) => Self::new(uid, status),
            _ => Self::invalid_input(),
        }
    }

    /// Reported card identifier.
    pub fn card_id(&self) -> &str {
        self.card_id.as_str()
    }

    /// Reported outcome.
    pub fn status(&self) -> &str {
        self.status.as_str()
    }

    /// Whether this is the sentinel for an unusable payload.
    pub fn is_invalid_input(&self) -> bool {
        self.card_id == INVALID_INPUT_CARD_ID && self.status == INVALID_INPUT_STATUS
    }
}

//! Access card data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of characters a card id must have to be registered through the
/// management interface.
pub const REGISTRABLE_CARD_ID_LENGTH: usize = 8;

/// Validation errors returned by [`CardId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardIdValidationError {
    /// The identifier was empty.
    Empty,
    /// The identifier does not have [`REGISTRABLE_CARD_ID_LENGTH`] characters.
    InvalidLength {
        /// Number of characters supplied.
        actual: usize,
    },
}

impl fmt::Display for CardIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "card id must not be empty"),
            Self::InvalidLength { actual } => write!(
                f,
                "card id must be exactly {REGISTRABLE_CARD_ID_LENGTH} characters, got {actual}"
            ),
        }
    }
}

impl std::error::Error for CardIdValidationError {}

/// Identifier printed on (or encoded in) a physical access card.
///
/// ## Invariants
/// - never empty.
///
/// Seed identifiers are accepted at any length; identifiers added at runtime
/// go through [`CardId::registrable`], which also enforces the fixed length.
///
/// # Examples
/// ```
/// use ticket_validator::domain::{CardId, CardIdValidationError};
///
/// assert!(CardId::registrable("ABCD1234").is_ok());
/// assert_eq!(
///     CardId::registrable("ABC"),
///     Err(CardIdValidationError::InvalidLength { actual: 3 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(String);

impl CardId {
    /// Construct a card id of any non-zero length.
    pub fn new(id: impl Into<String>) -> Result<Self, CardIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CardIdValidationError::Empty);
        }
        Ok(Self(id))
    }

    /// Construct a card id that may be registered at runtime.
    ///
    /// Length is counted in characters, not bytes.
    pub fn registrable(id: impl Into<String>) -> Result<Self, CardIdValidationError> {
        let id = Self::new(id)?;
        let actual = id.0.chars().count();
        if actual != REGISTRABLE_CARD_ID_LENGTH {
            return Err(CardIdValidationError::InvalidLength { actual });
        }
        Ok(id)
    }
}

impl AsRef<str> for CardId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CardId {
    type Error = CardIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardId> for String {
    fn from(value: CardId) -> Self {
        value.0
    }
}

/// A card authorised for entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
}

impl Card {
    /// Wrap a validated identifier.
    pub fn new(id: CardId) -> Self {
        Self { id }
    }

    /// Identifier of this card.
    pub fn id(&self) -> &CardId {
        &self.id
    }
}

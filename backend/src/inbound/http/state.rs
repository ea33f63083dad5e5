//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::Authenticator;
use crate::domain::{CardRegistry, ValidationLog};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Verifies management credentials.
    pub authenticator: Arc<dyn Authenticator>,
    /// Card registry service.
    pub cards: Arc<CardRegistry>,
    /// Validation log; `None` when the deployment runs without an audit trail.
    pub audit_log: Option<Arc<ValidationLog>>,
}

impl HttpState {
    /// Construct state from its collaborators.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use ticket_validator::domain::{AdminCredential, CardRegistry};
    /// use ticket_validator::inbound::http::state::HttpState;
    /// use ticket_validator::test_support::InMemoryCardRepository;
    /// use zeroize::Zeroizing;
    ///
    /// let credential = AdminCredential::hash("admin", Zeroizing::new("pw".to_owned()))
    ///     .expect("hash credential");
    /// let cards = CardRegistry::new(Arc::new(InMemoryCardRepository::default()), None);
    /// let state = HttpState::new(Arc::new(credential), Arc::new(cards), None);
    /// assert!(state.audit_log.is_none());
    /// ```
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        cards: Arc<CardRegistry>,
        audit_log: Option<Arc<ValidationLog>>,
    ) -> Self {
        Self {
            authenticator,
            cards,
            audit_log,
        }
    }
}

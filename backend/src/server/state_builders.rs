//! Builders wiring Diesel repositories into the domain services.

use std::sync::Arc;

use mockable::DefaultClock;
use ticket_validator::domain::{AdminCredential, CardRegistry, ValidationLog};
use ticket_validator::inbound::http::state::HttpState;
use ticket_validator::outbound::persistence::{
    DbPool, DieselCardRepository, DieselValidationLogRepository,
};

/// Build the handler state over `pool`.
///
/// The validation log is only constructed when `audit_log` is set; the card
/// registry and handlers then share the same instance.
pub fn build_http_state(pool: &DbPool, credential: AdminCredential, audit_log: bool) -> HttpState {
    let log = audit_log.then(|| {
        Arc::new(ValidationLog::new(
            Arc::new(DieselValidationLogRepository::new(pool.clone())),
            Arc::new(DefaultClock),
        ))
    });
    let cards = CardRegistry::new(
        Arc::new(DieselCardRepository::new(pool.clone())),
        log.clone(),
    );
    HttpState::new(Arc::new(credential), Arc::new(cards), log)
}

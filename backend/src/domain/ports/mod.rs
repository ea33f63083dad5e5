//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod card_repository;
mod validation_log_repository;

pub use authenticator::Authenticator;
#[cfg(test)]
pub use card_repository::MockCardRepository;
pub use card_repository::{CardInsertOutcome, CardRepository, CardRepositoryError};
#[cfg(test)]
pub use validation_log_repository::MockValidationLogRepository;
pub use validation_log_repository::{ValidationLogRepository, ValidationLogRepositoryError};

//! Ticket validator library modules.
//!
//! Card readers report validations and pull the list of authorised cards;
//! an administrator manages that list over HTTP Basic authentication. The
//! crate is laid out hexagonally: [`domain`] holds the rules and ports,
//! [`inbound`] and [`outbound`] hold the Actix and Diesel adapters.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::TraceId;
pub use middleware::Trace;

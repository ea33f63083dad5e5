//! HTTP inbound adapter exposing the validator endpoints.

pub mod auth;
pub mod cards;
pub mod error;
pub mod health;
mod manage_view;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every validator route and both health probes.
///
/// The caller supplies `web::Data<HttpState>` and `web::Data<HealthState>`
/// as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use ticket_validator::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(validation::index)
        .service(validation::validate)
        .service(validation::list_logs)
        .service(cards::sync_cards)
        .service(cards::manage)
        .service(cards::add_card)
        .service(cards::delete_card)
        .service(health::ready)
        .service(health::live);
}

//! Validator entry-point: loads settings, prepares the database, seeds the
//! registry and serves HTTP.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ticket_validator::inbound::http::health::HealthState;
use ticket_validator::outbound::persistence::{DbPool, PoolConfig, PoolError};
use ticket_validator::settings::{SettingsError, ValidatorSettings};

use server::{ServerConfig, build_http_state, create_server};

/// Failures that abort startup.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ValidatorSettings::load()?;
    let seeds = settings.seed_cards()?;
    let credential = settings.admin_credential()?;
    if settings.app_pass.is_none() {
        warn!("TICKET_VALIDATOR_APP_PASS is not set");
    }

    let pool = DbPool::new(PoolConfig::new(settings.database_url()))?;
    let applied = pool.run_migrations().await?;
    info!(
        database = settings.database_url(),
        migrations = applied.len(),
        "database ready"
    );

    let audit_log = settings.audit_log_enabled();
    let http_state = build_http_state(&pool, credential, audit_log);
    if let Some(log) = &http_state.audit_log {
        if let Err(err) = log.resume().await {
            warn!(error = %err, "could not read the newest validation log entry");
        }
    }
    let report = http_state.cards.seed(&seeds).await;
    if !report.failed.is_empty() {
        warn!(failed = report.failed.len(), "some seed cards were not stored");
    }

    let bind_addr = settings.bind_addr();
    info!(%bind_addr, audit_log, "starting ticket validator");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, http_state))?;
    server.await?;
    Ok(())
}

//! Shared fixtures for integration tests against a real SQLite file.

use std::sync::Arc;

use mockable::DefaultClock;
use tempfile::TempDir;
use ticket_validator::domain::{CardRegistry, ValidationLog};
use ticket_validator::inbound::http::state::HttpState;
use ticket_validator::outbound::persistence::{
    DbPool, DieselCardRepository, DieselValidationLogRepository, PoolConfig,
};
use ticket_validator::test_support::cheap_credential;

/// A migrated database in a temporary directory.
///
/// The directory, and the database with it, is removed on drop.
pub struct TestDatabase {
    pub pool: DbPool,
    _dir: TempDir,
}

impl TestDatabase {
    /// Create and migrate a fresh database.
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("base.db");
        let pool = DbPool::new(PoolConfig::new(path.to_string_lossy().into_owned()).with_max_size(4))
            .expect("build pool");
        pool.run_migrations().await.expect("run migrations");
        Self { pool, _dir: dir }
    }

    pub fn cards(&self) -> DieselCardRepository {
        DieselCardRepository::new(self.pool.clone())
    }

    pub fn logs(&self) -> DieselValidationLogRepository {
        DieselValidationLogRepository::new(self.pool.clone())
    }

    /// Handler state wired the way the server wires it.
    pub fn http_state(&self, audit_log: bool) -> HttpState {
        let log = audit_log.then(|| {
            Arc::new(ValidationLog::new(
                Arc::new(self.logs()),
                Arc::new(DefaultClock),
            ))
        });
        let registry = CardRegistry::new(Arc::new(self.cards()), log.clone());
        HttpState::new(Arc::new(cheap_credential()), Arc::new(registry), log)
    }
}

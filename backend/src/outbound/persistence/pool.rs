//! Blocking-safe connection pool for Diesel SQLite connections.
//!
//! SQLite connections are synchronous, so the pool is an `r2d2` pool and
//! every database operation runs on Tokio's blocking thread pool. Callers
//! hand [`DbPool::interact`] a closure that receives a checked-out
//! connection; checkout, task and query failures stay distinguishable.
//!
//! # Design
//!
//! - Each connection sets `busy_timeout` and WAL journaling on acquire so
//!   concurrent writers wait instead of failing immediately.
//! - Schema migrations are embedded in the binary and applied explicitly at
//!   startup through [`DbPool::run_migrations`].

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// Applying embedded migrations failed.
    #[error("failed to run migrations: {message}")]
    Migration { message: String },

    /// The blocking task running the operation panicked or was cancelled.
    #[error("database task failed: {message}")]
    Task { message: String },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Create a migration error with the given message.
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }

    /// Create a task error with the given message.
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
///
/// # Example
///
/// ```ignore
/// let config = PoolConfig::new("base.db")
///     .with_max_size(4)
///     .with_busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
    busy_timeout: Duration,
}

impl PoolConfig {
    /// Create a new configuration for the SQLite file at `database_url`.
    ///
    /// Uses these defaults:
    /// - `max_size`: 8 connections
    /// - `connection_timeout`: 30 seconds
    /// - `busy_timeout`: 5 seconds
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 8,
            connection_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set how long SQLite waits on a locked database before failing.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[derive(Debug)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Connection pool for SQLite via Diesel.
///
/// # Example
///
/// ```ignore
/// let pool = DbPool::new(PoolConfig::new("base.db"))?;
/// pool.run_migrations().await?;
/// let count = pool
///     .interact(|conn| cards::table.count().get_result::<i64>(conn))
///     .await??;
/// ```
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<ConnectionManager<SqliteConnection>>,
}

impl DbPool {
    /// Create a new connection pool with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` if the first connection cannot be opened,
    /// for example when the database directory does not exist.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .connection_customizer(Box::new(SqlitePragmas {
                busy_timeout: config.busy_timeout,
            }))
            .build(manager)
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner })
    }

    /// Apply every embedded migration that has not run yet.
    ///
    /// Returns the versions applied by this call; empty when the schema is
    /// already current.
    pub async fn run_migrations(&self) -> Result<Vec<String>, PoolError> {
        self.blocking(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.iter().map(ToString::to_string).collect())
                .map_err(|err| PoolError::migration(err.to_string()))
        })
        .await
    }

    /// Run a Diesel operation on a pooled connection off the async runtime.
    ///
    /// The outer result reports pool and task failures; the inner result is
    /// whatever the query produced.
    pub async fn interact<F, T>(&self, operation: F) -> Result<diesel::QueryResult<T>, PoolError>
    where
        F: FnOnce(&mut SqliteConnection) -> diesel::QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |conn| Ok(operation(conn))).await
    }

    async fn blocking<F, T>(&self, operation: F) -> Result<T, PoolError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, PoolError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|err| PoolError::checkout(err.to_string()))?;
            operation(&mut conn)
        })
        .await
        .map_err(|err| PoolError::task(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::RunQueryDsl;
    use diesel::sql_types::Integer;
    use rstest::rstest;
    use tempfile::TempDir;

    #[derive(diesel::QueryableByName)]
    struct Answer {
        #[diesel(sql_type = Integer)]
        value: i32,
    }

    #[rstest]
    fn pool_config_default_values() {
        let config = PoolConfig::new("base.db");

        assert_eq!(config.database_url(), "base.db");
        assert_eq!(config.max_size, 8);
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn pool_config_builder_pattern() {
        let config = PoolConfig::new("base.db")
            .with_max_size(2)
            .with_connection_timeout(Duration::from_secs(1))
            .with_busy_timeout(Duration::from_millis(250));

        assert_eq!(config.max_size, 2);
        assert_eq!(config.connection_timeout, Duration::from_secs(1));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }

    #[rstest]
    fn pool_error_display() {
        assert!(PoolError::checkout("timed out").to_string().contains("timed out"));
        assert!(PoolError::build("no such dir").to_string().contains("no such dir"));
        assert!(PoolError::migration("bad sql").to_string().contains("bad sql"));
        assert!(PoolError::task("panicked").to_string().contains("panicked"));
    }

    #[rstest]
    fn missing_directory_fails_to_build() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent").join("base.db");
        let config = PoolConfig::new(path.to_string_lossy().into_owned())
            .with_connection_timeout(Duration::from_millis(200));

        assert!(matches!(DbPool::new(config), Err(PoolError::Build { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn migrations_apply_once_and_queries_run() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("base.db");
        let pool = DbPool::new(PoolConfig::new(path.to_string_lossy().into_owned()))
            .expect("pool builds");

        let applied = pool.run_migrations().await.expect("first run");
        assert_eq!(applied.len(), 2);
        let again = pool.run_migrations().await.expect("second run");
        assert!(again.is_empty());

        let answer = pool
            .interact(|conn| {
                diesel::sql_query("SELECT 42 AS value").get_result::<Answer>(conn)
            })
            .await
            .expect("pool available")
            .expect("query succeeds");
        assert_eq!(answer.value, 42);
    }
}

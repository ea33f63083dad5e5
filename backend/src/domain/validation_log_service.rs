//! Validation log domain service.
//!
//! Assigns timestamps and appends entries. The service is optional at the
//! composition root: deployments without an audit trail simply never build
//! one, and collaborators hold an `Option<Arc<ValidationLog>>`.

use std::sync::Arc;

use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::clock::MonotonicClock;
use crate::domain::ports::{ValidationLogRepository, ValidationLogRepositoryError};
use crate::domain::{Error, ValidationEvent, ValidationLogEntry};

/// Append-only validation log.
///
/// Appends are serialised: the timestamp is drawn and the row written while
/// holding `writer`, so storage order and timestamp order agree.
pub struct ValidationLog {
    repository: Arc<dyn ValidationLogRepository>,
    clock: MonotonicClock,
    writer: Mutex<()>,
}

impl ValidationLog {
    /// Create a log writing through `repository` with timestamps from `clock`.
    pub fn new(repository: Arc<dyn ValidationLogRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock: MonotonicClock::new(clock),
            writer: Mutex::new(()),
        }
    }

    /// Continue stamping after the newest stored entry.
    ///
    /// Called once at startup so a wall clock that stepped back across a
    /// restart cannot reuse a stored `(timestamp, card_id)` key.
    pub async fn resume(&self) -> Result<(), Error> {
        let _writer = self.writer.lock().await;
        let latest = self
            .repository
            .latest_timestamp()
            .await
            .map_err(map_log_error)?;
        if let Some(latest) = latest {
            self.clock.observe(latest);
            info!(%latest, "validation log resumed");
        }
        Ok(())
    }

    /// Append one entry stamped with the current time.
    pub async fn append(&self, card_id: &str, status: &str) -> Result<ValidationLogEntry, Error> {
        let _writer = self.writer.lock().await;
        let entry = ValidationLogEntry::new(self.clock.next(), card_id, status);
        self.repository
            .append(&entry)
            .await
            .map_err(map_log_error)?;
        Ok(entry)
    }

    /// Record a reader's validation event, sentinel included.
    pub async fn record_validation(
        &self,
        event: &ValidationEvent,
    ) -> Result<ValidationLogEntry, Error> {
        if event.is_invalid_input() {
            warn!("validation payload unusable; recording invalid input sentinel");
        }
        self.append(event.card_id(), event.status()).await
    }

    /// Every entry in insertion order.
    pub async fn list(&self) -> Result<Vec<ValidationLogEntry>, Error> {
        self.repository.list().await.map_err(map_log_error)
    }
}

fn map_log_error(error: ValidationLogRepositoryError) -> Error {
    match error {
        ValidationLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("validation log unavailable: {message}"))
        }
        ValidationLogRepositoryError::Query { message } => {
            Error::internal(format!("validation log error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockValidationLogRepository;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use mockable::MockClock;
    use mockall::predicate::function;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn clock_at(now: DateTime<Utc>) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        Arc::new(clock)
    }

    #[rstest]
    #[tokio::test]
    async fn append_stamps_and_persists(now: DateTime<Utc>) {
        let mut repository = MockValidationLogRepository::new();
        repository
            .expect_append()
            .with(function(move |entry: &ValidationLogEntry| {
                entry.card_id() == "ABCD1234"
                    && entry.status() == "valid"
                    && entry.timestamp() == now
            }))
            .times(1)
            .returning(|_| Ok(()));
        let log = ValidationLog::new(Arc::new(repository), clock_at(now));

        let entry = log.append("ABCD1234", "valid").await.expect("append");
        assert_eq!(entry.timestamp(), now);
    }

    #[rstest]
    #[tokio::test]
    async fn sentinel_event_is_persisted(now: DateTime<Utc>) {
        let mut repository = MockValidationLogRepository::new();
        repository
            .expect_append()
            .with(function(|entry: &ValidationLogEntry| {
                entry.card_id() == "HAXORS" && entry.status() == "invalid input"
            }))
            .times(1)
            .returning(|_| Ok(()));
        let log = ValidationLog::new(Arc::new(repository), clock_at(now));

        log.record_validation(&ValidationEvent::from_json(b"{}"))
            .await
            .expect("sentinel recorded");
    }

    #[rstest]
    #[tokio::test]
    async fn same_instant_appends_get_distinct_timestamps(now: DateTime<Utc>) {
        let mut repository = MockValidationLogRepository::new();
        repository.expect_append().times(2).returning(|_| Ok(()));
        let log = ValidationLog::new(Arc::new(repository), clock_at(now));

        let first = log.append("ABCD1234", "valid").await.expect("first");
        let second = log.append("ABCD1234", "valid").await.expect("second");
        assert_eq!(second.timestamp() - first.timestamp(), TimeDelta::microseconds(1));
    }

    #[rstest]
    #[tokio::test]
    async fn resume_stamps_after_the_newest_stored_entry(now: DateTime<Utc>) {
        let stored = now + TimeDelta::hours(1);
        let mut repository = MockValidationLogRepository::new();
        repository
            .expect_latest_timestamp()
            .times(1)
            .returning(move || Ok(Some(stored)));
        repository.expect_append().times(1).returning(|_| Ok(()));
        let log = ValidationLog::new(Arc::new(repository), clock_at(now));

        log.resume().await.expect("resume");
        let entry = log.append("ABCD1234", "valid").await.expect("append");
        assert_eq!(entry.timestamp(), stored + TimeDelta::microseconds(1));
    }

    #[rstest]
    #[tokio::test]
    async fn resume_on_empty_log_keeps_the_clock(now: DateTime<Utc>) {
        let mut repository = MockValidationLogRepository::new();
        repository
            .expect_latest_timestamp()
            .returning(|| Ok(None));
        repository.expect_append().returning(|_| Ok(()));
        let log = ValidationLog::new(Arc::new(repository), clock_at(now));

        log.resume().await.expect("resume");
        let entry = log.append("ABCD1234", "valid").await.expect("append");
        assert_eq!(entry.timestamp(), now);
    }

    #[rstest]
    #[case(ValidationLogRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(ValidationLogRepositoryError::query("broken"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_errors_are_mapped(
        now: DateTime<Utc>,
        #[case] failure: ValidationLogRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repository = MockValidationLogRepository::new();
        repository
            .expect_list()
            .returning(move || Err(failure.clone()));
        let log = ValidationLog::new(Arc::new(repository), clock_at(now));

        let err = log.list().await.expect_err("list fails");
        assert_eq!(err.code(), expected);
    }
}

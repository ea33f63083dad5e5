//! Test helpers for inbound HTTP components.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use mockable::DefaultClock;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::{CardRegistry, ValidationLog};
use crate::test_support::{InMemoryCardRepository, InMemoryValidationLogRepository, cheap_credential};

use super::state::HttpState;

pub use crate::test_support::{ADMIN_PASSWORD, ADMIN_USER, basic_auth};

/// In-memory collaborators behind an [`HttpState`], kept for assertions.
pub struct TestBackend {
    pub cards: Arc<InMemoryCardRepository>,
    pub log: Arc<InMemoryValidationLogRepository>,
    pub state: HttpState,
}

/// Build state over in-memory stores with the audit log enabled or disabled.
pub fn test_backend(audit_log: bool, seed: &[&str]) -> TestBackend {
    let cards = Arc::new(InMemoryCardRepository::with_cards(seed.iter().copied()));
    let log = Arc::new(InMemoryValidationLogRepository::default());
    let audit = audit_log.then(|| {
        Arc::new(ValidationLog::new(
            log.clone(),
            Arc::new(DefaultClock),
        ))
    });
    let registry = CardRegistry::new(cards.clone(), audit.clone());
    let state = HttpState::new(Arc::new(cheap_credential()), Arc::new(registry), audit);
    TestBackend { cards, log, state }
}

/// State with empty stores and the audit log enabled.
pub fn test_state() -> HttpState {
    test_backend(true, &[]).state
}

/// Formatted log output captured by [`capture_logs`].
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Number of captured lines containing `needle`.
    pub fn lines_containing(&self, needle: &str) -> usize {
        let buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route events on the current thread into a buffer until the guard drops.
pub fn capture_logs() -> (DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    (tracing::subscriber::set_default(subscriber), logs)
}

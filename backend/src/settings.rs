//! Validator configuration loaded via OrthoConfig.
//!
//! Every value comes from `TICKET_VALIDATOR_*` environment variables. The raw
//! settings are kept permissive so loading never fails on a missing value;
//! the accessors below enforce what startup actually needs.
//!
//! Deployments configured with the older unprefixed names (`MANAGEMENT_USER`,
//! `MANAGEMENT_PASS`, `APP_PASS`, `CARD1`, `CARD2`) keep working: each is used
//! when its prefixed counterpart is unset. No `.env` file is read; export the
//! variables in the service environment instead.

use std::ffi::OsString;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{AdminCredential, CardId, CardIdValidationError, CredentialError};

const PROGRAM_NAME: &str = "ticket-validator";
const DEFAULT_DATABASE_URL: &str = "base.db";
const DEFAULT_PORT: u16 = 5000;

fn load_error(err: impl fmt::Display) -> SettingsError {
    SettingsError::Load {
        message: err.to_string(),
    }
}

/// Errors raised while turning settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// OrthoConfig could not read the configuration sources.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader message.
        message: String,
    },
    /// A required variable was not set.
    #[error("{variable} must be set")]
    Missing {
        /// Environment variable name.
        variable: &'static str,
    },
    /// A seed card identifier was rejected.
    #[error("{variable} is not a valid card id: {source}")]
    InvalidSeedCard {
        /// Environment variable name.
        variable: &'static str,
        /// Validation failure.
        source: CardIdValidationError,
    },
    /// The management credential could not be prepared.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Configuration values for the validator service.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TICKET_VALIDATOR")]
pub struct ValidatorSettings {
    /// Management username.
    pub management_user: Option<String>,
    /// Management password; hashed at startup and never stored.
    pub management_pass: Option<String>,
    /// Application secret key. Accepted for compatibility; nothing reads it.
    pub app_pass: Option<String>,
    /// First seed card identifier.
    pub card1: Option<String>,
    /// Second seed card identifier.
    pub card2: Option<String>,
    /// SQLite database path.
    pub database_url: Option<String>,
    /// Listening port on all interfaces.
    pub port: Option<u16>,
    /// Record validations and management actions in the validation log.
    pub audit_log: Option<bool>,
}

/// Unprefixed names read by earlier deployments.
#[derive(Clone, Deserialize, OrthoConfig)]
struct LegacySettings {
    management_user: Option<String>,
    management_pass: Option<String>,
    app_pass: Option<String>,
    card1: Option<String>,
    card2: Option<String>,
}

impl fmt::Debug for ValidatorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSettings")
            .field("management_user", &self.management_user)
            .field("management_pass", &self.management_pass.as_ref().map(|_| "<redacted>"))
            .field("app_pass", &self.app_pass.as_ref().map(|_| "<redacted>"))
            .field("card1", &self.card1)
            .field("card2", &self.card2)
            .field("database_url", &self.database_url)
            .field("port", &self.port)
            .field("audit_log", &self.audit_log)
            .finish()
    }
}

impl ValidatorSettings {
    /// Load settings from the environment.
    ///
    /// Command-line arguments are not consulted; only the program name is
    /// passed to the loader.
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Self::load_from_iter([OsString::from(PROGRAM_NAME)]).map_err(load_error)?;
        let legacy =
            LegacySettings::load_from_iter([OsString::from(PROGRAM_NAME)]).map_err(load_error)?;
        Ok(settings.with_legacy(legacy))
    }

    fn with_legacy(self, legacy: LegacySettings) -> Self {
        let used_legacy = [
            (self.management_user.is_none(), legacy.management_user.is_some()),
            (self.management_pass.is_none(), legacy.management_pass.is_some()),
            (self.app_pass.is_none(), legacy.app_pass.is_some()),
            (self.card1.is_none(), legacy.card1.is_some()),
            (self.card2.is_none(), legacy.card2.is_some()),
        ]
        .iter()
        .any(|(missing, present)| *missing && *present);
        if used_legacy {
            warn!("using unprefixed configuration names; rename them to TICKET_VALIDATOR_*");
        }

        Self {
            management_user: self.management_user.or(legacy.management_user),
            management_pass: self.management_pass.or(legacy.management_pass),
            app_pass: self.app_pass.or(legacy.app_pass),
            card1: self.card1.or(legacy.card1),
            card2: self.card2.or(legacy.card2),
            ..self
        }
    }

    /// Configured database path, falling back to `base.db`.
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    /// Configured port, falling back to 5000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port()))
    }

    /// Whether the validation log is enabled, defaulting to on.
    pub fn audit_log_enabled(&self) -> bool {
        self.audit_log.unwrap_or(true)
    }

    /// The two seed card identifiers, in configuration order.
    pub fn seed_cards(&self) -> Result<Vec<CardId>, SettingsError> {
        [
            ("TICKET_VALIDATOR_CARD1", &self.card1),
            ("TICKET_VALIDATOR_CARD2", &self.card2),
        ]
        .into_iter()
        .map(|(variable, value)| {
            let raw = value
                .as_deref()
                .ok_or(SettingsError::Missing { variable })?;
            CardId::new(raw).map_err(|source| SettingsError::InvalidSeedCard { variable, source })
        })
        .collect()
    }

    /// Hash the configured management password.
    pub fn admin_credential(&self) -> Result<AdminCredential, SettingsError> {
        let username = self
            .management_user
            .as_deref()
            .ok_or(SettingsError::Missing {
                variable: "TICKET_VALIDATOR_MANAGEMENT_USER",
            })?;
        let password = self
            .management_pass
            .as_ref()
            .map(|pass| Zeroizing::new(pass.clone()))
            .ok_or(SettingsError::Missing {
                variable: "TICKET_VALIDATOR_MANAGEMENT_PASS",
            })?;
        Ok(AdminCredential::hash(username, password)?)
    }
}

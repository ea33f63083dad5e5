//! Management credential primitives.
//!
//! The service has exactly one administrator. Its password is hashed with
//! Argon2id at startup and only the PHC-formatted hash is retained; the
//! plaintext supplied by configuration is wiped when it goes out of scope.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::Error;

/// Errors raised while parsing an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasicCredentialsError {
    /// The header does not use the `Basic` scheme.
    #[error("authorization scheme must be Basic")]
    UnsupportedScheme,
    /// The token is not valid base64.
    #[error("basic credentials are not valid base64")]
    InvalidEncoding,
    /// The decoded token is not UTF-8.
    #[error("basic credentials are not valid UTF-8")]
    InvalidUtf8,
    /// The decoded token has no `:` separator.
    #[error("basic credentials must contain a ':' separator")]
    MissingSeparator,
}

/// Username/password pair presented with a request.
///
/// # Examples
/// ```
/// use ticket_validator::domain::BasicCredentials;
///
/// // "admin:hunter2"
/// let creds = BasicCredentials::from_header("Basic YWRtaW46aHVudGVyMg==").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl BasicCredentials {
    /// Build credentials from already-decoded parts.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Parse the value of an `Authorization: Basic <token>` header.
    pub fn from_header(value: &str) -> Result<Self, BasicCredentialsError> {
        let (scheme, token) = value
            .trim()
            .split_once(' ')
            .ok_or(BasicCredentialsError::UnsupportedScheme)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(BasicCredentialsError::UnsupportedScheme);
        }

        let decoded = Zeroizing::new(
            STANDARD
                .decode(token.trim())
                .map_err(|_| BasicCredentialsError::InvalidEncoding)?,
        );
        let decoded =
            std::str::from_utf8(&decoded).map_err(|_| BasicCredentialsError::InvalidUtf8)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or(BasicCredentialsError::MissingSeparator)?;
        Ok(Self::new(username, password))
    }

    /// Presented username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Presented password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity established by a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity(String);

impl AdminIdentity {
    /// Identity for `username`.
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Authenticated username.
    pub fn username(&self) -> &str {
        self.0.as_str()
    }
}

/// Errors raised while preparing the administrator credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// Username was blank.
    #[error("management username must not be empty")]
    EmptyUsername,
    /// Password was empty.
    #[error("management password must not be empty")]
    EmptyPassword,
    /// Hashing failed.
    #[error("failed to hash management password: {message}")]
    Hashing {
        /// Underlying hasher message.
        message: String,
    },
}

/// The single administrator credential: a username and a salted password hash.
#[derive(Clone)]
pub struct AdminCredential {
    username: String,
    password_hash: String,
}

impl AdminCredential {
    /// Hash `password` with the default Argon2id parameters.
    pub fn hash(username: &str, password: Zeroizing<String>) -> Result<Self, CredentialError> {
        Self::hash_with(username, password, &Argon2::default())
    }

    /// Hash `password` with explicit Argon2id cost parameters.
    ///
    /// Verification reads the parameters back from the stored hash, so cheap
    /// parameters are only ever a property of the credential they produced.
    pub fn hash_with_params(
        username: &str,
        password: Zeroizing<String>,
        params: Params,
    ) -> Result<Self, CredentialError> {
        let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Self::hash_with(username, password, &hasher)
    }

    fn hash_with(
        username: &str,
        password: Zeroizing<String>,
        hasher: &Argon2<'_>,
    ) -> Result<Self, CredentialError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialError::Hashing {
                message: err.to_string(),
            })?
            .to_string();

        Ok(Self {
            username: username.to_owned(),
            password_hash,
        })
    }

    /// Configured administrator username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Check presented credentials against the stored hash.
    pub fn verify(&self, credentials: &BasicCredentials) -> Result<AdminIdentity, Error> {
        if credentials.username() != self.username {
            return Err(Error::unauthorized("invalid credentials"));
        }

        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|err| Error::internal(format!("stored password hash is invalid: {err}")))?;
        Argon2::default()
            .verify_password(credentials.password().as_bytes(), &parsed)
            .map(|()| AdminIdentity(self.username.clone()))
            .map_err(|_| Error::unauthorized("invalid credentials"))
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

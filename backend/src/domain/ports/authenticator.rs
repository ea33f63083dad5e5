//! Driving port for management authentication.
//!
//! HTTP extractors call this port so handler tests can substitute a cheap
//! double instead of hashing real passwords.

use crate::domain::{AdminCredential, AdminIdentity, BasicCredentials, Error};

/// Verifies credentials presented to protected routes.
pub trait Authenticator: Send + Sync {
    /// Return the identity when `credentials` match, otherwise an
    /// unauthorised error.
    fn authenticate(&self, credentials: &BasicCredentials) -> Result<AdminIdentity, Error>;
}

impl Authenticator for AdminCredential {
    fn authenticate(&self, credentials: &BasicCredentials) -> Result<AdminIdentity, Error> {
        self.verify(credentials)
    }
}

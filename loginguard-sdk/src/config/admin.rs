//! Admin credential for the settings endpoints.

use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Header carrying the plaintext admin secret on settings requests.
pub const ADMIN_AUTH_HEADER: &str = "LoginGuard-Admin-Authorization";

/// Argon2 hash of the secret that authorizes settings changes.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    secret_hash: String,
}

impl AdminCredential {
    pub fn new(secret_hash: impl Into<String>) -> Self {
        Self {
            secret_hash: secret_hash.into(),
        }
    }

    /// Check a presented secret. An unparseable stored hash never matches.
    pub fn matches(&self, presented: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.secret_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok()
    }
}

//! Access gate — pluggable shared-secret check.
//!
//! DESIGN
//! ======
//! The gating flow only needs `validate(secret) -> bool`; the comparison
//! mechanism hides behind `CredentialCheck` so a hash, static string, or
//! remote check can be swapped without touching the routes. The shipped
//! implementation compares SHA-256 digests, keeping the configured passcode
//! out of memory dumps and debug output.

use sha2::{Digest, Sha256};

pub trait CredentialCheck: Send + Sync {
    fn validate(&self, secret: &str) -> bool;
}

/// Digest comparison against a passcode configured at startup.
pub struct StaticPasscode {
    digest: [u8; 32],
}

impl StaticPasscode {
    #[must_use]
    pub fn new(passcode: &str) -> Self {
        Self { digest: Sha256::digest(passcode.as_bytes()).into() }
    }

    /// Read `PASSCODE` from the environment. `None` disables the gate.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("PASSCODE")
            .ok()
            .filter(|p| !p.is_empty())
            .map(|p| Self::new(&p))
    }
}

impl CredentialCheck for StaticPasscode {
    fn validate(&self, secret: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        candidate == self.digest
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

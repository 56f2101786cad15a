// ── Credential resolution ──
//
// Integration documents name their credentials by variable; this chain turns
// a name into a secret. Environment first, then the system keyring entry
// `aegis/<NAME>`.

use secrecy::SecretString;
use tracing::debug;

use aegis_core::SecretStore;

/// Keyring service every secret is stored under.
pub const KEYRING_SERVICE: &str = "aegis";

#[derive(Debug, Clone)]
pub struct SecretChain {
    service: String,
    use_keyring: bool,
}

impl Default for SecretChain {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretChain {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.into(),
            use_keyring: true,
        }
    }

    /// Environment only; for hosts without a keyring daemon.
    pub fn env_only() -> Self {
        Self {
            use_keyring: false,
            ..Self::new()
        }
    }

    fn keyring_secret(&self, name: &str) -> Option<SecretString> {
        let entry = match keyring::Entry::new(&self.service, name) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(name, error = %e, "keyring entry unavailable");
                return None;
            }
        };
        match entry.get_password() {
            Ok(secret) => Some(SecretString::from(secret)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                debug!(name, error = %e, "keyring lookup failed");
                None
            }
        }
    }
}

impl SecretStore for SecretChain {
    fn secret(&self, name: &str) -> Option<SecretString> {
        // 1. Env var
        if let Ok(value) = std::env::var(name) {
            return Some(SecretString::from(value));
        }

        // 2. System keyring
        if self.use_keyring {
            return self.keyring_secret(name);
        }
        None
    }
}

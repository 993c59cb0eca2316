use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// API key and secret issued by Animoto.
///
/// Immutable once built. The secret is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Value for the `Authorization` header: `Basic base64(key:secret)`.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.key, self.secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_encodes_key_and_secret() {
        let credentials = Credentials::new("k", "s");
        assert_eq!(credentials.basic_auth_header(), "Basic azpz");
    }

    #[test]
    fn debug_output_hides_secret() {
        let credentials = Credentials::new("key-1", "hunter2");
        let printed = format!("{credentials:?}");
        assert!(printed.contains("key-1"));
        assert!(!printed.contains("hunter2"));
    }
}

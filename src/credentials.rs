//! Caller-owned API credentials.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// API key, shared secret and (once authenticated) session key.
///
/// Passed by reference into every call. The library never mutates it; the
/// caller sets the session key after completing the auth handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Public API key, sent with every request
    pub api_key: String,
    /// Shared secret, used only to compute `api_sig`
    pub secret: String,
    /// Session key ("sk"), empty until authenticated
    pub session_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            session_key: String::new(),
        }
    }

    /// Builder-style variant of [`Credentials::set_session_key`].
    pub fn with_session_key(mut self, session_key: impl Into<String>) -> Self {
        self.session_key = session_key.into();
        self
    }

    pub fn set_session_key(&mut self, session_key: impl Into<String>) {
        self.session_key = session_key.into();
    }

    pub fn has_session(&self) -> bool {
        !self.session_key.is_empty()
    }

    /// Fail with [`Error::AuthRequired`] unless a session key is present.
    pub fn require_session(&self) -> Result<&str> {
        if self.has_session() {
            Ok(&self.session_key)
        } else {
            Err(Error::AuthRequired)
        }
    }
}

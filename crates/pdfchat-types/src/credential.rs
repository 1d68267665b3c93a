use std::fmt;

use crate::{ChatError, Result};

/// Pattern every accepted provider key must contain
pub const API_KEY_MARKER: &str = "sk-";

/// An API key that passed the superficial format check.
///
/// This is not a provider round-trip; it only keeps obviously wrong input
/// from ever reaching the network.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(ChatError::Credential("no API key provided".to_string()));
        }
        if !key.contains(API_KEY_MARKER) {
            return Err(ChatError::Credential(format!(
                "API key does not look like a provider key (expected '{}')",
                API_KEY_MARKER
            )));
        }
        Ok(Self(key.to_string()))
    }

    /// The raw secret, for the Authorization header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        format!("{}***", self.0.chars().take(6).collect::<String>())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Identifies one browser-like session. Each session owns a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Name of the session used when none is given.
    pub const DEFAULT: &'static str = "default";

    /// Create a session id.
    ///
    /// Ids are used as file names by some backends, so only ASCII
    /// alphanumerics, `-` and `_` are accepted.
    pub fn new(value: impl Into<String>) -> Result<Self, StateError> {
        let value = value.into();
        let valid = !value.is_empty()
            && value.len() <= 64
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(value))
        } else {
            Err(StateError::InvalidSession(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_file_safe_ids() {
        assert_eq!(SessionId::new("tab-1_a").unwrap().as_str(), "tab-1_a");
        assert_eq!(SessionId::default().as_str(), "default");
    }

    #[test]
    fn rejects_path_like_ids() {
        let too_long = "x".repeat(65);
        for bad in ["", "../etc", "a/b", "with space", too_long.as_str()] {
            assert!(SessionId::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}

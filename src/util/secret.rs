//! Secret string type for safe token handling.

use serde::Deserialize;
use std::fmt;

/// A wrapper for the GitLab personal access token that prevents accidental
/// logging.
///
/// `Debug` and `Display` print `[REDACTED]`; the actual value is only
/// reachable through [`SecretString::expose_secret`], which keeps every use
/// of the raw token greppable.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Explicitly expose the secret value, e.g. to build an
    /// `Authorization` header.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best-effort memory clearing; not a guarantee, the compiler may
        // elide it or the string may have been reallocated earlier.
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_redacted() {
        let secret = SecretString::new("glpat-abc123");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn test_expose_secret() {
        let secret = SecretString::new("glpat-abc123");
        assert_eq!(secret.expose_secret(), "glpat-abc123");
    }

    #[test]
    fn test_clone_keeps_value() {
        let secret = SecretString::new("glpat-abc123");
        assert_eq!(secret.clone().expose_secret(), "glpat-abc123");
    }
}

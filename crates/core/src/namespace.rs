//! Customer namespaces.
//!
//! A namespace is the validated form of the `{customer}` path segment. It is the
//! tenant boundary for every store operation, so validation happens here, once,
//! before any storage access.

use crate::error::DomainError;

/// Validated customer identifier (`[A-Za-z0-9]+`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Validate a raw customer identifier.
    ///
    /// Only ASCII letters and digits are accepted. Anything else, including
    /// whitespace, quotes, backticks and non-ASCII letters, is rejected.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::invalid_namespace("customer name is required"));
        }
        if let Some(bad) = raw.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_namespace(format!(
                "customer name may only contain letters and digits (found {bad:?})"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Namespace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

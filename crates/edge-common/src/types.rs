//! Service identity.
//!
//! A service key names one logical remote service contract in the form
//! `group/fully.qualified.Interface:version`. Both the group prefix and the
//! version suffix are optional.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Error, Result};

/// Service key - uniquely identifies a remote service contract.
///
/// The raw string is kept as-is and is what the endpoint cache hashes on;
/// the group / interface / version parts are derived on demand.
///
/// # Example
/// ```
/// use edge_common::ServiceKey;
///
/// let key = ServiceKey::from("dubbo/com.example.FooService:1.0");
/// assert_eq!(key.group(), Some("dubbo"));
/// assert_eq!(key.interface(), "com.example.FooService");
/// assert_eq!(key.version(), Some("1.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceKey(String);

impl ServiceKey {
    /// Creates a service key without validating it.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Parses and validates a service key.
    ///
    /// The interface segment must be non-empty and must not contain
    /// whitespace. Empty group or version segments are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let key = Self(raw.to_string());

        if raw.trim().is_empty() {
            return Err(Error::invalid_service_key(raw, "key is empty"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(Error::invalid_service_key(raw, "key contains whitespace"));
        }
        if matches!(key.group(), Some("")) || raw.starts_with('/') {
            return Err(Error::invalid_service_key(raw, "group segment is empty"));
        }
        if matches!(key.version(), Some("")) {
            return Err(Error::invalid_service_key(raw, "version segment is empty"));
        }
        if key.interface().is_empty() {
            return Err(Error::invalid_service_key(raw, "interface segment is empty"));
        }

        Ok(key)
    }

    /// Builds a key from its parts.
    pub fn from_parts(group: Option<&str>, interface: &str, version: Option<&str>) -> Self {
        let mut raw = String::new();
        if let Some(group) = group.filter(|g| !g.is_empty()) {
            raw.push_str(group);
            raw.push('/');
        }
        raw.push_str(interface);
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            raw.push(':');
            raw.push_str(version);
        }
        Self(raw)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Group prefix (text before the first `/`), if any.
    pub fn group(&self) -> Option<&str> {
        self.0.split_once('/').map(|(group, _)| group)
    }

    /// Fully qualified interface name.
    pub fn interface(&self) -> &str {
        let rest = self.without_group();
        match rest.rsplit_once(':') {
            Some((interface, _)) => interface,
            None => rest,
        }
    }

    /// Version suffix (text after the last `:`), if any.
    pub fn version(&self) -> Option<&str> {
        self.without_group().rsplit_once(':').map(|(_, version)| version)
    }

    /// Unqualified interface name (`FooService` for `com.example.FooService`).
    pub fn simple_name(&self) -> &str {
        let interface = self.interface();
        interface.rsplit('.').next().unwrap_or(interface)
    }

    fn without_group(&self) -> &str {
        match self.0.split_once('/') {
            Some((_, rest)) => rest,
            None => &self.0,
        }
    }
}

impl From<&str> for ServiceKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ServiceKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ServiceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_key() {
        let key = ServiceKey::from("dubbo/com.example.FooService:1.0");
        assert_eq!(key.group(), Some("dubbo"));
        assert_eq!(key.interface(), "com.example.FooService");
        assert_eq!(key.version(), Some("1.0"));
        assert_eq!(key.simple_name(), "FooService");
        assert_eq!(key.to_string(), "dubbo/com.example.FooService:1.0");
    }

    #[test]
    fn test_optional_segments() {
        let key = ServiceKey::from("com.example.FooService");
        assert_eq!(key.group(), None);
        assert_eq!(key.interface(), "com.example.FooService");
        assert_eq!(key.version(), None);

        let key = ServiceKey::from("com.example.FooService:2.1.0");
        assert_eq!(key.group(), None);
        assert_eq!(key.version(), Some("2.1.0"));
    }

    #[test]
    fn test_from_parts_matches_parse() {
        let key = ServiceKey::from_parts(Some("g"), "com.example.Bar", Some("1.0"));
        assert_eq!(key, ServiceKey::parse("g/com.example.Bar:1.0").unwrap());

        let key = ServiceKey::from_parts(None, "com.example.Bar", None);
        assert_eq!(key.as_str(), "com.example.Bar");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ServiceKey::parse("").is_err());
        assert!(ServiceKey::parse("/com.example.Foo").is_err());
        assert!(ServiceKey::parse("g/:1.0").is_err());
        assert!(ServiceKey::parse("com.example.Foo:").is_err());
        assert!(ServiceKey::parse("com.example Foo").is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let key = ServiceKey::from("g/com.example.Foo:1.0");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"g/com.example.Foo:1.0\"");
    }
}

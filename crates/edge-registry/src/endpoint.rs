//! Registry endpoint type.
//!
//! An endpoint is one concrete provider of a service: protocol, host and
//! port plus the free-form parameters the provider registered with (the
//! implementation interface, its version, timeouts, ...). Registries hand
//! these out in URL form:
//!
//! ```text
//! dubbo://10.0.0.1:20880/com.example.FooService?interface=com.example.FooService&version=1.0
//! ```

use edge_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque numeric id the registry assigns to one provider instance.
pub type InstanceId = u64;

/// Parameter holding the implementation interface name.
pub const INTERFACE_KEY: &str = "interface";

/// Parameter holding the provider's service version.
pub const VERSION_KEY: &str = "version";

/// Parameter holding the provider's service group.
pub const GROUP_KEY: &str = "group";

/// One network location offering a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Protocol name (e.g., "dubbo").
    pub protocol: String,

    pub host: String,

    pub port: u16,

    /// URL path; registries put the interface name here.
    #[serde(default)]
    pub path: String,

    /// Registered metadata. A `BTreeMap` keeps rendering deterministic.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Endpoint {
    /// Creates an endpoint with no path and no parameters.
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port,
            path: String::new(),
            parameters: BTreeMap::new(),
        }
    }

    /// Sets the URL path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Adds one metadata parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Parses a registry URL of the form `protocol://host:port/path?k=v&k2=v2`.
    ///
    /// Query values are taken verbatim (no percent-decoding).
    pub fn parse(url: &str) -> Result<Self> {
        let (protocol, rest) = url
            .split_once("://")
            .ok_or_else(|| Error::invalid_endpoint(url, "missing '://' separator"))?;
        if protocol.is_empty() {
            return Err(Error::invalid_endpoint(url, "protocol is empty"));
        }

        let (location, query) = match rest.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (rest, None),
        };
        let (authority, path) = match location.split_once('/') {
            Some((authority, path)) => (authority, path),
            None => (location, ""),
        };

        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| Error::invalid_endpoint(url, "missing port"))?;
        if host.is_empty() {
            return Err(Error::invalid_endpoint(url, "host is empty"));
        }
        let port: u16 = port
            .parse()
            .map_err(|e| Error::invalid_endpoint(url, format!("invalid port '{}': {}", port, e)))?;

        let mut parameters = BTreeMap::new();
        for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            parameters.insert(key.to_string(), value.to_string());
        }

        Ok(Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
            port,
            path: path.to_string(),
            parameters,
        })
    }

    /// Returns `protocol://host:port`, the form shown to callers.
    pub fn address(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Looks up a metadata parameter.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Implementation interface name: the `interface` parameter if set,
    /// otherwise the URL path.
    pub fn interface_name(&self) -> Option<&str> {
        self.parameter(INTERFACE_KEY)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.path.as_str()).filter(|p| !p.is_empty()))
    }

    /// Version the provider registered with.
    pub fn version(&self) -> Option<&str> {
        self.parameter(VERSION_KEY).filter(|s| !s.is_empty())
    }

    /// Group the provider registered with.
    pub fn group(&self) -> Option<&str> {
        self.parameter(GROUP_KEY).filter(|s| !s.is_empty())
    }

    /// Instance id derived from the endpoint's full identity.
    ///
    /// Used when a notification carries bare URLs instead of registry ids.
    /// Stable within one process only.
    pub fn derived_instance_id(&self) -> InstanceId {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        for (i, (key, value)) in self.parameters.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

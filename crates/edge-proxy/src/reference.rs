//! Proxy construction seam.
//!
//! # Rust Learning Note
//!
//! The RPC transport lives outside this workspace. We only describe *what*
//! to connect to ([`ReferenceConfig`]) and let a [`ReferenceFactory`]
//! implementation do the connecting:
//!
//! ```text
//! ProxyResolver ──ReferenceConfig──▶ dyn ReferenceFactory ──▶ Arc<dyn ServiceProxy>
//!                                     (external transport)
//! ```
//!
//! Both traits are object-safe, so the resolver stores the factory as an
//! `Arc<dyn ReferenceFactory>` and callers receive `Arc<dyn ServiceProxy>`.
//! `async_trait` boxes the futures so `async fn` works behind `dyn`.

use async_trait::async_trait;
use edge_common::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Identity of the calling application, reported to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name (e.g., "edge-gateway").
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl ApplicationConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            organization: None,
        }
    }
}

/// Registry the transport should discover providers through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry address (e.g., "zookeeper://127.0.0.1:2181").
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Registry session timeout in milliseconds.
    #[serde(default = "default_registry_timeout_ms")]
    pub timeout_ms: u64,
}

impl RegistryConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            protocol: None,
            group: None,
            timeout_ms: default_registry_timeout_ms(),
        }
    }
}

fn default_registry_timeout_ms() -> u64 {
    5000
}

/// Everything the transport needs to build one proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub application: ApplicationConfig,

    pub registry: RegistryConfig,

    /// Whether the transport should verify a provider is reachable before
    /// returning. Always `false` here: providers come and go, and a missing
    /// one must not fail proxy construction.
    pub check: bool,

    /// Fully qualified interface the proxy implements.
    pub interface: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Explicit provider URL. When set, the transport binds directly to it
    /// instead of discovering providers through the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ReferenceConfig {
    /// Returns true if the proxy is pinned to an explicit provider URL.
    pub fn is_direct(&self) -> bool {
        self.url.is_some()
    }
}

/// A constructed remote-service handle.
///
/// Proxies are expensive (they own transport connections); callers should
/// build one per (service key, explicit URL) and reuse it.
#[async_trait]
pub trait ServiceProxy: Send + Sync {
    /// The configuration this proxy was built from.
    fn reference(&self) -> &ReferenceConfig;

    /// Invokes `method` with positional JSON arguments.
    async fn invoke(&self, method: &str, args: Vec<Value>) -> Result<Value>;
}

/// Builds proxies from reference configurations.
///
/// Implemented by the RPC transport. Errors are returned to the caller of
/// the resolver unmodified; construction is never retried here.
#[async_trait]
pub trait ReferenceFactory: Send + Sync {
    async fn create(&self, reference: ReferenceConfig) -> Result<Arc<dyn ServiceProxy>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_config_defaults() {
        let registry: RegistryConfig =
            serde_json::from_str(r#"{"address":"zookeeper://127.0.0.1:2181"}"#).unwrap();
        assert_eq!(registry.timeout_ms, 5000);
        assert_eq!(registry, RegistryConfig::new("zookeeper://127.0.0.1:2181"));
    }

    #[test]
    fn test_reference_config_skips_empty_fields() {
        let reference = ReferenceConfig {
            application: ApplicationConfig::new("edge"),
            registry: RegistryConfig::new("zookeeper://127.0.0.1:2181"),
            check: false,
            interface: "com.example.FooService".to_string(),
            version: None,
            url: None,
        };

        let json = serde_json::to_value(&reference).unwrap();
        assert!(json.get("url").is_none());
        assert!(json.get("version").is_none());
        assert!(!reference.is_direct());
    }
}

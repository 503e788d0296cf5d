//! Proxy resolution.
//!
//! # Architecture
//!
//! ```text
//! resolve(key, url?)
//! ├── EndpointSelector::select(key)      ── none ──▶ Err(NotFound)
//! ├── read interface + version from the selected endpoint
//! ├── build ReferenceConfig (application, registry, check = false, url?)
//! └── ReferenceFactory::create(config)   ── transport errors pass through
//! ```
//!
//! The resolver caches nothing. Every call builds a new proxy, so callers
//! are expected to keep the result per (key, url).

use edge_common::{Error, Result, ServiceKey};
use edge_registry::EndpointSelector;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::reference::{
    ApplicationConfig, ReferenceConfig, ReferenceFactory, RegistryConfig, ServiceProxy,
};

/// Turns service keys into remote-service proxies.
pub struct ProxyResolver {
    selector: EndpointSelector,
    application: ApplicationConfig,
    registry: RegistryConfig,
    factory: Arc<dyn ReferenceFactory>,
}

impl ProxyResolver {
    /// Creates a resolver.
    ///
    /// # Arguments
    ///
    /// * `selector` - Endpoint selection over the shared cache
    /// * `application` - Identity reported to the transport
    /// * `registry` - Registry the transport discovers providers through
    /// * `factory` - Transport-side proxy builder
    pub fn new(
        selector: EndpointSelector,
        application: ApplicationConfig,
        registry: RegistryConfig,
        factory: Arc<dyn ReferenceFactory>,
    ) -> Self {
        Self {
            selector,
            application,
            registry,
            factory,
        }
    }

    /// Builds the reference configuration for `key` without touching the
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no endpoint is known for `key`.
    pub fn reference_for(
        &self,
        key: &ServiceKey,
        explicit_url: Option<&str>,
    ) -> Result<ReferenceConfig> {
        let endpoint = self
            .selector
            .select(key)
            .ok_or_else(|| Error::not_found(key.clone()))?;

        let interface = endpoint
            .interface_name()
            .unwrap_or_else(|| key.interface())
            .to_string();
        let version = endpoint.version().map(str::to_string);

        // Blank URLs count as absent
        let url = explicit_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        trace!(
            "Reference for {}: interface={}, version={:?}, url={:?}",
            key, interface, version, url
        );

        Ok(ReferenceConfig {
            application: self.application.clone(),
            registry: self.registry.clone(),
            check: false,
            interface,
            version,
            url,
        })
    }

    /// Resolves `key` to a proxy, bound to `explicit_url` when one is given.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no endpoint is known for `key`
    /// - whatever the [`ReferenceFactory`] returns, unchanged
    pub async fn resolve(
        &self,
        key: &ServiceKey,
        explicit_url: Option<&str>,
    ) -> Result<Arc<dyn ServiceProxy>> {
        let reference = self.reference_for(key, explicit_url)?;
        debug!(
            "Building proxy for {} ({})",
            key,
            reference.url.as_deref().unwrap_or("registry discovery")
        );

        let proxy = self.factory.create(reference).await?;

        info!("✅ Proxy ready for {}", key);
        Ok(proxy)
    }

    /// Returns the selector this resolver reads from.
    pub fn selector(&self) -> &EndpointSelector {
        &self.selector
    }
}

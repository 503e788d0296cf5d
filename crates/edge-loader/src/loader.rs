//! Interface loader facade.
//!
//! # Architecture
//!
//! ```text
//!                      ┌──────────────────────┐
//!   registry push ───▶ │    EndpointCache     │ ◀─── EdgeConfig snapshot
//!                      └──────────┬───────────┘
//!                                 │ EndpointSelector (shared)
//!                ┌────────────────┼──────────────────────┐
//!                ▼                ▼                      ▼
//!         ProxyResolver   list_endpoint_addresses   ParameterDescriptorGenerator
//!                │                │                      │
//!     get_service_bean    get_service_urls         get_param_desc
//! ```
//!
//! The loader owns nothing the callers could not build themselves; it wires
//! the pieces over one cache and turns internal errors into the forgiving
//! results the lookup surface promises (`None` or an empty string).

use anyhow::Context;
use edge_common::{Result, ServiceKey};
use edge_introspect::{MethodIntrospector, MethodSignature, ParameterDescriptorGenerator, TypeRegistry};
use edge_proxy::{ApplicationConfig, ProxyResolver, ReferenceFactory, RegistryConfig, ServiceProxy};
use edge_registry::{EndpointCache, EndpointSelector};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::EdgeConfig;

/// Entry point for looking up services by key.
pub struct InterfaceLoader {
    cache: EndpointCache,
    registry: TypeRegistry,
    resolver: ProxyResolver,
    descriptors: ParameterDescriptorGenerator,
}

impl InterfaceLoader {
    /// Wires a loader over an existing cache and type registry.
    pub fn new(
        cache: EndpointCache,
        registry: TypeRegistry,
        application: ApplicationConfig,
        registry_config: RegistryConfig,
        factory: Arc<dyn ReferenceFactory>,
    ) -> Self {
        let selector = EndpointSelector::new(cache.clone());
        let resolver = ProxyResolver::new(selector.clone(), application, registry_config, factory);
        let descriptors = ParameterDescriptorGenerator::new(selector, registry.clone());

        Self {
            cache,
            registry,
            resolver,
            descriptors,
        }
    }

    /// Builds a loader from configuration, seeding the cache from the
    /// provider snapshot.
    pub fn from_config(
        config: &EdgeConfig,
        factory: Arc<dyn ReferenceFactory>,
    ) -> anyhow::Result<Self> {
        let cache = EndpointCache::new();
        config
            .seed_cache(&cache)
            .context("Failed to seed endpoint cache")?;
        let registry = config.build_type_registry();

        info!(
            "Interface loader for {} ready: {} service key(s), {} service type(s)",
            config.application.name,
            cache.len(),
            registry.service_names().len()
        );

        Ok(Self::new(
            cache,
            registry,
            config.application.clone(),
            config.registry.clone(),
            factory,
        ))
    }

    /// Returns a proxy for `key`, optionally pinned to `service_url`.
    ///
    /// `Ok(None)` means no provider is known for the key. Transport failures
    /// are returned as errors.
    pub async fn get_service_bean(
        &self,
        key: &ServiceKey,
        service_url: Option<&str>,
    ) -> Result<Option<Arc<dyn ServiceProxy>>> {
        match self.resolver.resolve(key, service_url).await {
            Ok(proxy) => Ok(Some(proxy)),
            Err(e) if e.is_not_found() => {
                debug!("No provider for {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("Failed to build proxy for {}: {}", key, e);
                Err(e)
            }
        }
    }

    /// Same as [`InterfaceLoader::get_service_bean`] with registry discovery.
    pub async fn get_service_bean_default(
        &self,
        key: &ServiceKey,
    ) -> Result<Option<Arc<dyn ServiceProxy>>> {
        self.get_service_bean(key, None).await
    }

    /// Finds `method_name` on the interface a proxy implements.
    pub fn get_service_method(
        &self,
        proxy: &dyn ServiceProxy,
        method_name: &str,
    ) -> Option<MethodSignature> {
        let interface = &proxy.reference().interface;
        match MethodIntrospector::new(self.registry.clone()).find_method(interface, method_name) {
            Ok(method) => Some(method),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }

    /// Lists `protocol://host:port` for every provider of `key`.
    pub fn get_service_urls(&self, key: &ServiceKey) -> Option<Vec<String>> {
        self.resolver.selector().list_endpoint_addresses(key)
    }

    /// JSON array of default arguments for `method_name`, or `""` when the
    /// service or method is unknown.
    pub fn get_param_desc(&self, key: &ServiceKey, method_name: &str) -> String {
        self.descriptors.describe(key, method_name)
    }

    pub fn cache(&self) -> &EndpointCache {
        &self.cache
    }

    pub fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &ProxyResolver {
        &self.resolver
    }

    pub fn descriptors(&self) -> &ParameterDescriptorGenerator {
        &self.descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use edge_common::Error;
    use edge_introspect::ServiceType;
    use edge_proxy::ReferenceConfig;
    use edge_registry::Endpoint;
    use serde_json::Value;

    struct EchoProxy {
        reference: ReferenceConfig,
    }

    #[async_trait]
    impl ServiceProxy for EchoProxy {
        fn reference(&self) -> &ReferenceConfig {
            &self.reference
        }

        async fn invoke(&self, _method: &str, args: Vec<Value>) -> Result<Value> {
            Ok(Value::Array(args))
        }
    }

    struct EchoFactory {
        fail: bool,
    }

    #[async_trait]
    impl ReferenceFactory for EchoFactory {
        async fn create(&self, reference: ReferenceConfig) -> Result<Arc<dyn ServiceProxy>> {
            if self.fail {
                return Err(Error::transport("no route to host"));
            }
            Ok(Arc::new(EchoProxy { reference }))
        }
    }

    fn loader(fail: bool) -> InterfaceLoader {
        let cache = EndpointCache::new();
        cache.notify(
            ServiceKey::from("com.example.FooService"),
            vec![Endpoint::new("dubbo", "10.0.0.1", 20880).with_path("com.example.FooService")],
        );

        let registry = TypeRegistry::with_builtins();
        registry.register_service(
            ServiceType::new("com.example.FooService").method("get", ["long"]),
        );

        InterfaceLoader::new(
            cache,
            registry,
            ApplicationConfig::new("edge-test"),
            RegistryConfig::new("zookeeper://127.0.0.1:2181"),
            Arc::new(EchoFactory { fail }),
        )
    }

    #[tokio::test]
    async fn test_unknown_key_yields_none() {
        let bean = loader(false)
            .get_service_bean_default(&ServiceKey::from("com.example.Missing"))
            .await
            .unwrap();
        assert!(bean.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let result = loader(true)
            .get_service_bean_default(&ServiceKey::from("com.example.FooService"))
            .await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn test_service_method_from_proxy() {
        let loader = loader(false);
        let proxy = loader
            .get_service_bean_default(&ServiceKey::from("com.example.FooService"))
            .await
            .unwrap()
            .unwrap();

        let method = loader.get_service_method(proxy.as_ref(), "get").unwrap();
        assert_eq!(method.parameter_types, vec!["long"]);
        assert!(loader.get_service_method(proxy.as_ref(), "put").is_none());
    }

    #[test]
    fn test_urls_and_descriptor() {
        let loader = loader(false);
        let key = ServiceKey::from("com.example.FooService");

        assert_eq!(
            loader.get_service_urls(&key),
            Some(vec!["dubbo://10.0.0.1:20880".to_string()])
        );
        assert_eq!(loader.get_param_desc(&key, "get"), "[null]");
        assert_eq!(loader.get_service_urls(&ServiceKey::from("x.Y")), None);
    }
}

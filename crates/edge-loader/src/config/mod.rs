use anyhow::{Context, Result};
use edge_common::ServiceKey;
use edge_introspect::{ServiceType, TypeDescriptor, TypeKind, TypeRegistry};
use edge_proxy::{ApplicationConfig, RegistryConfig};
use edge_registry::{Endpoint, EndpointCache};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub mod validation;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub application: ApplicationConfig,
    pub registry: RegistryConfig,

    /// Offline registry snapshot used to seed the endpoint cache
    #[serde(default)]
    pub providers: Vec<ProviderSnapshot>,

    /// Parameter types known from schema rather than Rust code
    #[serde(default)]
    pub types: Vec<TypeSchema>,

    /// Service method tables
    #[serde(default)]
    pub services: Vec<ServiceType>,
}

/// Provider list for one service key, as the registry last reported it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSnapshot {
    pub service_key: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Schema description of one parameter type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSchema {
    pub name: String,

    /// Inferred from the name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeKind>,

    /// Default instance; only meaningful for `class` kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl TypeSchema {
    /// Kind after inference
    pub fn effective_kind(&self) -> TypeKind {
        self.kind.unwrap_or_else(|| TypeKind::infer(&self.name))
    }

    pub fn to_descriptor(&self) -> TypeDescriptor {
        match (self.effective_kind(), &self.default) {
            (TypeKind::Class, Some(value)) => {
                TypeDescriptor::with_default_value(self.name.clone(), value.clone())
            }
            (kind, _) => TypeDescriptor::new(self.name.clone(), kind),
        }
    }
}

impl EdgeConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load configuration from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        let config: EdgeConfig = serde_yaml::from_str(content)
            .context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Pushes the provider snapshot into `cache`, one full replace per key.
    ///
    /// Returns the number of service keys written.
    pub fn seed_cache(&self, cache: &EndpointCache) -> Result<usize> {
        for snapshot in &self.providers {
            let key = ServiceKey::parse(&snapshot.service_key)
                .with_context(|| format!("Invalid provider entry: {}", snapshot.service_key))?;
            let endpoints = snapshot
                .urls
                .iter()
                .map(|url| Endpoint::parse(url))
                .collect::<edge_common::Result<Vec<_>>>()
                .with_context(|| format!("Invalid provider URL for {}", key))?;

            debug!("Seeding {} with {} provider(s)", key, endpoints.len());
            cache.notify(key, endpoints);
        }

        info!("Seeded endpoint cache with {} service(s)", self.providers.len());
        Ok(self.providers.len())
    }

    /// Builds a type registry with the builtins plus every configured type
    /// and service.
    pub fn build_type_registry(&self) -> TypeRegistry {
        let registry = TypeRegistry::with_builtins();
        for schema in &self.types {
            registry.register_type(schema.to_descriptor());
        }
        for service in &self.services {
            registry.register_service(service.clone());
        }
        registry
    }
}

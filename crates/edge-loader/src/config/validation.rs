use super::*;
use anyhow::{anyhow, Result};
use std::collections::HashSet;

/// Validate the complete configuration
pub fn validate_config(config: &EdgeConfig) -> Result<()> {
    validate_application(&config.application)?;
    validate_registry(&config.registry)?;
    validate_providers(&config.providers)?;
    validate_types(&config.types)?;
    validate_services(&config.services)?;
    Ok(())
}

fn validate_application(application: &ApplicationConfig) -> Result<()> {
    if application.name.trim().is_empty() {
        return Err(anyhow!("Application name cannot be empty"));
    }
    Ok(())
}

fn validate_registry(registry: &RegistryConfig) -> Result<()> {
    if registry.address.trim().is_empty() {
        return Err(anyhow!("Registry address cannot be empty"));
    }
    if registry.timeout_ms == 0 {
        return Err(anyhow!("Registry timeout must be greater than 0"));
    }
    Ok(())
}

/// Validate the provider snapshot: parseable keys and URLs, no duplicate keys
fn validate_providers(providers: &[ProviderSnapshot]) -> Result<()> {
    let mut keys = HashSet::new();
    for snapshot in providers {
        ServiceKey::parse(&snapshot.service_key)
            .map_err(|e| anyhow!("Invalid provider entry: {}", e))?;

        if !keys.insert(snapshot.service_key.as_str()) {
            return Err(anyhow!("Duplicate provider entry: {}", snapshot.service_key));
        }

        for url in &snapshot.urls {
            Endpoint::parse(url)
                .map_err(|e| anyhow!("Invalid provider for {}: {}", snapshot.service_key, e))?;
        }
    }
    Ok(())
}

fn validate_types(types: &[TypeSchema]) -> Result<()> {
    let mut names = HashSet::new();
    for schema in types {
        if schema.name.trim().is_empty() {
            return Err(anyhow!("Type name cannot be empty"));
        }
        if !names.insert(schema.name.as_str()) {
            return Err(anyhow!("Duplicate type: {}", schema.name));
        }

        let kind = schema.effective_kind();
        if schema.default.is_some() && kind != TypeKind::Class {
            return Err(anyhow!(
                "Type {} is {:?}; only class types can declare a default",
                schema.name,
                kind
            ));
        }
    }
    Ok(())
}

fn validate_services(services: &[ServiceType]) -> Result<()> {
    let mut names = HashSet::new();
    for service in services {
        if service.name.trim().is_empty() {
            return Err(anyhow!("Service type name cannot be empty"));
        }
        if !names.insert(service.name.as_str()) {
            return Err(anyhow!("Duplicate service type: {}", service.name));
        }
        for method in &service.methods {
            if method.name.trim().is_empty() {
                return Err(anyhow!("Method name cannot be empty in {}", service.name));
            }
            if method.parameter_types.iter().any(|t| t.trim().is_empty()) {
                return Err(anyhow!(
                    "Empty parameter type in {}.{}",
                    service.name,
                    method.name
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EdgeConfig {
        EdgeConfig {
            application: ApplicationConfig::new("edge"),
            registry: RegistryConfig::new("zookeeper://127.0.0.1:2181"),
            providers: vec![],
            types: vec![],
            services: vec![],
        }
    }

    #[test]
    fn test_valid_minimal_config() {
        assert!(validate_config(&base()).is_ok());
    }

    #[test]
    fn test_blank_application_name() {
        let mut config = base();
        config.application.name = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_blank_registry_address() {
        let mut config = base();
        config.registry.address = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_provider_url() {
        let mut config = base();
        config.providers.push(ProviderSnapshot {
            service_key: "com.example.Foo".to_string(),
            urls: vec!["not-a-url".to_string()],
        });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("com.example.Foo"));
    }

    #[test]
    fn test_duplicate_provider_key() {
        let mut config = base();
        for _ in 0..2 {
            config.providers.push(ProviderSnapshot {
                service_key: "com.example.Foo".to_string(),
                urls: vec![],
            });
        }
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_default_on_enum_rejected() {
        let mut config = base();
        config.types.push(TypeSchema {
            name: "com.example.Color".to_string(),
            kind: Some(TypeKind::Enum),
            default: Some(serde_json::json!("RED")),
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_method_name_rejected() {
        let mut config = base();
        config
            .services
            .push(ServiceType::new("com.example.Foo").method("", ["int"]));
        assert!(validate_config(&config).is_err());
    }
}

//! Type registry.
//!
//! Holds the two tables descriptor generation needs:
//! - parameter types by name ([`TypeDescriptor`])
//! - service contracts by name ([`ServiceType`])
//!
//! Like the endpoint cache, the registry is a cheaply cloned handle over
//! shared `DashMap`s, so it can be filled at startup and read from any
//! thread afterwards.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::method::ServiceType;
use crate::types::{TypeDescriptor, TypeKind, PRIMITIVE_TYPES};

/// Platform types pre-registered as boxed primitives.
const WRAPPER_TYPES: &[&str] = &[
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.lang.String",
    "java.lang.Object",
];

/// Registry of type descriptors and service method tables.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: Arc<DashMap<String, TypeDescriptor>>,
    services: Arc<DashMap<String, Arc<ServiceType>>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-filled with primitives and their wrappers.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for name in PRIMITIVE_TYPES {
            registry.register_type(TypeDescriptor::new(*name, TypeKind::Primitive));
        }
        for name in WRAPPER_TYPES {
            registry.register_type(TypeDescriptor::new(*name, TypeKind::Boxed));
        }
        registry
    }

    /// Registers (or replaces) a parameter type.
    pub fn register_type(&self, descriptor: TypeDescriptor) {
        trace!("Registering type {} ({:?})", descriptor.name(), descriptor.kind());
        self.types.insert(descriptor.name().to_string(), descriptor);
    }

    /// Registers (or replaces) a service contract.
    pub fn register_service(&self, service: ServiceType) {
        debug!(
            "Registering service type {} with {} method(s)",
            service.name,
            service.methods.len()
        );
        self.services.insert(service.name.clone(), Arc::new(service));
    }

    /// Returns the registered descriptor for `name`, if any.
    pub fn get_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.types.get(name).map(|entry| entry.value().clone())
    }

    /// Resolves a parameter type for descriptor generation.
    ///
    /// Registered descriptors win. Otherwise a descriptor is inferred from
    /// the name when the inferred kind needs no constructor (primitives,
    /// platform types, arrays). Unregistered concrete types resolve to
    /// `None`.
    pub fn resolve_type(&self, name: &str) -> Option<TypeDescriptor> {
        if let Some(descriptor) = self.get_type(name) {
            return Some(descriptor);
        }

        let inferred = TypeDescriptor::inferred(name);
        if inferred.kind() == TypeKind::Class {
            trace!("No descriptor for {}", name);
            return None;
        }
        trace!("Inferred {:?} for unregistered type {}", inferred.kind(), name);
        Some(inferred)
    }

    /// Returns the service contract named `name`, if registered.
    pub fn get_service(&self, name: &str) -> Option<Arc<ServiceType>> {
        self.services.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Lists registered service names, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Returns the number of registered parameter types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(registry.get_type("int").unwrap().kind(), TypeKind::Primitive);
        assert_eq!(
            registry.get_type("java.lang.String").unwrap().kind(),
            TypeKind::Boxed
        );
        assert_eq!(
            registry.type_count(),
            PRIMITIVE_TYPES.len() + WRAPPER_TYPES.len()
        );
    }

    #[test]
    fn test_resolve_prefers_registered() {
        let registry = TypeRegistry::new();
        registry.register_type(TypeDescriptor::new("java.lang.Thread$State", TypeKind::Enum));

        let resolved = registry.resolve_type("java.lang.Thread$State").unwrap();
        assert_eq!(resolved.kind(), TypeKind::Enum);
    }

    #[test]
    fn test_resolve_infers_placeholder_and_array() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.resolve_type("java.lang.Integer").unwrap().kind(),
            TypeKind::Boxed
        );
        assert_eq!(
            registry.resolve_type("com.example.Item[]").unwrap().kind(),
            TypeKind::Array
        );
        assert!(registry.resolve_type("com.example.Unknown").is_none());
    }

    #[test]
    fn test_services() {
        let registry = TypeRegistry::new();
        registry.register_service(ServiceType::new("b.Service").method("ping", Vec::<String>::new()));
        registry.register_service(ServiceType::new("a.Service"));

        assert_eq!(registry.service_names(), vec!["a.Service", "b.Service"]);
        assert_eq!(registry.get_service("b.Service").unwrap().methods.len(), 1);
        assert!(registry.get_service("c.Service").is_none());
    }

    #[test]
    fn test_clones_share_tables() {
        let registry = TypeRegistry::new();
        let clone = registry.clone();
        clone.register_service(ServiceType::new("a.Service"));
        assert!(registry.get_service("a.Service").is_some());
    }
}

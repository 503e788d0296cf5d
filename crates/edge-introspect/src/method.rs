//! Service method tables and method lookup.

use edge_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::schema::TypeRegistry;

/// A declared method: name and ordered parameter type names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,

    #[serde(default, rename = "params")]
    pub parameter_types: Vec<String>,
}

impl MethodSignature {
    pub fn new<I, S>(name: impl Into<String>, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

/// A service contract: its fully qualified name and declared methods, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub name: String,

    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

impl ServiceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Declares a method (builder style).
    pub fn method<I, S>(mut self, name: impl Into<String>, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.push(MethodSignature::new(name, parameter_types));
        self
    }

    /// Unqualified name (`FooService` for `com.example.FooService`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Finds a method by name.
    ///
    /// Overloads are not told apart: when several methods share the name,
    /// the last one declared is returned. Use [`ServiceType::find_overload`]
    /// to pick by parameter count.
    pub fn find_method(&self, method_name: &str) -> Option<&MethodSignature> {
        let mut matches = self.methods.iter().filter(|m| m.name == method_name);
        let mut found = matches.next()?;
        let mut overloads = 1;
        for later in matches {
            found = later;
            overloads += 1;
        }

        if overloads > 1 {
            debug!(
                "{} declares {} overloads of {}; using the last ({} param(s))",
                self.name,
                overloads,
                method_name,
                found.arity()
            );
        }
        Some(found)
    }

    /// Finds the method with the given name and parameter count.
    pub fn find_overload(&self, method_name: &str, arity: usize) -> Option<&MethodSignature> {
        self.methods
            .iter()
            .rev()
            .find(|m| m.name == method_name && m.arity() == arity)
    }
}

/// Looks up method signatures through a [`TypeRegistry`].
#[derive(Clone)]
pub struct MethodIntrospector {
    registry: TypeRegistry,
}

impl MethodIntrospector {
    pub fn new(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    /// Loads a service type by name.
    ///
    /// # Errors
    ///
    /// [`Error::TypeResolution`] if the type is not registered.
    pub fn service_type(&self, type_name: &str) -> Result<Arc<ServiceType>> {
        self.registry
            .get_service(type_name)
            .ok_or_else(|| Error::type_resolution(type_name))
    }

    /// Finds `method_name` on the service type named `type_name`.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeResolution`] if the type is not registered
    /// - [`Error::MethodNotFound`] if no method has that name
    pub fn find_method(&self, type_name: &str, method_name: &str) -> Result<MethodSignature> {
        let service = self.service_type(type_name)?;
        service
            .find_method(method_name)
            .cloned()
            .ok_or_else(|| Error::method_not_found(type_name, method_name))
    }

    /// Returns the registry this introspector reads from.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
}

//! Parameter descriptor generation.
//!
//! # Architecture
//!
//! ```text
//! describe(key, method)
//! ├── EndpointSelector::select(key)           none     ──▶ ""
//! ├── MethodIntrospector::find_method(...)    missing  ──▶ "" (warn)
//! └── for each parameter type
//!     ├── primitive / boxed / enum / interface ──▶ null
//!     ├── array                                ──▶ []
//!     └── otherwise default-construct          failure ──▶ null (error log)
//! ```
//!
//! Descriptor generation is a best-effort convenience for callers that know
//! nothing about the service's types. It never fails outward: every problem
//! degrades to an empty string or a `null` slot plus a log record.
//!
//! # Rust Learning Note
//!
//! Each parameter gets an explicit [`ParamOutcome`] rather than a bare JSON
//! value, so a legitimate `null` (an `int` parameter) and a failed
//! construction (a type with no default) stay distinguishable even though
//! both render as `null`.

use edge_common::{Error, Result, ServiceKey};
use edge_registry::EndpointSelector;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::method::{MethodIntrospector, MethodSignature};
use crate::schema::TypeRegistry;
use crate::types::{ConstructionError, TypeKind};

/// What was produced for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamOutcome {
    /// Kind that never gets a fabricated value (primitive, boxed, enum,
    /// interface).
    Placeholder,

    /// Array-shaped type.
    EmptySequence,

    /// Default instance built successfully.
    Constructed(Value),

    /// Default instance could not be built.
    Failed(ConstructionError),
}

impl ParamOutcome {
    /// JSON rendering of this outcome.
    pub fn to_value(&self) -> Value {
        match self {
            ParamOutcome::Placeholder | ParamOutcome::Failed(_) => Value::Null,
            ParamOutcome::EmptySequence => Value::Array(Vec::new()),
            ParamOutcome::Constructed(value) => value.clone(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ParamOutcome::Failed(_))
    }
}

/// One parameter slot of a method descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    pub position: usize,
    pub type_name: String,
    pub outcome: ParamOutcome,
}

/// Descriptor for a whole method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Implementation type the method was found on.
    pub service_type: String,
    pub method: MethodSignature,
    pub parameters: Vec<ParamDescriptor>,
}

impl MethodDescriptor {
    /// Ordered parameter values, one per slot.
    pub fn values(&self) -> Vec<Value> {
        self.parameters.iter().map(|p| p.outcome.to_value()).collect()
    }

    /// Renders the descriptor as a JSON array with object keys sorted and
    /// `null`s / empty collections kept.
    pub fn to_json_string(&self) -> Result<String> {
        render(&self.values())
    }

    /// Returns the slots whose construction failed.
    pub fn failures(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.parameters.iter().filter(|p| p.outcome.is_failure())
    }
}

/// Builds parameter descriptors for registry-known services.
#[derive(Clone)]
pub struct ParameterDescriptorGenerator {
    selector: EndpointSelector,
    introspector: MethodIntrospector,
}

impl ParameterDescriptorGenerator {
    pub fn new(selector: EndpointSelector, registry: TypeRegistry) -> Self {
        Self {
            selector,
            introspector: MethodIntrospector::new(registry),
        }
    }

    /// Describes `method_name` on the service behind `key`.
    ///
    /// Returns an empty string when the service, its type, or the method is
    /// unknown. Never fails.
    pub fn describe(&self, key: &ServiceKey, method_name: &str) -> String {
        let descriptor = match self.describe_detailed(key, method_name) {
            Ok(descriptor) => descriptor,
            Err(Error::NotFound { .. }) => {
                debug!("No provider for {}, no descriptor for {}", key, method_name);
                return String::new();
            }
            Err(Error::TypeResolution { type_name }) => {
                warn!("Can not find type {} for service {}", type_name, key);
                return String::new();
            }
            Err(Error::MethodNotFound { type_name, method }) => {
                warn!("Can not find method {} in {}", method, type_name);
                return String::new();
            }
            Err(e) => {
                warn!("Describing {} on {} failed: {}", method_name, key, e);
                return String::new();
            }
        };

        match descriptor.to_json_string() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to render descriptor for {}.{}: {}", key, method_name, e);
                String::new()
            }
        }
    }

    /// Describes `method_name` on the service behind `key`, keeping every
    /// per-parameter outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no endpoint is known for `key`
    /// - [`Error::TypeResolution`] if the implementation type is not registered
    /// - [`Error::MethodNotFound`] if the type declares no such method
    pub fn describe_detailed(&self, key: &ServiceKey, method_name: &str) -> Result<MethodDescriptor> {
        let endpoint = self
            .selector
            .select(key)
            .ok_or_else(|| Error::not_found(key.clone()))?;

        let type_name = endpoint
            .interface_name()
            .unwrap_or_else(|| key.interface())
            .to_string();

        let service = self.introspector.service_type(&type_name)?;
        info!("Got {} from registry", type_name);

        let method = service
            .find_method(method_name)
            .cloned()
            .ok_or_else(|| Error::method_not_found(&type_name, method_name))?;

        let parameters = self.describe_parameters(&method);
        Ok(MethodDescriptor {
            service_type: type_name,
            method,
            parameters,
        })
    }

    /// Applies the default-value policy to every parameter of `method`.
    ///
    /// A failure on one parameter is logged and recorded; the rest are still
    /// described.
    pub fn describe_parameters(&self, method: &MethodSignature) -> Vec<ParamDescriptor> {
        method
            .parameter_types
            .iter()
            .enumerate()
            .map(|(position, type_name)| {
                let outcome = self.default_for(type_name);
                if let ParamOutcome::Failed(reason) = &outcome {
                    error!(
                        "Failed to describe parameter {} of method {}: {}",
                        position, method.name, reason
                    );
                }
                ParamDescriptor {
                    position,
                    type_name: type_name.clone(),
                    outcome,
                }
            })
            .collect()
    }

    fn default_for(&self, type_name: &str) -> ParamOutcome {
        let Some(descriptor) = self.introspector.registry().resolve_type(type_name) else {
            return ParamOutcome::Failed(ConstructionError::UnknownType {
                type_name: type_name.to_string(),
            });
        };

        if descriptor.kind().is_placeholder() {
            return ParamOutcome::Placeholder;
        }
        if descriptor.kind() == TypeKind::Array {
            return ParamOutcome::EmptySequence;
        }

        match descriptor.construct_default() {
            Ok(value) => ParamOutcome::Constructed(value),
            Err(reason) => ParamOutcome::Failed(reason),
        }
    }
}

/// Serializes parameter values with object keys in sorted order.
pub fn render(values: &[Value]) -> Result<String> {
    let sorted: Vec<Value> = values.iter().map(sort_keys).collect();
    serde_json::to_string(&sorted)
        .map_err(|e| Error::Internal(format!("Failed to serialize descriptor: {}", e)))
}

// Rebuilds objects in key order, whatever map backing serde_json was built with.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key.clone(), sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

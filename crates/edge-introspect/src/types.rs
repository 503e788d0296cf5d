//! Type descriptors.
//!
//! # Rust Learning Note
//!
//! There is no runtime reflection to ask "can I default-construct this
//! type?". Instead every parameter type the descriptor generator may meet is
//! described up front by a [`TypeDescriptor`]: its [`TypeKind`] and,
//! optionally, a constructor that produces the type's zero value as JSON.
//!
//! Rust types plug in through their `Default` and `Serialize` impls:
//!
//! ```rust
//! use edge_introspect::TypeDescriptor;
//! use serde::Serialize;
//!
//! #[derive(Default, Serialize)]
//! struct OrderRequest {
//!     order_id: String,
//!     items: Vec<String>,
//! }
//!
//! let descriptor = TypeDescriptor::of_default::<OrderRequest>("com.example.OrderRequest");
//! let value = descriptor.construct_default().unwrap();
//! assert_eq!(value["items"], serde_json::json!([]));
//! ```
//!
//! Types known only from a schema carry a literal default value instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Names treated as primitives when no descriptor says otherwise.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Namespace whose members are treated as boxed primitives / platform types.
pub const WRAPPER_NAMESPACE: &str = "java.lang.";

/// Why a parameter's default value could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The parameter type is not registered and cannot be inferred.
    #[error("Unknown parameter type: {type_name}")]
    UnknownType { type_name: String },

    /// The type is registered but has no way to build a default instance.
    #[error("No default constructor for {type_name}")]
    NoDefaultConstructor { type_name: String },

    /// The constructor ran and failed.
    #[error("Failed to construct {type_name}: {reason}")]
    Failed { type_name: String, reason: String },
}

/// Structural category of a type; decides the default-value policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// `int`, `long`, ...
    Primitive,

    /// Boxed primitives and platform types (`java.lang.Integer`, `java.lang.String`).
    Boxed,

    Enum,

    /// Abstract contract; no instance can be fabricated.
    Interface,

    /// Array- or list-shaped type.
    Array,

    /// Concrete type that may be default-constructed.
    Class,
}

impl TypeKind {
    /// Infers a kind from a type name alone.
    ///
    /// `int` → Primitive, `java.lang.Long` → Boxed, `Foo[]` → Array,
    /// everything else → Class.
    pub fn infer(type_name: &str) -> Self {
        if type_name.ends_with("[]") {
            TypeKind::Array
        } else if PRIMITIVE_TYPES.contains(&type_name) {
            TypeKind::Primitive
        } else if type_name.starts_with(WRAPPER_NAMESPACE) {
            TypeKind::Boxed
        } else {
            TypeKind::Class
        }
    }

    /// Returns true if parameters of this kind are always described as `null`.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            TypeKind::Primitive | TypeKind::Boxed | TypeKind::Enum | TypeKind::Interface
        )
    }
}

/// Produces a default instance of a type, rendered as JSON.
pub type DefaultConstructor = Arc<dyn Fn() -> Result<Value, ConstructionError> + Send + Sync>;

/// Runtime description of one type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    constructor: Option<DefaultConstructor>,
}

impl TypeDescriptor {
    /// Describes a type with no default constructor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            constructor: None,
        }
    }

    /// Describes a type by name only, inferring its kind.
    pub fn inferred(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = TypeKind::infer(&name);
        Self::new(name, kind)
    }

    /// Describes a Rust type whose default instance is `T::default()`.
    pub fn of_default<T>(name: impl Into<String>) -> Self
    where
        T: Default + Serialize + 'static,
    {
        let name = name.into();
        let type_name = name.clone();
        let constructor: DefaultConstructor = Arc::new(move || {
            serde_json::to_value(T::default()).map_err(|e| ConstructionError::Failed {
                type_name: type_name.clone(),
                reason: e.to_string(),
            })
        });

        Self {
            name,
            kind: TypeKind::Class,
            constructor: Some(constructor),
        }
    }

    /// Describes a type whose default instance is a fixed JSON value.
    pub fn with_default_value(name: impl Into<String>, value: Value) -> Self {
        let constructor: DefaultConstructor = Arc::new(move || Ok(value.clone()));
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            constructor: Some(constructor),
        }
    }

    /// Describes a concrete type with a custom constructor.
    pub fn with_constructor<F>(name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<Value, ConstructionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            constructor: Some(Arc::new(constructor)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Runs the default constructor.
    pub fn construct_default(&self) -> Result<Value, ConstructionError> {
        match &self.constructor {
            Some(constructor) => constructor(),
            None => Err(ConstructionError::NoDefaultConstructor {
                type_name: self.name.clone(),
            }),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_default_constructor", &self.constructor.is_some())
            .finish()
    }
}

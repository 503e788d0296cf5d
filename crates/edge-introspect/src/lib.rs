//! # Edge Introspect
//!
//! Describes remote methods without compile-time knowledge of their types.
//!
//! This crate provides:
//! - Type descriptors (kind + optional default constructor)
//! - A registry of parameter types and service method tables
//! - Method lookup by name (last declared overload wins) or by arity
//! - Parameter descriptor generation: one JSON default per parameter

pub mod types;
pub mod schema;
pub mod method;
pub mod descriptor;

// Re-export commonly used items
pub use types::{ConstructionError, DefaultConstructor, TypeDescriptor, TypeKind};
pub use schema::TypeRegistry;
pub use method::{MethodIntrospector, MethodSignature, ServiceType};
pub use descriptor::{
    MethodDescriptor, ParamDescriptor, ParamOutcome, ParameterDescriptorGenerator,
};

//! # Edge Loader
//!
//! Lookup surface for a gateway that calls RPC services it has no
//! compile-time stubs for.
//!
//! This crate provides:
//! - [`InterfaceLoader`]: service beans, provider URLs and parameter descriptors by service key
//! - [`EdgeConfig`]: YAML configuration with an offline provider snapshot and type schema
//! - [`ServiceCatalog`]: a sorted snapshot of every known bean and method

pub mod config;
pub mod loader;
pub mod catalog;

// Re-export commonly used items
pub use config::{EdgeConfig, ProviderSnapshot, TypeSchema};
pub use loader::InterfaceLoader;
pub use catalog::{ServiceBeanInfo, ServiceCatalog};

//! # Edge Proxy
//!
//! Resolves registry service keys into remote-service proxies.
//!
//! The transport that actually opens connections is supplied by the caller
//! as a [`ReferenceFactory`]; this crate decides *what* to bind to.

pub mod reference;
pub mod resolver;

// Re-export commonly used items
pub use reference::{
    ApplicationConfig, ReferenceConfig, ReferenceFactory, RegistryConfig, ServiceProxy,
};
pub use resolver::ProxyResolver;

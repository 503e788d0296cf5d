//! # Edge Registry
//!
//! Local view of the service registry.
//!
//! This crate provides:
//! - Endpoint type with registry URL parsing
//! - Concurrent endpoint cache (DashMap of immutable snapshots)
//! - Arbitrary endpoint selection and address listing
//!
//! Nothing here talks to the registry over the network. An external watch
//! subscriber pushes provider lists in through [`ProviderListener`].

pub mod endpoint;
pub mod cache;
pub mod selector;

// Re-export commonly used items
pub use endpoint::{Endpoint, InstanceId};
pub use cache::{EndpointCache, EndpointSet, ProviderListener};
pub use selector::EndpointSelector;

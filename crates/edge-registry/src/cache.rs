//! Registry-backed endpoint cache.
//!
//! # Rust Learning Note
//!
//! ## Snapshots instead of in-place mutation
//!
//! The registry delivers a *full* provider list on every change, so the cache
//! never edits a set in place. Each update builds a fresh `EndpointSet`, wraps
//! it in an `Arc`, and swaps it into the map:
//!
//! ```rust,ignore
//! self.entries.insert(key, Arc::new(endpoints));
//! ```
//!
//! A reader that called `get()` a moment earlier keeps its own `Arc` to the
//! old set and can keep iterating it. Nobody ever observes half a set.
//!
//! ## Why DashMap?
//!
//! - Sharded locking: writers on different keys rarely contend
//! - `&self` everywhere: the cache is shared as a cloned handle
//! - Shard guards are dropped before `get()` returns, so no caller ever
//!   holds a lock across I/O

use dashmap::DashMap;
use edge_common::ServiceKey;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::endpoint::{Endpoint, InstanceId};

/// All known providers of one service, keyed by registry instance id.
pub type EndpointSet = HashMap<InstanceId, Endpoint>;

/// Receiver of provider-list notifications.
///
/// The registry-watch subscriber is written against this trait; the
/// [`EndpointCache`] is the production implementation.
pub trait ProviderListener: Send + Sync {
    /// Called with the complete, current provider list for `key`.
    fn on_providers(&self, key: &ServiceKey, endpoints: Vec<Endpoint>);
}

/// Thread-safe map from service key to the current endpoint set.
///
/// Cloning the cache clones the handle, not the data: every clone sees the
/// same entries. Build one at startup and hand clones to the registry
/// subscriber and to the readers.
#[derive(Clone, Default)]
pub struct EndpointCache {
    entries: Arc<DashMap<ServiceKey, Arc<EndpointSet>>>,
}

impl EndpointCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the endpoint set for `key`.
    ///
    /// Last writer wins; the previous set is discarded, not merged. Storing
    /// an empty set is allowed and means "known service, no providers".
    pub fn put(&self, key: ServiceKey, endpoints: EndpointSet) {
        let count = endpoints.len();
        let previous = self.entries.insert(key.clone(), Arc::new(endpoints));

        match previous {
            Some(old) => info!(
                "Replaced providers for {}: {} -> {} endpoint(s)",
                key,
                old.len(),
                count
            ),
            None => info!("Cached {} provider(s) for new service {}", count, key),
        }
    }

    /// Returns the current endpoint set for `key`, or `None` if the service
    /// has never been reported.
    pub fn get(&self, key: &ServiceKey) -> Option<Arc<EndpointSet>> {
        let set = self.entries.get(key).map(|entry| Arc::clone(entry.value()));
        debug!(
            "Cache lookup {}: {}",
            key,
            set.as_ref()
                .map(|s| format!("{} endpoint(s)", s.len()))
                .unwrap_or_else(|| "unknown".to_string())
        );
        set
    }

    /// Replaces the endpoint set for `key` from a bare provider list,
    /// deriving instance ids from the endpoints themselves.
    pub fn notify(&self, key: ServiceKey, endpoints: Vec<Endpoint>) {
        let set = endpoints
            .into_iter()
            .map(|endpoint| (endpoint.derived_instance_id(), endpoint))
            .collect();
        self.put(key, set);
    }

    /// Returns true if the service has been reported at least once.
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Lists every known service key, sorted.
    pub fn keys(&self) -> Vec<ServiceKey> {
        let mut keys: Vec<ServiceKey> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Returns the number of known services.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProviderListener for EndpointCache {
    fn on_providers(&self, key: &ServiceKey, endpoints: Vec<Endpoint>) {
        self.notify(key.clone(), endpoints);
    }
}

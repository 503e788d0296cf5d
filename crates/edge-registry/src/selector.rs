//! Endpoint selection.
//!
//! Selection is deliberately unordered: the selector hands back whichever
//! endpoint the set yields first. Callers must not rely on getting the same
//! endpoint twice, nor on seeing every endpoint in turn.

use edge_common::ServiceKey;
use tracing::{debug, trace};

use crate::cache::EndpointCache;
use crate::endpoint::Endpoint;

/// Read-only view over an [`EndpointCache`] that picks endpoints.
#[derive(Clone)]
pub struct EndpointSelector {
    cache: EndpointCache,
}

impl EndpointSelector {
    pub fn new(cache: EndpointCache) -> Self {
        Self { cache }
    }

    /// Picks one endpoint for `key`.
    ///
    /// Returns `None` when the key is unknown or its set is empty.
    pub fn select(&self, key: &ServiceKey) -> Option<Endpoint> {
        let set = self.cache.get(key)?;
        let selected = set.values().next().cloned();

        match &selected {
            Some(endpoint) => debug!(
                "Selected {} for {} ({} candidate(s))",
                endpoint.address(),
                key,
                set.len()
            ),
            None => debug!("No providers left for {}", key),
        }
        selected
    }

    /// Lists `protocol://host:port` for every known endpoint of `key`.
    ///
    /// `None` means the key is unknown; an empty vector means the registry
    /// reported no providers. Order is unspecified.
    pub fn list_endpoint_addresses(&self, key: &ServiceKey) -> Option<Vec<String>> {
        let set = self.cache.get(key)?;
        let addresses: Vec<String> = set.values().map(Endpoint::address).collect();
        trace!("Addresses for {}: {:?}", key, addresses);
        Some(addresses)
    }

    /// Returns the cache this selector reads from.
    pub fn cache(&self) -> &EndpointCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EndpointSet;

    fn cache_with(key: &ServiceKey, hosts: &[&str]) -> EndpointCache {
        let cache = EndpointCache::new();
        let set: EndpointSet = hosts
            .iter()
            .enumerate()
            .map(|(i, host)| (i as u64 + 1, Endpoint::new("dubbo", *host, 20880)))
            .collect();
        cache.put(key.clone(), set);
        cache
    }

    #[test]
    fn test_select_unknown_key() {
        let selector = EndpointSelector::new(EndpointCache::new());
        assert!(selector.select(&ServiceKey::from("com.example.Missing")).is_none());
        assert!(selector
            .list_endpoint_addresses(&ServiceKey::from("com.example.Missing"))
            .is_none());
    }

    #[test]
    fn test_select_empty_set() {
        let key = ServiceKey::from("com.example.Foo");
        let selector = EndpointSelector::new(cache_with(&key, &[]));

        assert!(selector.select(&key).is_none());
        assert_eq!(selector.list_endpoint_addresses(&key), Some(vec![]));
    }

    #[test]
    fn test_select_returns_member_of_set() {
        let key = ServiceKey::from("com.example.Foo");
        let selector = EndpointSelector::new(cache_with(&key, &["10.0.0.1", "10.0.0.2"]));

        let selected = selector.select(&key).unwrap();
        assert!(selected.host == "10.0.0.1" || selected.host == "10.0.0.2");
    }

    #[test]
    fn test_list_addresses_contains_exactly_all() {
        let key = ServiceKey::from("com.example.Foo");
        let selector = EndpointSelector::new(cache_with(&key, &["10.0.0.1", "10.0.0.2"]));

        let mut addresses = selector.list_endpoint_addresses(&key).unwrap();
        addresses.sort();
        assert_eq!(
            addresses,
            vec!["dubbo://10.0.0.1:20880", "dubbo://10.0.0.2:20880"]
        );
    }

    #[test]
    fn test_select_does_not_mutate_cache() {
        let key = ServiceKey::from("com.example.Foo");
        let cache = cache_with(&key, &["10.0.0.1", "10.0.0.2"]);
        let selector = EndpointSelector::new(cache.clone());

        let before = cache.get(&key).unwrap();
        for _ in 0..5 {
            selector.select(&key);
        }
        assert_eq!(*cache.get(&key).unwrap(), *before);
        assert_eq!(cache.len(), 1);
    }
}

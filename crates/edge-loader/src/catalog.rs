//! Service catalog: a browsable snapshot of every known service.
//!
//! Keys follow the gateway's bean naming:
//! - beans: `interface@version@group` (missing parts left empty)
//! - methods and descriptors: `SimpleName.method`
//!
//! Overloads collapse onto one method key, matching the name-only lookup
//! used for descriptors.

use edge_common::ServiceKey;
use edge_introspect::MethodSignature;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::loader::InterfaceLoader;

/// One service key as seen in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceBeanInfo {
    pub service_key: ServiceKey,
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Provider addresses, sorted.
    pub urls: Vec<String>,
}

impl ServiceBeanInfo {
    /// Catalog key: `interface@version@group`.
    pub fn bean_key(&self) -> String {
        format!(
            "{}@{}@{}",
            self.interface,
            self.version.as_deref().unwrap_or(""),
            self.group.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceCatalog {
    pub beans: BTreeMap<String, ServiceBeanInfo>,
    pub methods: BTreeMap<String, MethodSignature>,
    pub param_descs: BTreeMap<String, String>,
}

impl ServiceCatalog {
    /// Walks every cached service key and collects beans, methods and
    /// parameter descriptors.
    pub fn build(loader: &InterfaceLoader) -> Self {
        let mut catalog = Self::default();

        for key in loader.cache().keys() {
            let endpoint = loader.resolver().selector().select(&key);
            let interface = endpoint
                .as_ref()
                .and_then(|e| e.interface_name())
                .unwrap_or_else(|| key.interface())
                .to_string();
            let version = endpoint
                .as_ref()
                .and_then(|e| e.version())
                .or_else(|| key.version())
                .map(str::to_string);
            let group = endpoint
                .as_ref()
                .and_then(|e| e.group())
                .or_else(|| key.group())
                .map(str::to_string);

            let mut urls = loader.get_service_urls(&key).unwrap_or_default();
            urls.sort();

            if let Some(service) = loader.type_registry().get_service(&interface) {
                for method in &service.methods {
                    let method_key = format!("{}.{}", service.simple_name(), method.name);
                    if catalog.methods.contains_key(&method_key) {
                        continue;
                    }
                    // Name lookup so overloads resolve the same way descriptors do
                    if let Some(found) = service.find_method(&method.name) {
                        catalog.methods.insert(method_key.clone(), found.clone());
                    }
                    let desc = loader.get_param_desc(&key, &method.name);
                    catalog.param_descs.insert(method_key, desc);
                }
            } else {
                debug!("No service type registered for {}", interface);
            }

            let info = ServiceBeanInfo {
                service_key: key,
                interface,
                version,
                group,
                urls,
            };
            catalog.beans.insert(info.bean_key(), info);
        }

        debug!(
            "Catalog built: {} bean(s), {} method(s)",
            catalog.beans.len(),
            catalog.methods.len()
        );
        catalog
    }
}

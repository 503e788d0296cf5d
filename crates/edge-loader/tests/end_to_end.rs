//! End-to-end lookups through a loader built from YAML configuration.

use async_trait::async_trait;
use edge_common::{Error, Result, ServiceKey};
use edge_loader::{EdgeConfig, InterfaceLoader};
use edge_proxy::{ReferenceConfig, ReferenceFactory, ServiceProxy};
use edge_registry::{Endpoint, ProviderListener};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};

const CONFIG: &str = r#"
application:
  name: edge-gateway
  owner: platform
registry:
  address: zookeeper://127.0.0.1:2181
providers:
  - service_key: dubbo/com.example.FooService:1.0
    urls:
      - dubbo://10.0.0.1:20880/com.example.FooService?version=1.0&group=dubbo
types:
  - name: com.example.FooQuery
    default:
      keyword: ""
      page: 1
      filters: []
services:
  - name: com.example.FooService
    methods:
      - name: search
        params: [com.example.FooQuery, int]
      - name: tags
        params: ["java.lang.String[]"]
"#;

struct ProxyStub {
    reference: ReferenceConfig,
}

#[async_trait]
impl ServiceProxy for ProxyStub {
    fn reference(&self) -> &ReferenceConfig {
        &self.reference
    }

    async fn invoke(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        Ok(json!({ "method": method, "args": args }))
    }
}

#[derive(Default)]
struct RecordingFactory {
    references: Mutex<Vec<ReferenceConfig>>,
}

#[async_trait]
impl ReferenceFactory for RecordingFactory {
    async fn create(&self, reference: ReferenceConfig) -> Result<Arc<dyn ServiceProxy>> {
        self.references.lock().unwrap().push(reference.clone());
        Ok(Arc::new(ProxyStub { reference }))
    }
}

fn foo_key() -> ServiceKey {
    ServiceKey::from("dubbo/com.example.FooService:1.0")
}

fn load() -> (InterfaceLoader, Arc<RecordingFactory>) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = EdgeConfig::load_from_file(file.path()).unwrap();
    let factory = Arc::new(RecordingFactory::default());
    let loader = InterfaceLoader::from_config(&config, factory.clone()).unwrap();
    (loader, factory)
}

#[tokio::test]
async fn test_bean_through_registry_snapshot() {
    let (loader, factory) = load();

    let proxy = loader.get_service_bean(&foo_key(), None).await.unwrap().unwrap();
    let result = proxy.invoke("search", vec![json!(null), json!(1)]).await.unwrap();
    assert_eq!(result["method"], "search");

    let references = factory.references.lock().unwrap();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].interface, "com.example.FooService");
    assert_eq!(references[0].version.as_deref(), Some("1.0"));
    assert_eq!(references[0].application.owner.as_deref(), Some("platform"));
    assert!(!references[0].check);
    assert_eq!(references[0].url, None);
}

#[tokio::test]
async fn test_bean_with_explicit_url() {
    let (loader, _) = load();

    let proxy = loader
        .get_service_bean(&foo_key(), Some("dubbo://10.0.0.7:20880"))
        .await
        .unwrap()
        .unwrap();
    assert!(proxy.reference().is_direct());
}

#[tokio::test]
async fn test_unknown_service() {
    let (loader, factory) = load();
    let missing = ServiceKey::from("com.example.Missing");

    assert!(loader.get_service_bean(&missing, None).await.unwrap().is_none());
    assert_eq!(loader.get_service_urls(&missing), None);
    assert_eq!(loader.get_param_desc(&missing, "search"), "");
    assert!(factory.references.lock().unwrap().is_empty());
}

#[test]
fn test_urls_and_param_desc() {
    let (loader, _) = load();

    assert_eq!(
        loader.get_service_urls(&foo_key()),
        Some(vec!["dubbo://10.0.0.1:20880".to_string()])
    );
    assert_eq!(
        loader.get_param_desc(&foo_key(), "search"),
        r#"[{"filters":[],"keyword":"","page":1},null]"#
    );
    assert_eq!(loader.get_param_desc(&foo_key(), "tags"), "[[]]");
    assert_eq!(loader.get_param_desc(&foo_key(), "missing"), "");
}

#[test]
fn test_registry_push_replaces_providers() {
    let (loader, _) = load();
    let listener: &dyn ProviderListener = loader.cache();

    listener.on_providers(
        &foo_key(),
        vec![
            Endpoint::parse("dubbo://10.0.0.3:20880/com.example.FooService?version=1.0").unwrap(),
            Endpoint::parse("dubbo://10.0.0.4:20880/com.example.FooService?version=1.0").unwrap(),
        ],
    );

    let mut urls = loader.get_service_urls(&foo_key()).unwrap();
    urls.sort();
    assert_eq!(urls, vec!["dubbo://10.0.0.3:20880", "dubbo://10.0.0.4:20880"]);

    // An empty push leaves the key known but unusable
    listener.on_providers(&foo_key(), Vec::new());
    assert_eq!(loader.get_service_urls(&foo_key()), Some(Vec::new()));
    assert_eq!(loader.get_param_desc(&foo_key(), "search"), "");
}

#[test]
fn test_invalid_config_is_rejected() {
    let broken = CONFIG.replace("dubbo://10.0.0.1:20880", "nonsense");
    let err = EdgeConfig::load_from_string(&broken).unwrap_err();
    assert!(format!("{:#}", err).contains("dubbo/com.example.FooService:1.0"));

    assert!(matches!(
        Endpoint::parse("nonsense"),
        Err(Error::InvalidEndpoint { .. })
    ));
}

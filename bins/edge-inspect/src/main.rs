use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use edge_common::ServiceKey;
use edge_loader::{EdgeConfig, InterfaceLoader, ServiceCatalog};
use edge_proxy::{ReferenceConfig, ReferenceFactory, ServiceProxy};

/// Edge Inspect - look up services in a registry snapshot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List provider addresses for a service key
    Urls {
        service_key: String,
    },

    /// Print the default-argument descriptor of a method
    Describe {
        service_key: String,
        method: String,
    },

    /// Build a service bean and print the reference it was built from
    Bean {
        service_key: String,

        /// Bind directly to this provider instead of using the registry
        #[arg(long)]
        url: Option<String>,
    },

    /// Print every known bean, method and descriptor
    Catalog,

    /// List cached service keys
    Keys,
}

/// Proxy handed out by the inspector; it can describe itself but not call.
struct DetachedProxy {
    reference: ReferenceConfig,
}

#[async_trait]
impl ServiceProxy for DetachedProxy {
    fn reference(&self) -> &ReferenceConfig {
        &self.reference
    }

    async fn invoke(&self, method: &str, _args: Vec<Value>) -> edge_common::Result<Value> {
        Err(edge_common::Error::transport(format!(
            "edge-inspect cannot invoke {}.{}: no RPC transport",
            self.reference.interface, method
        )))
    }
}

struct DetachedFactory;

#[async_trait]
impl ReferenceFactory for DetachedFactory {
    async fn create(&self, reference: ReferenceConfig) -> edge_common::Result<Arc<dyn ServiceProxy>> {
        Ok(Arc::new(DetachedProxy { reference }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.debug)?;

    info!("Config file: {}", args.config);
    let config = EdgeConfig::load_from_file(&args.config)?;
    let loader = InterfaceLoader::from_config(&config, Arc::new(DetachedFactory))?;

    match args.command {
        Command::Urls { service_key } => {
            let key = parse_key(&service_key)?;
            match loader.get_service_urls(&key) {
                Some(urls) => print_json(&urls)?,
                None => return Err(anyhow!("No providers known for {}", key)),
            }
        }
        Command::Describe {
            service_key,
            method,
        } => {
            let key = parse_key(&service_key)?;
            let desc = loader.get_param_desc(&key, &method);
            if desc.is_empty() {
                return Err(anyhow!("Cannot describe {} on {}", method, key));
            }
            println!("{}", desc);
        }
        Command::Bean { service_key, url } => {
            let key = parse_key(&service_key)?;
            let proxy = loader
                .get_service_bean(&key, url.as_deref())
                .await?
                .ok_or_else(|| anyhow!("No providers known for {}", key))?;
            print_json(proxy.reference())?;
        }
        Command::Catalog => {
            let catalog = ServiceCatalog::build(&loader);
            debug!("Catalog holds {} bean(s)", catalog.beans.len());
            print_json(&catalog)?;
        }
        Command::Keys => {
            for key in loader.cache().keys() {
                println!("{}", key);
            }
        }
    }

    Ok(())
}

fn parse_key(raw: &str) -> Result<ServiceKey> {
    ServiceKey::parse(raw).map_err(|e| anyhow!("{}", e))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn initialize_logging(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

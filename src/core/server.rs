//! Resource server implementation and lifecycle management.
//!
//! `ResourceServer` is created once at start-up and cloned into every
//! transport handler. It owns the configuration and the single
//! [`ResourceStore`] for the lifetime of the process.

use std::sync::Arc;
use tracing::info;

use super::config::{Config, ResourcesConfig};
use super::error::Result;
use crate::domains::resources::{NewResource, ResourceStore, Status};

/// Records created when demo seeding is enabled, in creation order.
const DEMO_RESOURCES: [(&str, &str, Status); 2] = [
    ("Alpha Project", "Initial backend infrastructure", Status::Active),
    ("Beta API", "User authentication service", Status::Inactive),
];

/// The main server handle.
#[derive(Clone)]
pub struct ResourceServer {
    /// Server configuration.
    config: Arc<Config>,

    /// The store owning every resource.
    store: Arc<ResourceStore>,
}

impl ResourceServer {
    /// Create a new server with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let store = build_store(&config.resources)?;

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the resource store.
    pub fn store(&self) -> &ResourceStore {
        &self.store
    }
}

fn build_store(config: &ResourcesConfig) -> Result<ResourceStore> {
    let store = ResourceStore::with_generator(config.id_strategy.generator())
        .with_default_status(config.default_status);

    info!(
        "Initializing ResourceStore (ids: {}, default status: {})",
        config.id_strategy,
        store
            .default_status()
            .map(|s| s.as_str())
            .unwrap_or("required")
    );

    if config.seed_demo_data {
        for (name, description, status) in DEMO_RESOURCES {
            store.create(NewResource::new(name, description).with_status(status.as_str()))?;
        }
        info!("Seeded {} demo resources", store.len());
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::IdStrategy;

    #[test]
    fn test_server_starts_empty() {
        let server = ResourceServer::new(Config::default()).unwrap();
        assert!(server.store().is_empty());
        assert_eq!(server.name(), "crude-server");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_demo_seed() {
        let mut config = Config::default();
        config.resources.seed_demo_data = true;
        config.resources.id_strategy = IdStrategy::Sequential;

        let server = ResourceServer::new(config).unwrap();
        let resources = server.store().list(None);

        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].id, "1");
        assert_eq!(resources[0].name, "Alpha Project");
        assert_eq!(resources[0].status, Status::Active);
        assert_eq!(resources[1].name, "Beta API");
        assert_eq!(resources[1].status, Status::Inactive);
    }

    #[test]
    fn test_store_follows_default_status_config() {
        let server = ResourceServer::new(Config::default()).unwrap();
        assert_eq!(server.store().default_status(), Some(Status::Active));

        let mut config = Config::default();
        config.resources.default_status = None;
        let server = ResourceServer::new(config).unwrap();
        assert_eq!(server.store().default_status(), None);
    }

    #[test]
    fn test_clones_share_the_store() {
        let server = ResourceServer::new(Config::default()).unwrap();
        let clone = server.clone();

        let created = clone.store().create(NewResource::new("n", "d")).unwrap();
        assert_eq!(server.store().get(&created.id).unwrap(), created);
    }
}

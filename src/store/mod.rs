//! Document-store seam: where validated contact records are persisted.
//!
//! The store is reached through a [`Connector`] so that the
//! [`ConnectionSupervisor`](crate::supervisor::ConnectionSupervisor) can retry
//! establishment. The handle it yields is an `Arc<dyn DocumentStore>` owned by
//! whoever awaited the supervisor; there is no process-wide store global.

pub mod http;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ContactError, Result};
use crate::supervisor::Connector;
use crate::types::ContactRecord;

pub use self::http::{HttpDocumentStore, HttpStoreConnector};
pub use self::memory::{MemoryConnector, MemoryStore};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short label for logs and the health endpoint.
    fn describe(&self) -> String;

    /// Persist one record and return the id the store assigned to it.
    async fn insert_contact(&self, record: &ContactRecord) -> Result<String>;
}

/// Where the store lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescriptor {
    /// `memory://` or an `http(s)://` base URL.
    pub address: String,
    pub database: String,
    pub collection: String,
    pub token: Option<String>,
    /// Per-attempt timeout for the connect call.
    pub connect_timeout: Duration,
}

impl Default for StoreDescriptor {
    fn default() -> Self {
        Self {
            address: "memory://".to_string(),
            database: "contactdesk".to_string(),
            collection: "contacts".to_string(),
            token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl StoreDescriptor {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            address: std::env::var("CONTACTDESK_STORE_URL").unwrap_or(defaults.address),
            database: std::env::var("CONTACTDESK_STORE_DATABASE").unwrap_or(defaults.database),
            collection: std::env::var("CONTACTDESK_STORE_COLLECTION")
                .unwrap_or(defaults.collection),
            token: std::env::var("CONTACTDESK_STORE_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            connect_timeout: std::env::var("CONTACTDESK_STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        }
    }

    pub fn is_memory(&self) -> bool {
        self.address.starts_with("memory://")
    }

    /// Address with any `user:password@` userinfo stripped, for logging.
    pub fn redacted_address(&self) -> String {
        match self.address.split_once("://") {
            Some((scheme, rest)) => match rest.split_once('@') {
                Some((_, host)) => format!("{}://***@{}", scheme, host),
                None => self.address.clone(),
            },
            None => self.address.clone(),
        }
    }
}

/// Picks the connector matching the descriptor's scheme.
pub enum StoreConnector {
    Memory(MemoryConnector),
    Http(HttpStoreConnector),
}

impl StoreConnector {
    pub fn from_descriptor(descriptor: StoreDescriptor) -> Result<Self> {
        if descriptor.is_memory() {
            return Ok(StoreConnector::Memory(MemoryConnector::from_address(
                &descriptor.address,
            )?));
        }
        if descriptor.address.starts_with("http://") || descriptor.address.starts_with("https://")
        {
            return Ok(StoreConnector::Http(HttpStoreConnector::new(descriptor)));
        }
        Err(ContactError::Config(format!(
            "Unsupported store address '{}': expected memory:// or http(s)://",
            descriptor.redacted_address()
        )))
    }
}

#[async_trait]
impl Connector for StoreConnector {
    type Handle = Arc<dyn DocumentStore>;

    fn target(&self) -> String {
        match self {
            StoreConnector::Memory(c) => c.target(),
            StoreConnector::Http(c) => c.target(),
        }
    }

    async fn connect(&self) -> Result<Self::Handle> {
        match self {
            StoreConnector::Memory(c) => {
                let store: Arc<dyn DocumentStore> = c.connect().await?;
                Ok(store)
            }
            StoreConnector::Http(c) => {
                let store: Arc<dyn DocumentStore> = Arc::new(c.connect().await?);
                Ok(store)
            }
        }
    }
}

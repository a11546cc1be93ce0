use crate::config::SiteConfig;
use contactdesk::{ConnectionSupervisor, DocumentStore};
use contactdesk_relay::RelayManager;
use std::sync::Arc;

pub mod contact;
pub mod health;
pub mod site;

/// Shared handler state. Built only after the store connection is up, so
/// `store` is always a live handle.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub supervisor: Arc<ConnectionSupervisor>,
    pub relays: Arc<RelayManager>,
    pub site: SiteConfig,
}

pub use contact::submit_contact;
pub use health::health;
pub use site::{robots, sitemap};

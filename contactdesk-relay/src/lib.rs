pub mod config;
pub mod manager;
pub mod messenger;
pub mod sheet;
pub mod types;

pub use config::RelayConfig;
pub use manager::RelayManager;
pub use types::{RelayReport, RelayStatus};

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub sheet: Option<SheetConfig>,
    #[serde(default)]
    pub messenger: Option<MessengerConfig>,
}

/// Webhook that appends one row to the submissions spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub endpoint: String, // e.g., "https://sheets-bridge.internal/append"
    #[serde(default)]
    pub token: Option<String>,
}

/// Webhook that sends one chat message to a fixed destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessengerConfig {
    pub endpoint: String,
    pub destination: String, // chat or phone identifier understood by the relay
    #[serde(default)]
    pub token: Option<String>,
}

impl RelayConfig {
    /// Load relay configuration from {data_dir}/relay.json, falling back to
    /// `CONTACTDESK_*` environment variables when the file is absent or broken.
    pub fn load_or_default(data_dir: &Path) -> Self {
        let relay_json = data_dir.join("relay.json");

        if relay_json.exists() {
            match std::fs::read_to_string(&relay_json) {
                Ok(content) => match serde_json::from_str::<RelayConfig>(&content) {
                    Ok(config) => {
                        tracing::info!(
                            "Loaded relay config: sheet={}, messenger={}",
                            config.sheet.is_some(),
                            config.messenger.is_some()
                        );
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse relay.json: {}, using environment", e);
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read relay.json: {}, using environment", e);
                }
            }
        }

        Self::from_env()
    }

    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let sheet = var("CONTACTDESK_SHEET_URL").map(|endpoint| SheetConfig {
            endpoint,
            token: var("CONTACTDESK_SHEET_TOKEN"),
        });

        let messenger = match (
            var("CONTACTDESK_MESSENGER_URL"),
            var("CONTACTDESK_MESSENGER_DESTINATION"),
        ) {
            (Some(endpoint), Some(destination)) => Some(MessengerConfig {
                endpoint,
                destination,
                token: var("CONTACTDESK_MESSENGER_TOKEN"),
            }),
            (Some(_), None) => {
                tracing::warn!(
                    "CONTACTDESK_MESSENGER_URL set without CONTACTDESK_MESSENGER_DESTINATION, messenger relay disabled"
                );
                None
            }
            _ => None,
        };

        RelayConfig { sheet, messenger }
    }
}

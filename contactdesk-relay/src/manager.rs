use super::config::RelayConfig;
use super::messenger::MessengerClient;
use super::sheet::SheetClient;
use super::types::{RelayReport, RelayStatus};
use contactdesk::{ContactError, ContactRecord};
use std::sync::Arc;

/// Forwards a persisted submission to the spreadsheet, then to chat.
pub struct RelayManager {
    sheet: Option<SheetClient>,
    messenger: Option<MessengerClient>,
}

impl RelayManager {
    pub fn new(config: RelayConfig) -> Arc<Self> {
        Arc::new(Self {
            sheet: config.sheet.map(SheetClient::new),
            messenger: config.messenger.map(MessengerClient::new),
        })
    }

    /// Manager with every relay disabled
    pub fn disabled() -> Arc<Self> {
        Self::new(RelayConfig::default())
    }

    pub fn sheet_enabled(&self) -> bool {
        self.sheet.is_some()
    }

    pub fn messenger_enabled(&self) -> bool {
        self.messenger.is_some()
    }

    /// Relay in series; the first failure stops the chain.
    pub async fn relay(&self, record: &ContactRecord) -> contactdesk::Result<RelayReport> {
        let sheet = match &self.sheet {
            Some(client) => {
                client.append_row(record).await.map_err(|e| {
                    tracing::warn!("[RELAY {}] sheet append failed: {}", record.id, e);
                    ContactError::Relay {
                        service: "sheet".to_string(),
                        message: e,
                    }
                })?;
                tracing::info!("[RELAY {}] row appended to {}", record.id, client.endpoint());
                RelayStatus::Delivered
            }
            None => RelayStatus::Skipped,
        };

        let messenger = match &self.messenger {
            Some(client) => {
                client
                    .send_text(&format_message(record))
                    .await
                    .map_err(|e| {
                        tracing::warn!("[RELAY {}] message send failed: {}", record.id, e);
                        ContactError::Relay {
                            service: "messenger".to_string(),
                            message: e,
                        }
                    })?;
                tracing::info!(
                    "[RELAY {}] message sent to {}",
                    record.id,
                    client.destination()
                );
                RelayStatus::Delivered
            }
            None => RelayStatus::Skipped,
        };

        Ok(RelayReport { sheet, messenger })
    }
}

/// Chat text for one submission
pub fn format_message(record: &ContactRecord) -> String {
    format!(
        "New contact form submission\nName: {}\nEmail: {}\nPhone: {}\nMessage: {}",
        record.name, record.email, record.phone, record.message
    )
}

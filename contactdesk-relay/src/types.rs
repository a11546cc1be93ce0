use serde::{Deserialize, Serialize};

/// Body posted to the spreadsheet-append webhook
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppendRowRequest {
    pub values: Vec<Vec<String>>, // one inner vec per row
}

/// Body posted to the messaging webhook
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelayStatus {
    Delivered,
    /// Service not configured
    Skipped,
}

/// What happened to one submission downstream of the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayReport {
    pub sheet: RelayStatus,
    pub messenger: RelayStatus,
}

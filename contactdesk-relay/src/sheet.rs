use super::config::SheetConfig;
use super::types::AppendRowRequest;
use contactdesk::ContactRecord;
use std::time::Duration;

/// HTTP client for the spreadsheet-append webhook
pub struct SheetClient {
    endpoint: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl SheetClient {
    pub fn new(config: SheetConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: config.endpoint,
            token: config.token,
            http_client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Column order of the submissions sheet
    pub fn row_for(record: &ContactRecord) -> Vec<String> {
        vec![
            record.submitted_at.to_rfc3339(),
            record.name.clone(),
            record.email.clone(),
            record.phone.clone(),
            record.message.clone(),
        ]
    }

    /// Append one row for this record
    pub async fn append_row(&self, record: &ContactRecord) -> Result<(), String> {
        let req = AppendRowRequest {
            values: vec![Self::row_for(record)],
        };

        let mut request = self.http_client.post(&self.endpoint).json(&req);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Failed to send row to {}: {}", self.endpoint, e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Sheet endpoint {} returned error: {}",
                self.endpoint,
                response.status()
            ));
        }

        Ok(())
    }
}

use async_trait::async_trait;

use super::{DocumentStore, StoreDescriptor};
use crate::error::{ContactError, Result};
use crate::supervisor::Connector;
use crate::types::ContactRecord;

/// Connects to a JSON document API.
///
/// * connect: `GET {address}/{database}` must answer 2xx
/// * insert: `POST {address}/{database}/{collection}` with the record body,
///   optionally answering `{"id": "..."}`
pub struct HttpStoreConnector {
    descriptor: StoreDescriptor,
    http_client: reqwest::Client,
}

impl HttpStoreConnector {
    pub fn new(descriptor: StoreDescriptor) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(descriptor.connect_timeout)
            .timeout(descriptor.connect_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            descriptor,
            http_client,
        }
    }

    fn base_url(&self) -> &str {
        self.descriptor.address.trim_end_matches('/')
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.descriptor.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Connector for HttpStoreConnector {
    type Handle = HttpDocumentStore;

    fn target(&self) -> String {
        let redacted = self.descriptor.redacted_address();
        format!(
            "{}/{}/{}",
            redacted.trim_end_matches('/'),
            self.descriptor.database,
            self.descriptor.collection
        )
    }

    async fn connect(&self) -> Result<Self::Handle> {
        let url = format!("{}/{}", self.base_url(), self.descriptor.database);

        let response = self
            .authorize(self.http_client.get(&url))
            .send()
            .await
            .map_err(|e| ContactError::Connect(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ContactError::Connect(format!(
                "store answered {} for database '{}'",
                response.status(),
                self.descriptor.database
            )));
        }

        Ok(HttpDocumentStore {
            http_client: self.http_client.clone(),
            collection_url: format!(
                "{}/{}/{}",
                self.base_url(),
                self.descriptor.database,
                self.descriptor.collection
            ),
            token: self.descriptor.token.clone(),
            label: self.target(),
        })
    }
}

/// A connected handle to the document API.
pub struct HttpDocumentStore {
    http_client: reqwest::Client,
    collection_url: String,
    token: Option<String>,
    label: String,
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn insert_contact(&self, record: &ContactRecord) -> Result<String> {
        let mut request = self.http_client.post(&self.collection_url).json(record);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ContactError::Store(format!(
                "insert into {} failed: {}",
                self.label,
                response.status()
            )));
        }

        let assigned = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("id").and_then(|id| id.as_str()).map(String::from));

        Ok(assigned.unwrap_or_else(|| record.id.clone()))
    }
}

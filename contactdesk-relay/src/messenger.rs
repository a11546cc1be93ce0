use super::config::MessengerConfig;
use super::types::SendMessageRequest;
use std::time::Duration;

/// HTTP client for the messaging relay (one text message per call)
pub struct MessengerClient {
    endpoint: String,
    destination: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl MessengerClient {
    pub fn new(config: MessengerConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: config.endpoint,
            destination: config.destination,
            token: config.token,
            http_client,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Send `body` to the configured destination
    pub async fn send_text(&self, body: &str) -> Result<(), String> {
        self.send_text_to(&self.destination, body).await
    }

    pub async fn send_text_to(&self, destination: &str, body: &str) -> Result<(), String> {
        let req = SendMessageRequest {
            to: destination.to_string(),
            body: body.to_string(),
        };

        let mut request = self.http_client.post(&self.endpoint).json(&req);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Failed to send message via {}: {}", self.endpoint, e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Messenger endpoint {} returned error: {}",
                self.endpoint,
                response.status()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_text_posts_destination_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(body_json(serde_json::json!({"to": "ops-room", "body": "hi"})))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = MessengerClient::new(MessengerConfig {
            endpoint: format!("{}/send", server.uri()),
            destination: "ops-room".to_string(),
            token: None,
        });
        client.send_text("hi").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_text_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = MessengerClient::new(MessengerConfig {
            endpoint: format!("http://{}/send", addr),
            destination: "ops-room".to_string(),
            token: None,
        });
        let err = client.send_text("hi").await.unwrap_err();
        assert!(err.starts_with("Failed to send message"));
    }
}

use ambiente_domain::{AlertNotifier, DomainError, DomainResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends threshold alerts to a configured webhook endpoint.
///
/// Single attempt per alert: the pipeline treats notification as
/// fire-and-forget, and there is no durable retry queue behind it.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Repository(anyhow::anyhow!(e)))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl AlertNotifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> DomainResult<()> {
        let payload = serde_json::json!({ "content": message });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::NotifyFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::NotifyFailed(format!(
                "webhook returned HTTP {}",
                response.status().as_u16()
            )));
        }

        debug!(url = %self.webhook_url, "Delivered alert notification");
        Ok(())
    }
}

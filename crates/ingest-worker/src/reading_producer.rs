use ambiente_domain::{DomainError, DomainResult, Reading, ReadingPublisher};
use ambiente_nats::JetStreamPublisher;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// Publishes readings onto the ingestion stream as JSON.
///
/// Backs the domain `ReadingPublisher` trait for the HTTP save route:
/// a reading submitted over HTTP is enqueued here and then decoded,
/// alert-checked, persisted and broadcast by the ingest worker, the same
/// path a queue producer's reading takes.
pub struct ReadingProducer {
    publisher: Arc<dyn JetStreamPublisher>,
    subject: String,
}

impl ReadingProducer {
    pub fn new(publisher: Arc<dyn JetStreamPublisher>, subject: String) -> Self {
        Self { publisher, subject }
    }
}

#[async_trait]
impl ReadingPublisher for ReadingProducer {
    async fn publish(&self, reading: &Reading) -> DomainResult<()> {
        let payload = serde_json::json!({
            "luminosity": reading.lumen,
            "temperature": reading.temperature,
            "humidity": reading.humidity,
            "captured_at": reading.captured_at,
        });

        let bytes = Bytes::from(payload.to_string());
        self.publisher
            .publish(self.subject.clone(), bytes)
            .await
            .map_err(DomainError::Repository)?;

        debug!(subject = %self.subject, "Published reading");
        Ok(())
    }
}

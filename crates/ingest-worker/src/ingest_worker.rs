use crate::reading_processor::ReadingIngestService;
use ambiente_domain::IngestService;
use ambiente_nats::{ConsumerConfig, JetStreamConsumer, TowerConsumer};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Settings for the ingestion worker's durable consumer.
pub struct IngestWorkerConfig {
    pub stream_name: String,
    pub consumer_name: String,
    pub subject_filter: String,
    pub batch_size: usize,
    pub batch_wait_secs: u64,
    pub max_deliver: i64,
}

/// The ingestion worker: one durable consumer feeding every delivered
/// message through the ingestion pipeline.
pub struct IngestWorker {
    consumer: TowerConsumer<ReadingIngestService>,
}

impl IngestWorker {
    pub async fn new(
        jetstream: Arc<dyn JetStreamConsumer>,
        ingest_service: Arc<IngestService>,
        config: IngestWorkerConfig,
    ) -> anyhow::Result<Self> {
        info!(
            stream = %config.stream_name,
            subject = %config.subject_filter,
            "Initializing ingestion worker"
        );

        let consumer = TowerConsumer::new(
            jetstream,
            ConsumerConfig {
                stream_name: config.stream_name,
                consumer_name: config.consumer_name,
                subject_filter: config.subject_filter,
                batch_size: config.batch_size,
                max_wait_secs: config.batch_wait_secs,
                max_deliver: config.max_deliver,
            },
            ReadingIngestService::new(ingest_service),
        )
        .await?;

        Ok(Self { consumer })
    }

    /// Hand the consumer loop to the application runner.
    pub fn into_runner_process(
        self,
    ) -> impl FnOnce(
        CancellationToken,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
    > + Send {
        let consumer = self.consumer;
        move |ctx| Box::pin(async move { consumer.run(ctx).await })
    }
}

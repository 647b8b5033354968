use crate::consumer_types::{ConsumeRequest, ConsumeResponse};
use crate::traits::{JetStreamConsumer, PullConsumer};
use anyhow::{Context, Result};
use async_nats::jetstream;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Settings for one durable pull consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub stream_name: String,
    pub consumer_name: String,
    pub subject_filter: String,
    pub batch_size: usize,
    pub max_wait_secs: u64,
    /// Upper bound on delivery attempts per message. Bounds the
    /// redelivery cycle a transiently failing store would otherwise
    /// cause; the broker stops redelivering after this many attempts.
    pub max_deliver: i64,
}

/// A NATS consumer that feeds each delivered message through a Tower
/// service and resolves its acknowledgment from the returned
/// [`ConsumeResponse`].
///
/// Messages are converted to owned `ConsumeRequest`s before being passed to
/// the service; the service never touches the acknowledgment handle, so
/// every message is acked or nak'ed exactly once here regardless of where
/// processing fails.
pub struct TowerConsumer<S> {
    consumer: Box<dyn PullConsumer>,
    stream_name: String,
    consumer_name: String,
    batch_size: usize,
    max_wait: Duration,
    service: S,
}

impl<S> TowerConsumer<S>
where
    S: tower::Service<ConsumeRequest, Response = ConsumeResponse, Error = anyhow::Error>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    pub async fn new(
        jetstream: Arc<dyn JetStreamConsumer>,
        config: ConsumerConfig,
        service: S,
    ) -> Result<Self> {
        debug!(
            stream = %config.stream_name,
            consumer = %config.consumer_name,
            filter_subject = %config.subject_filter,
            "creating tower nats consumer"
        );

        let pull_config = jetstream::consumer::pull::Config {
            name: Some(config.consumer_name.clone()),
            durable_name: Some(config.consumer_name.clone()),
            filter_subject: config.subject_filter.clone(),
            ack_policy: jetstream::consumer::AckPolicy::Explicit,
            max_deliver: config.max_deliver,
            ..Default::default()
        };

        let consumer = jetstream
            .create_consumer(pull_config, &config.stream_name)
            .await
            .context("failed to create consumer")?;

        Ok(Self {
            consumer,
            stream_name: config.stream_name,
            consumer_name: config.consumer_name,
            batch_size: config.batch_size,
            max_wait: Duration::from_secs(config.max_wait_secs),
            service,
        })
    }

    /// Run the consumer loop until cancellation.
    pub async fn run(mut self, ctx: CancellationToken) -> Result<()> {
        info!(
            stream = %self.stream_name,
            consumer = %self.consumer_name,
            "starting consumer loop"
        );

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!(
                        stream = %self.stream_name,
                        consumer = %self.consumer_name,
                        "received shutdown signal, stopping consumer"
                    );
                    break;
                }
                result = self.fetch_and_process_batch() => {
                    if let Err(e) = result {
                        error!(
                            stream = %self.stream_name,
                            consumer = %self.consumer_name,
                            error = %e,
                            "error processing batch"
                        );
                        // Continue processing despite errors
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        info!(
            stream = %self.stream_name,
            consumer = %self.consumer_name,
            "consumer stopped gracefully"
        );
        Ok(())
    }

    async fn fetch_and_process_batch(&mut self) -> Result<()> {
        let raw_messages = self
            .consumer
            .fetch_messages(self.batch_size, self.max_wait)
            .await?;

        if raw_messages.is_empty() {
            debug!("no messages in batch");
            return Ok(());
        }

        debug!(message_count = raw_messages.len(), "received message batch");

        // Process each message individually; one acknowledgment per message.
        for msg in &raw_messages {
            let request = ConsumeRequest::new(
                msg.subject.to_string(),
                Bytes::copy_from_slice(&msg.payload),
                msg.headers.clone(),
            );

            let response = match self.service.call(request).await {
                Ok(resp) => resp,
                Err(e) => {
                    error!(
                        subject = %msg.subject,
                        error = %e,
                        "service error processing message"
                    );
                    ConsumeResponse::nak(e.to_string())
                }
            };

            match response {
                ConsumeResponse::Ack => {
                    if let Err(e) = msg.ack().await {
                        error!(
                            subject = %msg.subject,
                            error = %e,
                            "failed to acknowledge message"
                        );
                    }
                }
                ConsumeResponse::Nak(reason) => {
                    if let Some(ref r) = reason {
                        warn!(
                            subject = %msg.subject,
                            reason = %r,
                            "rejecting message for redelivery"
                        );
                    }
                    if let Err(e) = msg
                        .ack_with(jetstream::AckKind::Nak(None))
                        .await
                    {
                        error!(
                            subject = %msg.subject,
                            error = %e,
                            "failed to reject message"
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockJetStreamConsumer, MockPullConsumer};
    use futures::future::BoxFuture;
    use std::task::{Context as TaskContext, Poll};

    #[derive(Clone)]
    struct AckEverything;

    impl tower::Service<ConsumeRequest> for AckEverything {
        type Response = ConsumeResponse;
        type Error = anyhow::Error;
        type Future = BoxFuture<'static, Result<ConsumeResponse, anyhow::Error>>;

        fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: ConsumeRequest) -> Self::Future {
            Box::pin(async { Ok(ConsumeResponse::ack()) })
        }
    }

    fn test_config() -> ConsumerConfig {
        ConsumerConfig {
            stream_name: "sensors".to_string(),
            consumer_name: "ingest-worker".to_string(),
            subject_filter: "sensors.readings".to_string(),
            batch_size: 16,
            max_wait_secs: 1,
            max_deliver: 5,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn consumer_is_created_with_durable_explicit_ack_config() {
        let mut jetstream = MockJetStreamConsumer::new();
        jetstream
            .expect_create_consumer()
            .withf(|config: &jetstream::consumer::pull::Config, stream: &str| {
                stream == "sensors"
                    && config.durable_name.as_deref() == Some("ingest-worker")
                    && config.filter_subject == "sensors.readings"
                    && config.max_deliver == 5
                    && matches!(config.ack_policy, jetstream::consumer::AckPolicy::Explicit)
            })
            .times(1)
            .return_once(|_, _| {
                let mut pull = MockPullConsumer::new();
                pull.expect_fetch_messages().returning(|_, _| Ok(vec![]));
                Ok(Box::new(pull))
            });

        let consumer = TowerConsumer::new(Arc::new(jetstream), test_config(), AckEverything)
            .await
            .unwrap();

        // An empty-batch loop terminates promptly on cancellation.
        let token = CancellationToken::new();
        let handle = tokio::spawn(consumer.run(token.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        handle.await.unwrap().unwrap();
    }
}

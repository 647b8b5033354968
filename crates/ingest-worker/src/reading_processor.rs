use ambiente_domain::{IngestOutcome, IngestService};
use ambiente_nats::{ConsumeRequest, ConsumeResponse};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;
use tracing::debug;

/// Tower service bridging consumed queue messages to the ingestion
/// pipeline.
///
/// The mapping from pipeline outcome to acknowledgment is the poison-message
/// policy: undecodable and permanently unstorable messages are acked away,
/// only a transient store failure naks for redelivery.
#[derive(Clone)]
pub struct ReadingIngestService {
    ingest: Arc<IngestService>,
}

impl ReadingIngestService {
    pub fn new(ingest: Arc<IngestService>) -> Self {
        Self { ingest }
    }
}

impl Service<ConsumeRequest> for ReadingIngestService {
    type Response = ConsumeResponse;
    type Error = anyhow::Error;
    type Future = BoxFuture<'static, Result<ConsumeResponse, anyhow::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ConsumeRequest) -> Self::Future {
        let ingest = self.ingest.clone();

        Box::pin(async move {
            let response = match ingest.ingest(&req.payload).await {
                IngestOutcome::Accepted(reading) => {
                    debug!(
                        subject = %req.subject,
                        captured_at = %reading.captured_at,
                        "reading accepted"
                    );
                    ConsumeResponse::ack()
                }
                // Dropped, not requeued: redelivering poison only loops.
                IngestOutcome::Poison(_) => ConsumeResponse::ack(),
                IngestOutcome::Retry(reason) => ConsumeResponse::nak(reason),
            };
            Ok(response)
        })
    }
}

use crate::decoder::decode_reading;
use crate::error::DomainError;
use crate::repository::{AlertNotifier, ReadingBroadcaster, ReadingStore};
use crate::threshold::ThresholdEvaluator;
use crate::types::Reading;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Per-message outcome of the ingestion pipeline.
///
/// The transport layer maps this to message acknowledgment: `Accepted` and
/// `Poison` remove the message from the queue, `Retry` leaves it for
/// redelivery.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Reading decoded and persisted; alert and broadcast were attempted.
    Accepted(Reading),
    /// Payload could not be decoded. Dropped rather than requeued so a
    /// malformed producer cannot wedge the queue.
    Poison(String),
    /// Persistence failed transiently; the message should be redelivered.
    Retry(String),
}

/// Orchestrates the ingestion pipeline for one consumed message:
/// decode, then alert-check, persist and broadcast.
///
/// The three post-decode stages are independent: failure in any one never
/// prevents the others from running for the same reading. Only a transient
/// store failure withholds acknowledgment.
pub struct IngestService {
    store: Arc<dyn ReadingStore>,
    evaluator: ThresholdEvaluator,
    notifier: Arc<dyn AlertNotifier>,
    broadcaster: Arc<dyn ReadingBroadcaster>,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn ReadingStore>,
        evaluator: ThresholdEvaluator,
        notifier: Arc<dyn AlertNotifier>,
        broadcaster: Arc<dyn ReadingBroadcaster>,
    ) -> Self {
        Self {
            store,
            evaluator,
            notifier,
            broadcaster,
        }
    }

    pub async fn ingest(&self, payload: &[u8]) -> IngestOutcome {
        let reading = match decode_reading(payload) {
            Ok(reading) => reading,
            Err(e) => {
                warn!(error = %e, payload_size = payload.len(), "Dropping undecodable message");
                return IngestOutcome::Poison(e.to_string());
            }
        };

        debug!(
            temperature = reading.temperature,
            lumen = reading.lumen,
            humidity = reading.humidity,
            "Decoded reading"
        );

        // Alerting is fire-and-forget relative to the critical path: the
        // decision is evaluated here, the notify result only logged.
        let decision = self.evaluator.evaluate(&reading);
        if decision.triggered {
            info!(temperature = reading.temperature, "Temperature out of range");
            if let Err(e) = self.notifier.notify(&decision.message).await {
                error!(error = %e, "Alert notification failed");
            }
        }

        let save_result = self.store.save(&reading).await;

        if let Err(e) = self.broadcaster.broadcast(&reading).await {
            error!(error = %e, "Broadcast failed");
        }

        match save_result {
            Ok(()) => IngestOutcome::Accepted(reading),
            Err(e @ DomainError::StoreUnavailable(_)) => {
                warn!(error = %e, "Transient store failure, leaving message for redelivery");
                IngestOutcome::Retry(e.to_string())
            }
            Err(e) => {
                // Permanent store failure: the reading will never persist,
                // so redelivery would only cycle. Drop with a log.
                error!(error = %e, "Store rejected reading, dropping message");
                IngestOutcome::Poison(e.to_string())
            }
        }
    }
}

mod ingest_worker;
mod reading_processor;
mod reading_producer;
mod webhook;

pub use ingest_worker::{IngestWorker, IngestWorkerConfig};
pub use reading_processor::ReadingIngestService;
pub use reading_producer::ReadingProducer;
pub use webhook::WebhookNotifier;

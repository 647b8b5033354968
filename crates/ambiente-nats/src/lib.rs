mod client;
mod consumer;
mod consumer_types;
mod traits;

pub use client::{NatsClient, NatsJetStreamConsumer, NatsJetStreamPublisher, NatsPullConsumer};
pub use consumer::{ConsumerConfig, TowerConsumer};
pub use consumer_types::{ConsumeRequest, ConsumeResponse};
pub use traits::{JetStreamConsumer, JetStreamPublisher, PullConsumer};

#[cfg(any(test, feature = "testing"))]
pub use traits::{MockJetStreamConsumer, MockJetStreamPublisher, MockPullConsumer};

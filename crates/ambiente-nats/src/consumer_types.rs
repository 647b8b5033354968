use async_nats::HeaderMap;
use bytes::Bytes;

/// One delivered message, detached from its acknowledgment handle.
///
/// Owns all message data so it can move through the processing service
/// without lifetime concerns; the consumer loop keeps the handle and
/// resolves it exactly once from the returned [`ConsumeResponse`].
#[derive(Debug, Clone)]
pub struct ConsumeRequest {
    /// The NATS subject the message was published to
    pub subject: String,
    /// The message payload
    pub payload: Bytes,
    /// Optional headers
    pub headers: Option<HeaderMap>,
}

impl ConsumeRequest {
    pub fn new(subject: String, payload: Bytes, headers: Option<HeaderMap>) -> Self {
        Self {
            subject,
            payload,
            headers,
        }
    }
}

/// Acknowledgment decision for one consumed message.
#[derive(Debug, Clone)]
pub enum ConsumeResponse {
    /// Message handled - remove it from the queue
    Ack,
    /// Message processing failed - reject it for redelivery
    Nak(Option<String>),
}

impl ConsumeResponse {
    pub fn ack() -> Self {
        Self::Ack
    }

    pub fn nak(reason: impl Into<String>) -> Self {
        Self::Nak(Some(reason.into()))
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, Self::Ack)
    }

    pub fn is_nak(&self) -> bool {
        matches!(self, Self::Nak(_))
    }
}

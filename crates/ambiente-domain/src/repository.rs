use crate::error::DomainResult;
use crate::types::{Reading, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage collaborator for readings.
/// Infrastructure (ambiente-postgres) implements this trait.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist one reading. Duplicates are permitted.
    async fn save(&self, reading: &Reading) -> DomainResult<()>;

    /// All persisted readings, in no particular order.
    async fn get_all(&self) -> DomainResult<Vec<Reading>>;

    /// Readings whose `captured_at` equals `date` exactly.
    async fn get_by_date(&self, date: DateTime<Utc>) -> DomainResult<Vec<Reading>>;
}

/// Producer-side channel onto the ingestion stream.
/// The HTTP save route publishes through this so submitted readings take
/// the same decode, alert and broadcast path as queue producers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReadingPublisher: Send + Sync {
    /// Enqueue one reading for ingestion.
    async fn publish(&self, reading: &Reading) -> DomainResult<()>;
}

/// Outbound alert channel for out-of-range readings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, message: &str) -> DomainResult<()>;
}

/// Push channel to live subscribers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReadingBroadcaster: Send + Sync {
    /// Push one accepted reading to every connected subscriber.
    async fn broadcast(&self, reading: &Reading) -> DomainResult<()>;
}

/// Storage collaborator for users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> DomainResult<()>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
}

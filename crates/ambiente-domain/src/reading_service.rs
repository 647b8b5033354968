use crate::error::DomainResult;
use crate::repository::ReadingStore;
use crate::types::Reading;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Query-side use case over persisted readings, shared by the HTTP routes
/// and the on-demand WebSocket subscription requests.
pub struct ReadingService {
    store: Arc<dyn ReadingStore>,
}

impl ReadingService {
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self { store }
    }

    pub async fn get_readings(&self) -> DomainResult<Vec<Reading>> {
        self.store.get_all().await
    }

    pub async fn get_readings_by_date(&self, date: DateTime<Utc>) -> DomainResult<Vec<Reading>> {
        self.store.get_by_date(date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockReadingStore;

    fn reading(captured_at: &str) -> Reading {
        Reading {
            lumen: 550.0,
            temperature: 22.0,
            humidity: 65.0,
            captured_at: captured_at.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn get_readings_surfaces_everything_in_the_store() {
        let stored = reading("2024-05-01T12:00:00Z");
        let returned = stored.clone();

        let mut store = MockReadingStore::new();
        store
            .expect_get_all()
            .times(1)
            .return_once(move || Ok(vec![returned]));

        let service = ReadingService::new(Arc::new(store));
        let all = service.get_readings().await.unwrap();
        assert!(all.contains(&stored));
    }

    #[tokio::test]
    async fn get_by_date_passes_the_exact_instant_through() {
        let date: DateTime<Utc> = "2024-05-01T12:00:00Z".parse().unwrap();

        let mut store = MockReadingStore::new();
        store
            .expect_get_by_date()
            .withf(move |d: &DateTime<Utc>| *d == date)
            .times(1)
            .return_once(|_| Ok(vec![]));

        let service = ReadingService::new(Arc::new(store));
        let result = service.get_readings_by_date(date).await.unwrap();
        assert!(result.is_empty());
    }
}

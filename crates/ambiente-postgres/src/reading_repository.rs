use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use ambiente_domain::{DomainError, DomainResult, Reading, ReadingStore};

use crate::client::PostgresClient;
use crate::models::ReadingRow;

/// PostgreSQL implementation of the ReadingStore trait.
///
/// Save failures are classified: connection or pool loss is transient
/// (`StoreUnavailable`, the pipeline withholds acknowledgment), a statement
/// the server rejects is permanent (`StoreRejected`, the message is
/// dropped).
#[derive(Clone)]
pub struct PostgresReadingStore {
    client: PostgresClient,
}

impl PostgresReadingStore {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }

    fn classify(e: tokio_postgres::Error) -> DomainError {
        match e.as_db_error() {
            // The server answered and refused the statement.
            Some(db_err) => DomainError::StoreRejected(db_err.message().to_string()),
            // No server response: connection-level failure.
            None => DomainError::StoreUnavailable(e.to_string()),
        }
    }

    fn row_to_reading(row: &tokio_postgres::Row) -> Reading {
        ReadingRow {
            lumen: row.get(0),
            temperature: row.get(1),
            humidity: row.get(2),
            captured_at: row.get(3),
        }
        .into()
    }
}

#[async_trait]
impl ReadingStore for PostgresReadingStore {
    async fn save(&self, reading: &Reading) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        // No uniqueness constraint: duplicate readings are permitted.
        conn.execute(
            "INSERT INTO readings (lumen, temperature, humidity, captured_at)
             VALUES ($1, $2, $3, $4)",
            &[
                &reading.lumen,
                &reading.temperature,
                &reading.humidity,
                &reading.captured_at,
            ],
        )
        .await
        .map_err(Self::classify)?;

        debug!(captured_at = %reading.captured_at, "Inserted reading");
        Ok(())
    }

    async fn get_all(&self) -> DomainResult<Vec<Reading>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        let rows = conn
            .query(
                "SELECT lumen, temperature, humidity, captured_at FROM readings",
                &[],
            )
            .await
            .map_err(Self::classify)?;

        Ok(rows.iter().map(Self::row_to_reading).collect())
    }

    async fn get_by_date(&self, date: DateTime<Utc>) -> DomainResult<Vec<Reading>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        // Exact-equality filter, inherited from the source system.
        let rows = conn
            .query(
                "SELECT lumen, temperature, humidity, captured_at FROM readings
                 WHERE captured_at = $1",
                &[&date],
            )
            .await
            .map_err(Self::classify)?;

        Ok(rows.iter().map(Self::row_to_reading).collect())
    }
}

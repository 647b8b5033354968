use ambiente_domain::{DomainError, Reading, ReadingStore};
use ambiente_postgres::{PostgresClient, PostgresReadingStore};
use chrono::{DateTime, Duration, Utc};
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

async fn setup_test_db() -> (ContainerAsync<Postgres>, PostgresReadingStore, PostgresClient) {
    let postgres = Postgres::default().start().await.unwrap();
    let host = postgres.get_host().await.unwrap();
    let port = postgres.get_host_port_ipv4(5432).await.unwrap();

    let client = PostgresClient::new(&host.to_string(), port, "postgres", "postgres", "postgres", 5)
        .expect("Failed to create client");

    // Apply the readings schema (migrations/postgres/00001_create_readings.sql).
    let conn = client.get_connection().await.unwrap();
    conn.batch_execute(
        "CREATE TABLE readings (
            id BIGSERIAL PRIMARY KEY,
            lumen DOUBLE PRECISION NOT NULL,
            temperature DOUBLE PRECISION NOT NULL,
            humidity DOUBLE PRECISION NOT NULL,
            captured_at TIMESTAMPTZ NOT NULL
        );
        CREATE INDEX readings_captured_at_idx ON readings (captured_at);",
    )
    .await
    .expect("Schema setup failed");

    let store = PostgresReadingStore::new(client.clone());

    (postgres, store, client)
}

fn reading(captured_at: DateTime<Utc>) -> Reading {
    Reading {
        lumen: 550.0,
        temperature: 22.0,
        humidity: 65.0,
        captured_at,
    }
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_save_then_get_all_contains_the_reading() {
    let (_container, store, _client) = setup_test_db().await;

    let saved = reading("2024-05-01T12:00:00Z".parse().unwrap());
    store.save(&saved).await.unwrap();

    let all = store.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], saved);
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_get_by_date_excludes_a_reading_one_millisecond_off() {
    let (_container, store, _client) = setup_test_db().await;

    let instant: DateTime<Utc> = "2024-05-01T12:00:00Z".parse().unwrap();
    store.save(&reading(instant)).await.unwrap();

    let exact = store.get_by_date(instant).await.unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].captured_at, instant);

    let shifted = store
        .get_by_date(instant + Duration::milliseconds(1))
        .await
        .unwrap();
    assert!(shifted.is_empty());
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_duplicate_readings_are_permitted() {
    let (_container, store, _client) = setup_test_db().await;

    let saved = reading("2024-05-01T12:00:00Z".parse().unwrap());
    store.save(&saved).await.unwrap();
    store.save(&saved).await.unwrap();

    let all = store.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_server_rejected_statement_is_store_rejected() {
    let (_container, store, client) = setup_test_db().await;

    // The server answers and refuses the statement: permanent failure,
    // the pipeline acks and drops the message.
    let conn = client.get_connection().await.unwrap();
    conn.batch_execute("DROP TABLE readings;").await.unwrap();

    let result = store.save(&reading(Utc::now())).await;
    assert!(matches!(result, Err(DomainError::StoreRejected(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_unreachable_server_is_store_unavailable() {
    // Nothing listens on this port: connection-level failure, transient,
    // the pipeline naks for redelivery.
    let client = PostgresClient::new("127.0.0.1", 1, "postgres", "postgres", "postgres", 1)
        .expect("Failed to create client");
    let store = PostgresReadingStore::new(client);

    let result = store.save(&reading(Utc::now())).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
}

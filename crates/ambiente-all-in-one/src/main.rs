mod config;
mod telemetry;

use ambiente_api::ws::{heartbeat_loop, WsBroadcaster, WsManager};
use ambiente_api::AppState;
use ambiente_domain::{
    Argon2PasswordService, IngestService, JwtAuthTokenProvider, JwtConfig, ReadingService,
    TemperatureRange, ThresholdEvaluator, UserService,
};
use ambiente_nats::NatsClient;
use ambiente_postgres::{PostgresClient, PostgresReadingStore, PostgresUserRepository};
use ambiente_runner::Runner;
use config::ServiceConfig;
use ingest_worker::{IngestWorker, IngestWorkerConfig, ReadingProducer, WebhookNotifier};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use telemetry::init_telemetry;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_telemetry(&config.log_level);

    info!(
        stream = %config.readings_stream,
        http_port = config.http_port,
        "Starting ambiente-all-in-one service"
    );

    if let Err(e) = run(config).await {
        error!(error = format!("{:#}", e), "Service exited with error");
        std::process::exit(1);
    }

    info!("Service exited normally");
}

async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    // Transport and storage connections are fatal at startup.
    let nats_client = NatsClient::connect(
        &config.nats_url,
        Duration::from_secs(config.nats_connect_timeout_secs),
    )
    .await?;
    nats_client.ensure_stream(&config.readings_stream).await?;

    let postgres_client = PostgresClient::new(
        &config.postgres_host,
        config.postgres_port,
        &config.postgres_database,
        &config.postgres_username,
        &config.postgres_password,
        config.postgres_pool_size,
    )?;
    postgres_client.ping().await?;

    let reading_store = Arc::new(PostgresReadingStore::new(postgres_client.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(postgres_client));

    // WebSocket fan-out shared between the API and the ingest pipeline.
    let ws_manager = Arc::new(WsManager::new());
    let broadcaster = Arc::new(WsBroadcaster::new(ws_manager.clone()));

    let notifier = Arc::new(WebhookNotifier::new(config.webhook_url.clone())?);
    let evaluator = ThresholdEvaluator::new(TemperatureRange {
        min: config.temperature_min,
        max: config.temperature_max,
    });

    let ingest_service = Arc::new(IngestService::new(
        reading_store.clone(),
        evaluator,
        notifier,
        broadcaster,
    ));

    let ingest_worker = IngestWorker::new(
        nats_client.create_consumer_client(),
        ingest_service,
        IngestWorkerConfig {
            stream_name: config.readings_stream.clone(),
            consumer_name: config.readings_consumer.clone(),
            subject_filter: config.readings_subject.clone(),
            batch_size: config.nats_batch_size,
            batch_wait_secs: config.nats_batch_wait_secs,
            max_deliver: config.nats_max_deliver,
        },
    )
    .await?;

    // HTTP-submitted readings enter the stream and flow through the same
    // pipeline as queue producers.
    let reading_producer = Arc::new(ReadingProducer::new(
        nats_client.create_publisher_client(),
        config.readings_publish_subject.clone(),
    ));

    let reading_service = Arc::new(ReadingService::new(reading_store));
    let token_provider = Arc::new(JwtAuthTokenProvider::new(JwtConfig::new(
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    )));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::new(Argon2PasswordService::new()),
        token_provider.clone(),
    ));

    let state = AppState {
        readings: reading_service,
        publisher: reading_producer,
        users: user_service,
        token_provider,
        ws_manager: ws_manager.clone(),
    };

    let addr: SocketAddr = format!("{}:{}", config.http_host, config.http_port).parse()?;

    let heartbeat_manager = ws_manager.clone();

    Runner::new()
        .with_boxed_app_process(Box::new(ingest_worker.into_runner_process()))
        .with_app_process(move |ctx| async move { ambiente_api::serve(state, addr, ctx).await })
        .with_app_process(move |ctx| async move {
            heartbeat_loop(heartbeat_manager, ctx).await;
            Ok(())
        })
        .with_closer(move || async move {
            ws_manager.shutdown_all().await;
            nats_client.close().await;
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(10))
        .run()
        .await
}

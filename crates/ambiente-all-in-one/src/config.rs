use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // NATS configuration
    /// NATS server URL
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// NATS connection timeout in seconds
    #[serde(default = "default_nats_connect_timeout_secs")]
    pub nats_connect_timeout_secs: u64,

    /// JetStream stream name for sensor readings
    #[serde(default = "default_readings_stream")]
    pub readings_stream: String,

    /// Subject pattern for the reading consumer filter
    #[serde(default = "default_readings_subject")]
    pub readings_subject: String,

    /// Durable consumer name for the ingest worker
    #[serde(default = "default_readings_consumer")]
    pub readings_consumer: String,

    /// Subject the HTTP save route publishes readings on
    #[serde(default = "default_readings_publish_subject")]
    pub readings_publish_subject: String,

    /// Batch size for the pull consumer
    #[serde(default = "default_nats_batch_size")]
    pub nats_batch_size: usize,

    /// Max wait time for batches in seconds
    #[serde(default = "default_nats_batch_wait_secs")]
    pub nats_batch_wait_secs: u64,

    /// Max delivery attempts before a message is dropped by the stream
    #[serde(default = "default_nats_max_deliver")]
    pub nats_max_deliver: i64,

    // PostgreSQL configuration
    /// PostgreSQL host
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,

    /// PostgreSQL port
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,

    /// PostgreSQL database name
    #[serde(default = "default_postgres_database")]
    pub postgres_database: String,

    /// PostgreSQL username
    #[serde(default = "default_postgres_username")]
    pub postgres_username: String,

    /// PostgreSQL password
    #[serde(default = "default_postgres_password")]
    pub postgres_password: String,

    /// Connection pool size
    #[serde(default = "default_postgres_pool_size")]
    pub postgres_pool_size: usize,

    // Alerting configuration
    /// Webhook URL for out-of-range temperature alerts
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,

    /// Lower bound of the safe temperature range, in degrees
    #[serde(default = "default_temperature_min")]
    pub temperature_min: f64,

    /// Upper bound of the safe temperature range, in degrees
    #[serde(default = "default_temperature_max")]
    pub temperature_max: f64,

    // JWT configuration
    /// JWT signing secret (required for production)
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// JWT token expiration in hours
    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    // HTTP configuration
    /// HTTP server host
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

// NATS defaults
fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_nats_connect_timeout_secs() -> u64 {
    10
}

fn default_readings_stream() -> String {
    "readings".to_string()
}

fn default_readings_subject() -> String {
    "readings.*".to_string()
}

fn default_readings_consumer() -> String {
    "ingest-worker".to_string()
}

fn default_readings_publish_subject() -> String {
    "readings.http".to_string()
}

fn default_nats_batch_size() -> usize {
    30
}

fn default_nats_batch_wait_secs() -> u64 {
    5
}

fn default_nats_max_deliver() -> i64 {
    5
}

// PostgreSQL defaults
fn default_postgres_host() -> String {
    "localhost".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_database() -> String {
    "ambiente".to_string()
}

fn default_postgres_username() -> String {
    "ambiente".to_string()
}

fn default_postgres_password() -> String {
    "ambiente".to_string()
}

fn default_postgres_pool_size() -> usize {
    16
}

// Alerting defaults
fn default_webhook_url() -> String {
    "http://localhost:9100/alerts".to_string()
}

fn default_temperature_min() -> f64 {
    10.0
}

fn default_temperature_max() -> f64 {
    38.0
}

// JWT defaults
fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

// HTTP defaults
fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("AMBIENTE"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure tests run serially and don't interfere with each other
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::remove_var("AMBIENTE_LOG_LEVEL");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.readings_stream, "readings");
        assert_eq!(config.nats_max_deliver, 5);
        assert_eq!(config.temperature_min, 10.0);
        assert_eq!(config.temperature_max, 38.0);
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::set_var("AMBIENTE_LOG_LEVEL", "debug");
        std::env::set_var("AMBIENTE_TEMPERATURE_MAX", "40.5");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.temperature_max, 40.5);

        // Clean up
        std::env::remove_var("AMBIENTE_LOG_LEVEL");
        std::env::remove_var("AMBIENTE_TEMPERATURE_MAX");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain representation of one decoded sensor sample.
///
/// Immutable after construction; `lumen`, `temperature` and `humidity` are
/// guaranteed finite by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub lumen: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub captured_at: DateTime<Utc>,
}

/// Domain representation of a registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for registering a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

use ambiente_domain::Reading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requests a client may send over an established connection.
///
/// Event names are part of the external contract and match the
/// socket-style channel names the dashboard listens on.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum ClientEvent {
    /// Full-history snapshot request.
    #[serde(rename = "sensors:getAll")]
    GetAll,
    /// Readings captured at exactly the given instant.
    #[serde(rename = "sensors:getByDate")]
    GetByDate { date: DateTime<Utc> },
}

/// Frames the server pushes to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Broadcast on ingestion (single reading) and as the snapshot reply.
    #[serde(rename = "sensors:readAll")]
    ReadAll(Vec<Reading>),
    /// Reply to a date-filtered request.
    #[serde(rename = "sensors:readByDate")]
    ReadByDate(Vec<Reading>),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

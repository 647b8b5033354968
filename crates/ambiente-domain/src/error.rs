use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store rejected reading: {0}")]
    StoreRejected(String),

    #[error("Alert notification failed: {0}")]
    NotifyFailed(String),

    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Repository error: {0}")]
    Repository(#[from] anyhow::Error),
}

impl DomainError {
    /// Whether a failed save should leave the message on the queue for
    /// redelivery. Only connection-level store failures qualify.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

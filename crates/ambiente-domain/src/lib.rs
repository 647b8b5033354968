pub mod auth;
pub mod decoder;
pub mod error;
pub mod ingest_service;
pub mod reading_service;
pub mod repository;
pub mod threshold;
pub mod types;

pub use auth::{
    Argon2PasswordService, AuthTokenProvider, JwtAuthTokenProvider, JwtClaims, JwtConfig,
    PasswordService, UserService,
};
pub use decoder::{decode_reading, decode_reading_at};
pub use error::{DomainError, DomainResult};
pub use ingest_service::{IngestOutcome, IngestService};
pub use reading_service::ReadingService;
pub use repository::{
    AlertNotifier, ReadingBroadcaster, ReadingPublisher, ReadingStore, UserRepository,
};
pub use threshold::{AlertDecision, TemperatureRange, ThresholdEvaluator};
pub use types::{Reading, RegisterUserInput, User};

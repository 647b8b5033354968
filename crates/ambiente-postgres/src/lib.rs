mod client;
mod models;
mod reading_repository;
mod user_repository;

pub use client::PostgresClient;
pub use models::{ReadingRow, UserRow};
pub use reading_repository::PostgresReadingStore;
pub use user_repository::PostgresUserRepository;

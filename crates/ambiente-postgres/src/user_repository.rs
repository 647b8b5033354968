use async_trait::async_trait;
use tracing::debug;

use ambiente_domain::{DomainError, DomainResult, User, UserRepository};

use crate::client::PostgresClient;
use crate::models::UserRow;

/// PostgreSQL implementation of the UserRepository trait.
#[derive(Clone)]
pub struct PostgresUserRepository {
    client: PostgresClient,
}

impl PostgresUserRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: &User) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::Repository)?;

        let result = conn
            .execute(
                "INSERT INTO users (user_id, name, email, password_hash, created_at)
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &user.user_id,
                    &user.name,
                    &user.email,
                    &user.password_hash,
                    &user.created_at,
                ],
            )
            .await;

        if let Err(e) = result {
            if let Some(db_err) = e.as_db_error() {
                // PostgreSQL error code 23505 is unique_violation
                if db_err.code().code() == "23505" {
                    return Err(DomainError::UserAlreadyExists(user.email.clone()));
                }
            }
            return Err(DomainError::Repository(e.into()));
        }

        debug!(email = %user.email, "Inserted user");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::Repository)?;

        let row = conn
            .query_opt(
                "SELECT user_id, name, email, password_hash, created_at
                 FROM users
                 WHERE email = $1",
                &[&email],
            )
            .await
            .map_err(|e| DomainError::Repository(e.into()))?;

        Ok(row.map(|row| {
            UserRow {
                user_id: row.get(0),
                name: row.get(1),
                email: row.get(2),
                password_hash: row.get(3),
                created_at: row.get(4),
            }
            .into()
        }))
    }
}

use crate::auth::{AuthTokenProvider, PasswordService};
use crate::error::{DomainError, DomainResult};
use crate::repository::UserRepository;
use crate::types::{RegisterUserInput, User};
use std::sync::Arc;
use tracing::{info, warn};

/// Credential-based authentication use case: registration hashes and saves,
/// login verifies and issues a bearer token.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    password_service: Arc<dyn PasswordService>,
    token_provider: Arc<dyn AuthTokenProvider>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        password_service: Arc<dyn PasswordService>,
        token_provider: Arc<dyn AuthTokenProvider>,
    ) -> Self {
        Self {
            repository,
            password_service,
            token_provider,
        }
    }

    pub async fn register(&self, input: RegisterUserInput) -> DomainResult<User> {
        if let Some(_existing) = self.repository.find_by_email(&input.email).await? {
            return Err(DomainError::UserAlreadyExists(input.email));
        }

        let password_hash = self.password_service.hash_password(&input.password)?;
        let user = User {
            user_id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            password_hash,
            created_at: Some(chrono::Utc::now()),
        };

        self.repository.save(&user).await?;
        info!(email = %user.email, "Registered user");
        Ok(user)
    }

    /// Returns a signed bearer token. An unknown email and a wrong password
    /// surface as the same error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<String> {
        let user = match self.repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!(email = %email, "Login attempt for unknown user");
                return Err(DomainError::InvalidCredentials);
            }
        };

        if !self
            .password_service
            .verify_password(password, &user.password_hash)?
        {
            warn!(email = %email, "Login attempt with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        self.token_provider.generate_token(&user.user_id, &user.email)
    }
}

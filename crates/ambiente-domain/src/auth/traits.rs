use crate::error::DomainResult;

/// Password hashing and verification.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordService: Send + Sync {
    fn hash_password(&self, password: &str) -> DomainResult<String>;

    fn verify_password(&self, password: &str, hash: &str) -> DomainResult<bool>;
}

/// Bearer token issuance and validation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AuthTokenProvider: Send + Sync {
    /// Generate a signed token for the given user.
    fn generate_token(&self, user_id: &str, email: &str) -> DomainResult<String>;

    /// Validate a token and return the user id it was issued for.
    fn validate_token(&self, token: &str) -> DomainResult<String>;
}

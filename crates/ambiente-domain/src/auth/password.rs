use crate::auth::PasswordService;
use crate::error::{DomainError, DomainResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Argon2-based implementation of PasswordService
#[derive(Default)]
pub struct Argon2PasswordService;

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash_password(&self, password: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let parsed_hash = argon2::PasswordHash::new(hash)
            .map_err(|e| DomainError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_produces_argon2_string() {
        let service = Argon2PasswordService::new();
        let hash = service.hash_password("secure-password-123").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let service = Argon2PasswordService::new();
        let hash1 = service.hash_password("same-password").unwrap();
        let hash2 = service.hash_password("same-password").unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn verify_accepts_correct_password() {
        let service = Argon2PasswordService::new();
        let hash = service.hash_password("secure-password-123").unwrap();
        assert!(service.verify_password("secure-password-123", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let service = Argon2PasswordService::new();
        let hash = service.hash_password("correct-password").unwrap();
        assert!(!service.verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let service = Argon2PasswordService::new();
        let result = service.verify_password("password", "not-a-hash");
        assert!(matches!(result, Err(DomainError::PasswordHash(_))));
    }
}

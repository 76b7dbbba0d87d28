use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hash error: {0}")]
    HashError(String),
}

/// Credential hashing and comparison. Login issues no tokens; callers only
/// learn whether the secret matches the stored digest.
#[derive(Default)]
pub struct AuthService {
    argon2: Argon2<'static>,
}

impl AuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(hash.to_string())
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verifies `password` against `hash`, folding a mismatch into
    /// `InvalidCredentials`.
    pub fn check_credentials(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        if self.verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

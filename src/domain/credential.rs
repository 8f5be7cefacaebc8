//! Argon2 credential hashes for account passwords.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Stored password hash. The plain text never leaves `hash`/`matches`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl Credential {
    /// Hash a new password, rejecting ones shorter than the minimum length.
    pub fn hash(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a hash loaded from storage.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Whether `plain_text` matches. A corrupt stored hash never matches.
    pub fn matches(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored credential is not a valid hash: {}", e);
                false
            }
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_match() {
        let credential = Credential::hash("correct horse").unwrap();
        assert!(credential.matches("correct horse"));
        assert!(!credential.matches("wrong horse"));
    }

    #[test]
    fn test_stored_hash_round_trips_through_storage() {
        let stored = Credential::hash("s3cret-pass").unwrap().into_inner();
        assert!(Credential::from_stored(stored).matches("s3cret-pass"));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            Credential::hash("short"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_corrupt_hash_never_matches() {
        assert!(!Credential::from_stored("not-a-hash").matches("anything"));
    }
}

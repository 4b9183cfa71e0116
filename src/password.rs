//! Password hashing using Argon2
//!
//! Hashing is CPU-bound, so the async helpers run it on the blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, Result};

/// Hash a password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored PHC hash string
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("Failed to verify password: {}", e))),
    }
}

async fn blocking<T, F>(job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Internal(format!("Password task failed: {}", e)))?
}

pub async fn hash(password: String) -> Result<String> {
    blocking(move || hash_password(&password)).await
}

pub async fn verify(password: String, hash: String) -> Result<bool> {
    blocking(move || verify_password(&password, &hash)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("umrah-2026").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("umrah-2026", &hash).unwrap());
        assert!(!verify_password("umrah-2025", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("123").unwrap(), hash_password("123").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("123", "123").is_err());
    }

    #[tokio::test]
    async fn test_async_helpers() {
        let hash = hash("secret".to_string()).await.unwrap();
        assert!(verify("secret".to_string(), hash).await.unwrap());
    }
}

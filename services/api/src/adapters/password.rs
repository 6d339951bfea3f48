//! services/api/src/adapters/password.rs
//!
//! Argon2 implementation of the `CredentialHasher` port. Hashes are stored as
//! PHC strings, so the salt and parameters travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chartgenius_core::ports::{CredentialHasher, PortError, PortResult};
use tracing::error;

#[derive(Clone, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                PortError::Unexpected("Failed to hash password".to_string())
            })
    }

    fn verify(&self, password: &str, hashed: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hashed) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Failed to parse password hash: {:?}", e);
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let hasher = Argon2Hasher;
        let a = hasher.hash("correct horse").unwrap();
        let b = hasher.hash("correct horse").unwrap();

        assert_ne!(a, b);
        assert!(!a.contains("correct horse"));
        assert!(hasher.verify("correct horse", &a));
        assert!(hasher.verify("correct horse", &b));
        assert!(!hasher.verify("wrong horse", &a));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!Argon2Hasher.verify("anything", "plaintext-password"));
    }
}

//! Argon2 credential hashing.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub struct PasswordError(argon2::password_hash::Error);

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password hashing failed: {}", self.0)
    }
}

impl Error for PasswordError {}

fn salt() -> Result<SaltString, PasswordError> {
    use rand::Rng;
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(PasswordError)
}

/// Hashes `password` into a PHC string (algorithm, params, salt, digest).
pub fn hash(password: &str) -> Result<String, PasswordError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|hash| hash.to_string())
        .map_err(PasswordError)
}

/// Checks `password` against a stored PHC string. Unparseable hashes never verify.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

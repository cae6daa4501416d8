//! Salted password hashing.
//!
//! Stored form is `<hash>.<salt>`, both base64, where
//! `hash = sha256(salt || password)` and the salt is 16 random bytes.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);

    let digest = digest(&salt, password);
    format!("{}.{}", STANDARD.encode(digest), STANDARD.encode(salt))
}

/// Checks `password` against a stored `<hash>.<salt>` value.
///
/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((hash, salt)) = stored.split_once('.') else {
        return false;
    };
    let (Ok(expected), Ok(salt)) = (STANDARD.decode(hash), STANDARD.decode(salt)) else {
        return false;
    };

    let actual = digest(&salt, password);
    constant_time_eq(&expected, &actual)
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

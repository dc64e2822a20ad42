//! Password generation and hashing.
//!
//! Hashes are stored as `sha256:<salt hex>:<digest hex>` where the digest
//! covers the salt followed by the password.

use rand::distributions::Alphanumeric;
use rand::{random, Rng};
use sha2::{Digest, Sha256};

/// Length of generated passwords.
pub const PASSWORD_LENGTH: usize = 32;

const SCHEME: &str = "sha256";

/// A random alphanumeric password.
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash `plaintext` with a fresh random salt.
pub fn hash_password(plaintext: &str) -> String {
    let salt: [u8; 16] = random();
    hash_with_salt(plaintext, &salt)
}

fn hash_with_salt(plaintext: &str, salt: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plaintext.as_bytes());
    format!(
        "{SCHEME}:{}:{}",
        hex::encode(salt),
        hex::encode(&hasher.finalize()[..])
    )
}

/// Check `plaintext` against a stored hash.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, ':');
    let (Some(SCHEME), Some(salt_hex), Some(_)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    match hex::decode(salt_hex) {
        Ok(salt) => hash_with_salt(plaintext, &salt) == stored,
        Err(_) => false,
    }
}

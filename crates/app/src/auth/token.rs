//! API token generation and hashing.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Prefix carried by every raw API token.
pub const API_TOKEN_PREFIX: &str = "sf_";

/// Random bytes behind each token, hex-encoded after the prefix.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

/// Generate a fresh raw API token.
///
/// The raw value is only ever shown once; storage keeps [`hash_token`] of it.
#[must_use]
pub fn generate_token() -> String {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];
    OsRng.fill_bytes(&mut secret);

    let encoded: String = secret.iter().map(|byte| format!("{byte:02x}")).collect();

    format!("{API_TOKEN_PREFIX}{encoded}")
}

/// Hex-encoded SHA-256 digest of a raw token.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

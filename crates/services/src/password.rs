//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Stored format: `pbkdf2_sha256$<iterations>$<salt b64>$<hash b64>`.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const SCHEME: &str = "pbkdf2_sha256";
pub const DEFAULT_ITERATIONS: u32 = 260_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Hash with an explicit work factor.
#[must_use]
pub fn hash_with_iterations(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let mut derived = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    format!(
        "{SCHEME}${iterations}${}${}",
        BASE64.encode(salt),
        BASE64.encode(derived)
    )
}

/// Check `password` against a stored hash. Malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt), BASE64.decode(expected)) else {
        return false;
    };
    if iterations == 0 || expected.is_empty() {
        return false;
    }

    let mut derived = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    constant_time_eq(&derived, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password_only() {
        let stored = hash_with_iterations("admin123", 1_000);
        assert!(stored.starts_with("pbkdf2_sha256$1000$"));
        assert!(verify_password("admin123", &stored));
        assert!(!verify_password("admin124", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_with_iterations("secret", 1_000);
        let b = hash_with_iterations("secret", 1_000);
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hashes_are_rejected() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "plain"));
        assert!(!verify_password("x", "pbkdf2_sha256$abc$c2FsdA==$aGFzaA=="));
        assert!(!verify_password("x", "bcrypt$10$c2FsdA==$aGFzaA=="));
    }
}

//! One-time-password generation and hashing.
//!
//! OTP codes are short-lived six digit codes used for email verification and
//! password resets. Only the SHA-256 hash of a code is persisted; the plain
//! code goes out by email and is never stored.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of digits in a generated OTP code.
pub const OTP_LENGTH: usize = 6;

/// Generates a random numeric OTP code of [`OTP_LENGTH`] digits.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Computes the SHA-256 hash of an OTP code as a hex string.
///
/// Codes are compared by hash so a database leak does not expose live codes.
pub fn hash_otp(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_otp_length_and_digits() {
        let code = generate_otp();
        assert_eq!(code.len(), OTP_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_hash_otp_deterministic() {
        assert_eq!(hash_otp("123456"), hash_otp("123456"));
        assert_ne!(hash_otp("123456"), hash_otp("654321"));
    }

    #[test]
    fn test_hash_otp_is_hex_sha256() {
        let hash = hash_otp("000000");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

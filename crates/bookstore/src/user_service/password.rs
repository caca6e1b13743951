//! Salted BLAKE3 password digests, stored as `blake3$<salt>$<hex digest>`.
//!
//! This is a single fast hash with a per-user salt, not a password KDF: it has no
//! work factor and does not slow down offline guessing against a leaked table.
//! Stored values carry their scheme name so a slow KDF can be added alongside it.

use uuid::Uuid;

const SCHEME: &str = "blake3";

pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = digest(&salt, password);
    format!("{SCHEME}${salt}${}", digest.to_hex())
}

/// Constant-time check of `password` against a stored digest.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(SCHEME), Some(salt), Some(hex)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    match blake3::Hash::from_hex(hex) {
        Ok(expected) => digest(salt, password) == expected,
        Err(_) => false,
    }
}

fn digest(salt: &str, password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("correct horse");
        assert!(stored.starts_with("blake3$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("battery staple", &stored));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        assert_ne!(hash_password("correct horse"), hash_password("correct horse"));
    }

    #[test]
    fn test_malformed_digest_never_verifies() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "md5$salt$abcd"));
        assert!(!verify_password("x", "blake3$salt$not-hex"));
    }
}

use sha2::{Digest, Sha256};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Hex digest of the salted password.
pub(crate) fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a candidate password against a stored digest without leaking
/// positional information through early exit.
pub(crate) fn verify(salt: &str, password: &str, expected: &str) -> bool {
    let candidate = digest(salt, password);
    if candidate.len() != expected.len() {
        return false;
    }
    candidate
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

pub(crate) const fn acceptable_length(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest("s", "hunter22"), digest("s", "hunter22"));
        assert_ne!(digest("s", "hunter22"), digest("other", "hunter22"));
        assert_ne!(digest("s", "hunter22"), digest("s", "hunter23"));
    }

    #[test]
    fn test_verify() {
        let stored = digest("s", "hunter22");
        assert!(verify("s", "hunter22", &stored));
        assert!(!verify("s", "wrong", &stored));
        assert!(!verify("other", "hunter22", &stored));
    }

    #[test]
    fn test_length_policy() {
        assert!(!acceptable_length("short"));
        assert!(acceptable_length("long enough"));
    }
}

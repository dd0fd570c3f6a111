use crate::error::AppError;
use bcrypt::{hash, verify};
use log::warn;

/// bcrypt only reads the first 72 bytes of its input; longer passwords are refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Rejects passwords longer than [`MAX_PASSWORD_BYTES`] before they reach bcrypt.
pub fn ensure_password_length(password: &str) -> Result<(), AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "password: must not exceed {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Salted bcrypt hashing at a fixed work factor.
///
/// Holds a decoy hash produced at construction so a login for an unknown
/// email can spend the same bcrypt work as one with a wrong password.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    decoy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let decoy_hash = hash("taskgate-decoy-password", cost)
            .map_err(|e| AppError::Config(format!("Invalid bcrypt cost {}: {}", cost, e)))?;
        Ok(Self { cost, decoy_hash })
    }

    /// Hashes with a fresh random salt embedded in the output.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns `false` for a mismatch and for a malformed hash alike.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// Burns one verification against the decoy hash. Always `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        let _ = verify(password, &self.decoy_hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = hasher();
        let password = "test_password123";
        let hashed = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hashed));
        assert!(!hasher.verify("wrong_password", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first));
        assert!(hasher.verify("same-password", &second));
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        let hasher = hasher();
        assert!(!hasher.verify("test_password123", "invalidhashformat"));
        assert!(!hasher.verify("test_password123", ""));
    }

    #[test]
    fn test_decoy_never_matches() {
        let hasher = hasher();
        assert!(!hasher.verify_decoy("taskgate-decoy-password"));
        assert!(!hasher.verify_decoy("anything"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(matches!(PasswordHasher::new(2), Err(AppError::Config(_))));
    }

    #[test]
    fn test_password_length_ceiling_counts_bytes() {
        assert!(ensure_password_length(&"a".repeat(72)).is_ok());
        assert!(matches!(
            ensure_password_length(&"a".repeat(73)),
            Err(AppError::ValidationError(_))
        ));
        // 37 two-byte characters: 37 chars, 74 bytes.
        assert!(ensure_password_length(&"é".repeat(37)).is_err());
    }
}

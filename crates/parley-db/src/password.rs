/// Credential hashing. Cleartext passwords never reach a row: `add_user`
/// runs them through argon2id with a per-user random salt first.
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::StoreError;

pub fn hash(pass: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(pass.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `candidate` against a stored argon2id hash. A malformed stored
/// hash is an error; a wrong password is just `false`.
pub fn verify(candidate: &str, stored: &str) -> Result<bool, StoreError> {
    let parsed = PasswordHash::new(stored)?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash("hunter2").unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(verify("hunter2", &stored).unwrap());
        assert!(!verify("hunter3", &stored).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash("same").unwrap(), hash("same").unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(matches!(
            verify("x", "not-a-phc-string"),
            Err(StoreError::Credential(_))
        ));
    }
}

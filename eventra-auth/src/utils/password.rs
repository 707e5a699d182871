use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// A plaintext password in flight between a request DTO and the
/// hasher. Debug output is redacted so the secret cannot leak through
/// a log line or an error chain.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hash with Argon2id and a freshly generated per-password salt.
    pub fn hash(&self) -> Result<PasswordHashString, anyhow::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(self.0.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(PasswordHashString(hash.to_string()))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// A stored Argon2 hash string in PHC format.
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Check a candidate password against this hash. The comparison is
    /// constant-time inside the hashing library.
    pub fn verify(&self, candidate: &Password) -> Result<(), anyhow::Error> {
        let parsed = PasswordHash::new(&self.0)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

        Argon2::default()
            .verify_password(candidate.0.as_bytes(), &parsed)
            .map_err(|_| anyhow::anyhow!("Password verification failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_produces_argon2_phc_format() {
        let hash = Password::new("Strong1!".to_string()).hash().unwrap();
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn correct_password_verifies() {
        let password = Password::new("Strong1!".to_string());
        let hash = password.hash().unwrap();
        assert!(hash.verify(&password).is_ok());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = Password::new("Strong1!".to_string()).hash().unwrap();
        let wrong = Password::new("Wrong1!x".to_string());
        assert!(hash.verify(&wrong).is_err());
    }

    #[test]
    fn salt_differs_between_hashes() {
        let password = Password::new("Strong1!".to_string());
        let hash1 = password.hash().unwrap();
        let hash2 = password.hash().unwrap();
        assert_ne!(hash1.as_str(), hash2.as_str());
        assert!(hash1.verify(&password).is_ok());
        assert!(hash2.verify(&password).is_ok());
    }

    #[test]
    fn debug_output_is_redacted() {
        let password = Password::new("Strong1!".to_string());
        let debugged = format!("{:?}", password);
        assert!(!debugged.contains("Strong1!"));
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_panic() {
        let stored = PasswordHashString::new("not-a-phc-hash".to_string());
        assert!(stored
            .verify(&Password::new("Strong1!".to_string()))
            .is_err());
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// One-way password hashing with bcrypt.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh random salt, so two
/// hashes of the same password never match textually. Verification goes
/// through bcrypt's constant-time comparison.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31)
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    pub fn hash(&self, plaintext: &str) -> Result<String, bcrypt::BcryptError> {
        bcrypt::hash(plaintext, self.cost)
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A malformed stored hash verifies as `false`; callers cannot tell it
    /// apart from a wrong password.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking pool
    pub async fn hash_blocking(&self, plaintext: String) -> crate::Result<String> {
        let hasher = *self;
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await??;
        Ok(hashed)
    }

    /// [`verify`](Self::verify) on the blocking pool
    pub async fn verify_blocking(&self, plaintext: String, hash: String) -> crate::Result<bool> {
        let hasher = *self;
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash)).await?;
        Ok(valid)
    }

    /// Spend one verification's worth of bcrypt work and report no match
    ///
    /// Used when there is no stored hash to check against, so a login for an
    /// unknown account takes as long as one with a wrong password.
    pub async fn verify_missing_blocking(&self, plaintext: String) -> crate::Result<bool> {
        self.hash_blocking(plaintext).await?;
        Ok(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hasher().hash("correct horse").unwrap();

        assert_ne!(hash, "correct horse");
        assert!(!hash.contains("correct horse"));
    }

    #[test]
    fn test_verify_accepts_matching_password() {
        let h = hasher();
        let hash = h.hash("correct horse").unwrap();

        assert!(h.verify("correct horse", &hash));
    }

    #[test]
    fn test_verify_rejects_altered_password() {
        let h = hasher();
        let hash = h.hash("correct horse").unwrap();

        assert!(!h.verify("correct horsex", &hash));
        assert!(!h.verify("Correct horse", &hash));
        assert!(!h.verify("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let h = hasher();
        let first = h.hash("same password").unwrap();
        let second = h.hash("same password").unwrap();

        assert_ne!(first, second);
        assert!(h.verify("same password", &first));
        assert!(h.verify("same password", &second));
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        let h = hasher();

        assert!(!h.verify("password", "not-a-bcrypt-hash"));
        assert!(!h.verify("password", ""));
        assert!(!h.verify("password", "$2b$04$tooshort"));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(PasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }

    #[tokio::test]
    async fn test_blocking_helpers_round_trip() {
        let h = hasher();
        let hash = h.hash_blocking("secret".to_string()).await.unwrap();

        assert!(h.verify_blocking("secret".to_string(), hash.clone()).await.unwrap());
        assert!(!h.verify_blocking("secretx".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_missing_never_matches() {
        let h = hasher();

        assert!(!h.verify_missing_blocking("secret".to_string()).await.unwrap());
        assert!(!h.verify_missing_blocking(String::new()).await.unwrap());
    }
}

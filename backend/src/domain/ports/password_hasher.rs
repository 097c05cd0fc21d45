//! Port for password hashing.
//!
//! Hashing is CPU-bound and synchronous; adapters must produce self-describing
//! encoded hashes so parameters can change without a migration.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing the supplied password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// `Ok(false)` on mismatch; errors are reserved for unusable hashes.
    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

/// Reversible "hasher" for tests that should not pay for argon2.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "plain$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("{FIXTURE_PREFIX}{}", password.expose())))
    }

    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let stored = hash
            .as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| PasswordHashError::malformed("missing fixture prefix"))?;
        Ok(stored == password.expose())
    }
}

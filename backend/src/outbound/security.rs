//! Argon2id implementation of the [`PasswordHasher`] port.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash as EncodedHash, PasswordHasher as _, PasswordVerifier, SaltString,
};

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

/// Hashes passwords into PHC strings with a fresh random salt each time.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordHash::new(encoded.to_string()))
    }

    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let parsed = EncodedHash::new(hash.as_str())
            .map_err(|err| PasswordHashError::malformed(err.to_string()))?;
        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("valid password")
    }

    #[rstest]
    fn hashes_verify_against_the_original_password() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash(&password("secret-one")).expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert_eq!(hasher.verify(&password("secret-one"), &hash), Ok(true));
        assert_eq!(hasher.verify(&password("secret-two"), &hash), Ok(false));
    }

    #[rstest]
    fn equal_passwords_get_distinct_salts() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash(&password("secret-one")).expect("hash");
        let second = hasher.hash(&password("secret-one")).expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn garbage_hashes_are_malformed() {
        let result = Argon2PasswordHasher::new()
            .verify(&password("secret-one"), &PasswordHash::new("not-a-phc-string"));
        assert!(matches!(result, Err(PasswordHashError::Malformed { .. })));
    }
}

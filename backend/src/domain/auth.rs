//! Authentication primitives: principals, credentials and password material.
//!
//! Inbound payloads are validated here before any port is called, so services
//! only ever see well-formed values.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::{EmailAddress, Role, User, UserId, UserName, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;

/// Errors raised while validating authentication payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    #[error("Please provide email and password")]
    MissingCredentials,
    #[error("Please provide both values")]
    MissingPasswords,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Authenticated caller derived from a verified session.
///
/// # Examples
/// ```
/// use storefront::domain::{Principal, Role, UserId};
///
/// let principal = Principal::new(UserId::random(), "Ada Lovelace", Role::User);
/// assert!(!principal.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: UserId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.name.as_ref(), user.role)
    }
}

/// Caller-supplied password held in memory that is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a password of at least [`PASSWORD_MIN`] characters.
    pub fn new(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Wrap a password for comparison only; no length policy applies.
    pub(crate) fn for_verification(raw: &str) -> Self {
        Self(Zeroizing::new(raw.to_owned()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Encoded password hash as produced by a [`crate::domain::ports::PasswordHasher`].
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Password,
}

impl LoginCredentials {
    /// Both fields are required; the email is normalised for lookup but not
    /// otherwise validated so unknown shapes fail as invalid credentials.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthValidationError::MissingCredentials);
        }
        Ok(Self {
            email,
            password: Password::for_verification(password),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
}

impl Registration {
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// Validated password change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: Password,
    pub new_password: Password,
}

impl PasswordChange {
    pub fn try_from_parts(old: &str, new: &str) -> Result<Self, AuthValidationError> {
        if old.is_empty() || new.is_empty() {
            return Err(AuthValidationError::MissingPasswords);
        }
        Ok(Self {
            old_password: Password::for_verification(old),
            new_password: Password::new(new)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret")]
    #[case("   ", "secret")]
    #[case("ada@example.com", "")]
    fn login_requires_both_fields(#[case] email: &str, #[case] password: &str) {
        assert_eq!(
            LoginCredentials::try_from_parts(email, password),
            Err(AuthValidationError::MissingCredentials)
        );
    }

    #[rstest]
    fn login_normalises_email() {
        let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "pw").expect("valid");
        assert_eq!(creds.email(), "ada@example.com");
        assert_eq!(creds.password().expose(), "pw");
    }

    #[rstest]
    fn registration_enforces_password_length() {
        let err = Registration::try_from_parts("Ada Lovelace", "ada@example.com", "12345")
            .expect_err("short password");
        assert_eq!(err, AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }

    #[rstest]
    fn registration_surfaces_field_errors() {
        let err = Registration::try_from_parts("Ada", "nope", "secret1").expect_err("bad email");
        assert_eq!(err, AuthValidationError::User(UserValidationError::InvalidEmail));
    }

    #[rstest]
    #[case("", "newpass")]
    #[case("oldpass", "")]
    fn password_change_requires_both_values(#[case] old: &str, #[case] new: &str) {
        assert_eq!(
            PasswordChange::try_from_parts(old, new),
            Err(AuthValidationError::MissingPasswords)
        );
    }

    #[rstest]
    fn secrets_are_not_printed() {
        let password = Password::new("hunter22").expect("valid");
        assert_eq!(format!("{password:?}"), "Password(***)");
        assert_eq!(format!("{:?}", PasswordHash::new("$argon2id$...")), "PasswordHash(***)");
    }
}

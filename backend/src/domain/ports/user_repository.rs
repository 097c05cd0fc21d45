//! Port abstraction for user account persistence and its errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, PasswordHash, Role, User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Account together with its stored credential, for authentication only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Number of registered accounts.
    async fn count(&self) -> Result<u64, UserPersistenceError>;

    /// Insert a new account.
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account and its password hash by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch the stored password hash for an account.
    async fn find_password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError>;

    /// All accounts holding `role`, oldest first.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError>;

    /// Change name and email, stamping `updated_at`; `None` when the account
    /// does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        name: &UserName,
        email: &EmailAddress,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Replace the password hash, stamping `updated_at`; `false` when the
    /// account does not exist.
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError>;
}

/// Repository with no accounts that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(0)
    }

    async fn create(
        &self,
        _user: &User,
        _password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_credentials_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_password_hash(
        &self,
        _id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        Ok(None)
    }

    async fn list_by_role(&self, _role: Role) -> Result<Vec<User>, UserPersistenceError> {
        Ok(Vec::new())
    }

    async fn update_profile(
        &self,
        _id: &UserId,
        _name: &UserName,
        _email: &EmailAddress,
        _updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn update_password_hash(
        &self,
        _id: &UserId,
        _password_hash: &PasswordHash,
        _updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        Ok(false)
    }
}

//! Driving port for registration, login and account management.
//!
//! Inbound adapters call this port with already validated payloads and the
//! session principal; they never see password hashes.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, Error, LoginCredentials, PasswordChange, Principal, Registration, User, UserId,
    UserName,
};

/// New name and email for the calling account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: UserName,
    pub email: EmailAddress,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account; the very first one becomes an admin.
    async fn register(&self, registration: Registration) -> Result<Principal, Error>;

    /// Verify credentials and return the principal to store in the session.
    async fn login(&self, credentials: LoginCredentials) -> Result<Principal, Error>;

    /// Customer accounts (role `user`); admin only.
    async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, Error>;

    /// One account, visible to its owner and to admins.
    async fn get_user(&self, principal: &Principal, id: &UserId) -> Result<User, Error>;

    /// Change the caller's name and email, returning the refreshed principal.
    async fn update_profile(
        &self,
        principal: &Principal,
        update: ProfileUpdate,
    ) -> Result<Principal, Error>;

    /// Change the caller's password after verifying the current one.
    async fn change_password(
        &self,
        principal: &Principal,
        change: PasswordChange,
    ) -> Result<(), Error>;
}

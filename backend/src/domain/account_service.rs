//! Registration, authentication and account management.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{AccountService, PasswordHasher, ProfileUpdate, UserRepository};
use crate::domain::service_support::{map_password_hash_error, map_user_persistence_error};
use crate::domain::{
    Error, LoginCredentials, PasswordChange, Principal, Registration, Role, User, UserId,
    authorize_roles, check_permission,
};

const INVALID_LOGIN: &str = "Invalid credentials";
const INVALID_CREDENTIALS: &str = "Invalid Credentials";

/// Account service implementing the [`AccountService`] driving port.
pub struct AccountServiceImpl<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountServiceImpl<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

#[async_trait]
impl<U, H> AccountService for AccountServiceImpl<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<Principal, Error> {
        let Registration {
            name,
            email,
            password,
        } = registration;

        let taken = self
            .users
            .find_credentials_by_email(email.as_ref())
            .await
            .map_err(map_user_persistence_error)?;
        if taken.is_some() {
            return Err(Error::bad_request("Email already exists"));
        }

        let existing = self
            .users
            .count()
            .await
            .map_err(map_user_persistence_error)?;
        let role = if existing == 0 { Role::Admin } else { Role::User };

        let password_hash = self
            .hasher
            .hash(&password)
            .map_err(map_password_hash_error)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            name,
            email,
            role,
            created_at: now,
            updated_at: now,
        };
        self.users
            .create(&user, &password_hash)
            .await
            .map_err(map_user_persistence_error)?;
        tracing::info!(user_id = %user.id, %role, "account registered");
        Ok(Principal::from(&user))
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<Principal, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::unauthenticated(INVALID_LOGIN))?;
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_password_hash_error)?;
        if !matches {
            tracing::debug!(user_id = %stored.user.id, "password mismatch");
            return Err(Error::unauthenticated(INVALID_LOGIN));
        }
        Ok(Principal::from(&stored.user))
    }

    async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, Error> {
        authorize_roles(principal, &[Role::Admin])?;
        self.users
            .list_by_role(Role::User)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn get_user(&self, principal: &Principal, id: &UserId) -> Result<User, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("No user with id {id}")))?;
        check_permission(principal, &user)?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        update: ProfileUpdate,
    ) -> Result<Principal, Error> {
        let user = self
            .users
            .update_profile(
                &principal.user_id,
                &update.name,
                &update.email,
                self.clock.utc(),
            )
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("No user with id {}", principal.user_id)))?;
        Ok(Principal::from(&user))
    }

    async fn change_password(
        &self,
        principal: &Principal,
        change: PasswordChange,
    ) -> Result<(), Error> {
        let current = self
            .users
            .find_password_hash(&principal.user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("No user with id {}", principal.user_id)))?;
        let matches = self
            .hasher
            .verify(&change.old_password, &current)
            .map_err(map_password_hash_error)?;
        if !matches {
            return Err(Error::unauthenticated(INVALID_CREDENTIALS));
        }

        let replacement = self
            .hasher
            .hash(&change.new_password)
            .map_err(map_password_hash_error)?;
        let updated = self
            .users
            .update_password_hash(&principal.user_id, &replacement, self.clock.utc())
            .await
            .map_err(map_user_persistence_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "No user with id {}",
                principal.user_id
            )));
        }
        tracing::info!(user_id = %principal.user_id, "password changed");
        Ok(())
    }
}

//! Access control decisions.
//!
//! Both checks are pure functions over the [`Principal`] and never touch a
//! port. They return [`ErrorCode::Unauthorized`](super::ErrorCode) because the
//! caller is known but lacks rights; missing identity is reported by the
//! session layer as `Unauthenticated` before these run.

use uuid::Uuid;

use super::{Error, Principal, Role, User, UserId};

const UNAUTHORIZED_MESSAGE: &str = "Not authorized to access this route";

/// Something that is owned by a user and can report that owner's id.
///
/// Raw identifiers and the entities wrapping them both implement this, so
/// callers can pass whichever they hold.
pub trait OwnerRef {
    /// Canonical string form of the owning user's identifier.
    fn owner_key(&self) -> String;
}

impl OwnerRef for UserId {
    fn owner_key(&self) -> String {
        self.to_string()
    }
}

impl OwnerRef for Uuid {
    fn owner_key(&self) -> String {
        self.hyphenated().to_string()
    }
}

impl OwnerRef for str {
    fn owner_key(&self) -> String {
        self.trim().to_lowercase()
    }
}

impl OwnerRef for String {
    fn owner_key(&self) -> String {
        self.as_str().owner_key()
    }
}

impl OwnerRef for User {
    fn owner_key(&self) -> String {
        self.id.owner_key()
    }
}

impl<T: OwnerRef + ?Sized> OwnerRef for &T {
    fn owner_key(&self) -> String {
        (**self).owner_key()
    }
}

/// Allow admins unconditionally and everyone else only over their own data.
///
/// # Examples
/// ```
/// use storefront::domain::{check_permission, Principal, Role, UserId};
///
/// let owner = UserId::random();
/// let caller = Principal::new(owner, "Ada Lovelace", Role::User);
/// assert!(check_permission(&caller, &owner).is_ok());
/// assert!(check_permission(&caller, &UserId::random()).is_err());
/// ```
pub fn check_permission<O>(principal: &Principal, owner: &O) -> Result<(), Error>
where
    O: OwnerRef + ?Sized,
{
    if principal.role == Role::Admin {
        return Ok(());
    }
    if principal.user_id.owner_key() == owner.owner_key() {
        return Ok(());
    }
    tracing::debug!(
        user_id = %principal.user_id,
        "permission denied on foreign resource"
    );
    Err(Error::unauthorized(UNAUTHORIZED_MESSAGE))
}

/// Require the principal to hold one of `roles`.
pub fn authorize_roles(principal: &Principal, roles: &[Role]) -> Result<(), Error> {
    if roles.contains(&principal.role) {
        Ok(())
    } else {
        Err(Error::unauthorized(UNAUTHORIZED_MESSAGE))
    }
}

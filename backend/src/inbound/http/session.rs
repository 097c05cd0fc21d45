//! Session helpers keeping handlers free of framework-specific logic.
//!
//! The signed-in [`Principal`] lives in a private (encrypted) cookie as
//! three keys: user id, name and role.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Principal, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const NAME_KEY: &str = "name";
pub(crate) const ROLE_KEY: &str = "role";

const AUTHENTICATION_INVALID: &str = "Authentication Invalid";

/// Newtype wrapper exposing principal-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `principal` in the session cookie, replacing any previous one.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        self.0.renew();
        let persist = |key: &str, value: &str| {
            self.0
                .insert(key, value)
                .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
        };
        persist(USER_ID_KEY, &principal.user_id.to_string())?;
        persist(NAME_KEY, &principal.name)?;
        persist(ROLE_KEY, principal.role.as_str())
    }

    /// Principal stored in the session, if any.
    ///
    /// Tampered or partial sessions read as anonymous.
    pub fn principal(&self) -> Result<Option<Principal>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(name), Some(raw_role)) =
            (read(USER_ID_KEY)?, read(NAME_KEY)?, read(ROLE_KEY)?)
        else {
            return Ok(None);
        };
        let user_id = match UserId::new(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                return Ok(None);
            }
        };
        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(error) => {
                warn!(%error, "invalid role in session cookie");
                return Ok(None);
            }
        };
        Ok(Some(Principal::new(user_id, name, role)))
    }

    /// Signed-in principal, or `401 Authentication Invalid`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthenticated(AUTHENTICATION_INVALID))
    }

    /// Forget the signed-in principal and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

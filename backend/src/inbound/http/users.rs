//! Account handlers. Every route requires a session.
//!
//! ```text
//! GET /api/v1/users
//! GET /api/v1/users/showMe
//! PATCH /api/v1/users/updateUser {"name":"Ada","email":"ada@example.com"}
//! PATCH /api/v1/users/updateUserPassword {"oldPassword":"secret1","newPassword":"secret2"}
//! GET /api/v1/users/{id}
//! ```

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ProfileUpdate;
use crate::domain::{EmailAddress, Error, PasswordChange, User, UserId, UserName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::PrincipalResponse;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{auth_error, entity_id, user_error};

/// Profile change for `PATCH /api/v1/users/updateUser`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

impl TryFrom<UpdateUserRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: UserName::new(&value.name).map_err(user_error)?,
            email: EmailAddress::new(&value.email).map_err(user_error)?,
        })
    }
}

/// Password change for `PATCH /api/v1/users/updateUserPassword`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

/// List every account with the `user` role. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = UsersResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UsersResponse>> {
    let principal = session.require_principal()?;
    let users = state.accounts.list_users(&principal).await?;
    Ok(web::Json(UsersResponse { users }))
}

/// The session principal.
#[utoipa::path(
    get,
    path = "/api/v1/users/showMe",
    responses(
        (status = 200, description = "Current principal", body = PrincipalResponse),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["users"],
    operation_id = "showCurrentUser"
)]
#[get("/users/showMe")]
pub async fn show_current_user(session: SessionContext) -> ApiResult<web::Json<PrincipalResponse>> {
    let user = session.require_principal()?;
    Ok(web::Json(PrincipalResponse { user }))
}

/// Change the caller's name and email and re-issue the session.
#[utoipa::path(
    patch,
    path = "/api/v1/users/updateUser",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated principal", body = PrincipalResponse),
        (status = 400, description = "Invalid request or email taken", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/updateUser")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<PrincipalResponse>> {
    let principal = session.require_principal()?;
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let user = state.accounts.update_profile(&principal, update).await?;
    session.persist_principal(&user)?;
    Ok(web::Json(PrincipalResponse { user }))
}

/// Change the caller's password.
#[utoipa::path(
    patch,
    path = "/api/v1/users/updateUserPassword",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthenticated or wrong password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserPassword"
)]
#[patch("/users/updateUserPassword")]
pub async fn update_user_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdatePasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let principal = session.require_principal()?;
    let change = PasswordChange::try_from_parts(&payload.old_password, &payload.new_password)
        .map_err(auth_error)?;
    state.accounts.change_password(&principal, change).await?;
    Ok(web::Json(MessageResponse::new("Success! Password updated")))
}

/// One account, visible to its owner and to admins.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let principal = session.require_principal()?;
    let id: UserId = entity_id(&path, "user")?;
    let user = state.accounts.get_user(&principal, &id).await?;
    Ok(web::Json(UserResponse { user }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{api_app, memory_state, session_cookie};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn register_request(name: &str, email: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": name, "email": email, "password": "secret1"}))
    }

    fn user_id(body: &Value) -> String {
        body["user"]["userId"]
            .as_str()
            .expect("user id present")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn admins_list_plain_users_only() {
        let app = test::init_service(api_app(memory_state())).await;
        let admin = test::call_service(&app, register_request("Ada", "ada@example.com").to_request())
            .await;
        let admin_cookie = session_cookie(&admin);
        let bob = test::call_service(&app, register_request("Bob", "bob@example.com").to_request())
            .await;
        let bob_cookie = session_cookie(&bob);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users")
                .cookie(admin_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let users = body["users"].as_array().expect("users array");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["email"], "bob@example.com");
        assert!(users[0].get("password").is_none());

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users")
                .cookie(bob_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn show_me_requires_a_session() {
        let app = test::init_service(api_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/users/showMe").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Authentication Invalid");
    }

    #[rstest]
    #[actix_web::test]
    async fn update_user_reissues_the_session() {
        let app = test::init_service(api_app(memory_state())).await;
        let res = test::call_service(&app, register_request("Ada", "ada@example.com").to_request())
            .await;
        let cookie = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri("/api/v1/users/updateUser")
                .cookie(cookie)
                .set_json(json!({"name": "Ada King", "email": "ada@king.org"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let refreshed = session_cookie(&res);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["user"]["name"], "Ada King");

        let me = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/showMe")
                .cookie(refreshed)
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(me).await;
        assert_eq!(body["user"]["name"], "Ada King");
    }

    #[rstest]
    #[case("wrong1", StatusCode::UNAUTHORIZED, "Invalid Credentials")]
    #[case("secret1", StatusCode::OK, "Success! Password updated")]
    #[actix_web::test]
    async fn password_change_checks_the_old_password(
        #[case] old_password: &str,
        #[case] status: StatusCode,
        #[case] message: &str,
    ) {
        let app = test::init_service(api_app(memory_state())).await;
        let res = test::call_service(&app, register_request("Ada", "ada@example.com").to_request())
            .await;
        let cookie = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri("/api/v1/users/updateUserPassword")
                .cookie(cookie)
                .set_json(json!({"oldPassword": old_password, "newPassword": "secret2"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), status);
        let body: Value = test::read_body_json(res).await;
        let text = body
            .get("msg")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str);
        assert_eq!(text, Some(message));
    }

    async fn get_user_as<S, B>(app: &S, id: &str, cookie: Cookie<'static>) -> StatusCode
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
    {
        test::call_service(
            app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/users/{id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await
        .status()
    }

    #[rstest]
    #[actix_web::test]
    async fn users_see_themselves_but_not_each_other() {
        let app = test::init_service(api_app(memory_state())).await;
        let admin = test::call_service(&app, register_request("Ada", "ada@example.com").to_request())
            .await;
        let admin_cookie = session_cookie(&admin);
        let bob = test::call_service(&app, register_request("Bob", "bob@example.com").to_request())
            .await;
        let bob_cookie = session_cookie(&bob);
        let bob_id = user_id(&test::read_body_json(bob).await);
        let carol =
            test::call_service(&app, register_request("Carol", "carol@example.com").to_request())
                .await;
        let carol_cookie = session_cookie(&carol);

        assert_eq!(get_user_as(&app, &bob_id, bob_cookie.clone()).await, StatusCode::OK);
        assert_eq!(get_user_as(&app, &bob_id, admin_cookie).await, StatusCode::OK);
        assert_eq!(
            get_user_as(&app, &bob_id, carol_cookie).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_user_as(&app, "not-a-uuid", bob_cookie).await,
            StatusCode::NOT_FOUND
        );
    }
}

//! Authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"secret1"}
//! GET /api/v1/auth/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, Principal, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::auth_error;

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The signed-in principal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrincipalResponse {
    pub user: Principal,
}

/// Create an account and sign it in.
///
/// The first account ever registered becomes an admin.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = PrincipalResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request or email taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&name, &email, &password).map_err(auth_error)?;
    let user = state.accounts.register(registration).await?;
    session.persist_principal(&user)?;
    Ok(HttpResponse::Created().json(PrincipalResponse { user }))
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = PrincipalResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing credentials", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<PrincipalResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(auth_error)?;
    let user = state.accounts.login(credentials).await?;
    session.persist_principal(&user)?;
    Ok(web::Json(PrincipalResponse { user }))
}

/// Drop the session cookie. Always succeeds.
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/auth/logout")]
pub async fn logout(session: SessionContext) -> web::Json<MessageResponse> {
    session.purge();
    web::Json(MessageResponse::new("User logged out!"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{api_app, memory_state, session_cookie};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn register_request(name: &str, email: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": name, "email": email, "password": "secret1"}))
    }

    #[rstest]
    #[actix_web::test]
    async fn first_account_is_admin_and_later_ones_are_users() {
        let app = test::init_service(api_app(memory_state())).await;

        let first = test::call_service(&app, register_request("Ada", "ada@example.com").to_request())
            .await;
        assert_eq!(first.status(), StatusCode::CREATED);
        session_cookie(&first);
        let body: PrincipalResponse = test::read_body_json(first).await;
        assert_eq!(body.user.role, Role::Admin);

        let second =
            test::call_service(&app, register_request("Bob", "bob@example.com").to_request()).await;
        let body: PrincipalResponse = test::read_body_json(second).await;
        assert_eq!(body.user.role, Role::User);
        assert_eq!(body.user.name, "Bob");
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_email_is_rejected() {
        let app = test::init_service(api_app(memory_state())).await;
        test::call_service(&app, register_request("Ada", "ada@example.com").to_request()).await;

        let res =
            test::call_service(&app, register_request("Ada", "ada@example.com").to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Email already exists");
    }

    #[rstest]
    #[case(json!({"email": "ada@example.com"}), "name")]
    #[case(json!({"name": "Ada", "email": "not-an-email", "password": "secret1"}), "email")]
    #[actix_web::test]
    async fn invalid_registrations_name_the_field(#[case] payload: Value, #[case] field: &str) {
        let app = test::init_service(api_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[case("ada@example.com", "wrong-password")]
    #[case("nobody@example.com", "secret1")]
    #[actix_web::test]
    async fn bad_logins_share_one_message(#[case] email: &str, #[case] password: &str) {
        let app = test::init_service(api_app(memory_state())).await;
        test::call_service(&app, register_request("Ada", "ada@example.com").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": email, "password": password}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[rstest]
    #[actix_web::test]
    async fn login_sets_a_session_and_logout_clears_it() {
        let app = test::init_service(api_app(memory_state())).await;
        test::call_service(&app, register_request("Ada", "ada@example.com").to_request()).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "ada@example.com", "password": "secret1"}))
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        let cookie = session_cookie(&login_res);

        let me = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/showMe")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);

        let logout_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(logout_res).await;
        assert_eq!(body["msg"], "User logged out!");
    }
}

//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers opt into authentication by taking [`AuthenticatedUser`]; routes
//! whose handlers do not take it are public. Admin-only handlers additionally
//! call [`AuthenticatedUser::require_admin`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AccessClaims, Error, ErrorCode, User, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Identity proven by a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    claims: AccessClaims,
}

impl AuthenticatedUser {
    /// Subject of the presented token.
    pub fn user_id(&self) -> &UserId {
        &self.claims.sub
    }

    /// Claims decoded from the token.
    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }

    /// Load the caller and require the admin role.
    ///
    /// Roles are read from the store rather than the token so demotions take
    /// effect immediately.
    ///
    /// # Errors
    ///
    /// `401` when the account no longer exists, `403` when it is not an
    /// admin.
    pub async fn require_admin(&self, state: &HttpState) -> Result<User, Error> {
        let user = state
            .users
            .find_by_id(self.user_id())
            .await
            .map_err(|err| match err.code() {
                ErrorCode::NotFound => Error::unauthorized("account no longer exists"),
                _ => err,
            })?;
        if !user.role().is_admin() {
            return Err(Error::forbidden("admin role required"));
        }
        Ok(user)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(Error::unauthorized("unsupported authorization scheme"));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized("missing bearer token"));
    }
    Ok(token.to_owned())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state = state.ok_or_else(|| Error::internal("http state is not configured"))?;
            let claims = state.login.verify_token(&token).await?;
            Ok(AuthenticatedUser { claims })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{TestPorts, sample_user};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id().to_string())
    }

    async fn admin_only(
        state: web::Data<HttpState>,
        user: AuthenticatedUser,
    ) -> Result<HttpResponse, Error> {
        let admin = user.require_admin(&state).await?;
        Ok(HttpResponse::Ok().body(admin.username().to_string()))
    }

    async fn call(ports: TestPorts, path: &str, authorization: Option<&str>) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .route("/whoami", web::get().to(whoami))
                .route("/admin", web::get().to(admin_only)),
        )
        .await;
        let mut request = test::TestRequest::get().uri(path);
        if let Some(value) = authorization {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn valid_tokens_identify_the_caller() {
        let user = sample_user(Role::User);
        let mut ports = TestPorts::default();
        ports.authenticate_as(&user);

        let (status, body) = call(ports, "/whoami", Some("Bearer test-token")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user.id().to_string());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer    "))]
    #[actix_web::test]
    async fn missing_or_malformed_headers_are_unauthorised(#[case] header: Option<&str>) {
        let (status, _) = call(TestPorts::default(), "/whoami", header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn rejected_tokens_are_unauthorised() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_verify_token()
            .returning(|_| Err(Error::unauthorized("token expired")));

        let (status, body) = call(ports, "/whoami", Some("Bearer stale")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("token expired"));
    }

    #[actix_web::test]
    async fn admins_pass_the_role_check() {
        let admin = sample_user(Role::Admin);
        let mut ports = TestPorts::default();
        ports.authenticate_as(&admin);

        let (status, body) = call(ports, "/admin", Some("bearer test-token")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ada");
    }

    #[actix_web::test]
    async fn regular_users_are_forbidden_from_admin_routes() {
        let mut ports = TestPorts::default();
        ports.authenticate_as(&sample_user(Role::User));

        let (status, _) = call(ports, "/admin", Some("Bearer test-token")).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn deleted_accounts_are_unauthorised() {
        let user = sample_user(Role::Admin);
        let claims = AccessClaims::from(&user);
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_verify_token()
            .returning(move |_| Ok(claims.clone()));
        ports
            .users
            .expect_find_by_id()
            .returning(|id| Err(Error::not_found(format!("user {id} not found"))));

        let (status, _) = call(ports, "/admin", Some("Bearer test-token")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

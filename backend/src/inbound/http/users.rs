//! Users API handlers.
//!
//! ```text
//! POST /users {"email":"ada@example.com","username":"ada","password":"secret"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewUser, User, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_user_validation_error;

/// Sign-up request body for `POST /users`.
///
/// Example JSON:
/// `{"email":"ada@example.com","username":"ada","password":"secret","role":"user"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "ada")]
    pub username: String,
    pub password: String,
    /// `user` (default) or `admin`; `admin` needs an admin bearer token.
    #[schema(example = "user")]
    pub role: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = UserValidationError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.username,
            &value.password,
            value.role.as_deref(),
        )
    }
}

/// Register a new account.
///
/// The response never includes the password or its hash. A taken email or
/// username fails with `400` carrying the database's detail text. Anyone may
/// sign up as `user`; requesting `admin` requires the caller to present the
/// token of an existing admin.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid request or duplicate account", body = Error),
        (status = 401, description = "Admin token no longer maps to an account", body = Error),
        (status = 403, description = "Admin role requested without an admin token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    caller: Option<AuthenticatedUser>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = NewUser::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    if new_user.role().is_admin() {
        let caller = caller
            .ok_or_else(|| Error::forbidden("creating an admin account requires an admin token"))?;
        caller.require_admin(&state).await?;
    }
    let user = state.users_command.register(new_user).await?;
    Ok(HttpResponse::Created().json(user))
}

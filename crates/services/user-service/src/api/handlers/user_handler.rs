//! User handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{ApiResponse, AppError, AppResult};
use domain::{User, UserResponse};

use crate::api::extractors::ValidatedJson;
use crate::api::state::AppState;

/// User registration request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "John Doe")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    #[schema(example = "password123")]
    pub password: String,
}

impl From<CreateUserRequest> for User {
    fn from(req: CreateUserRequest) -> Self {
        User::new(req.name, req.email, req.password)
    }
}

/// User update request; every field is optional on the wire
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    /// Left empty to keep the current password
    pub password: String,
}

impl From<UpdateUserRequest> for User {
    fn from(req: UpdateUserRequest) -> Self {
        User {
            id: req.id,
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).put(update_user))
        .route("/:id", get(get_user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created"),
        (status = 400, description = "Malformed or invalid body"),
        (status = 409, description = "Email is already in use"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.users.create_user(payload.into()).await?;
    Ok(Json(ApiResponse::empty()))
}

/// Update user info inside one transaction
#[utoipa::path(
    put,
    path = "/api/v1/users",
    tag = "Users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Users updated"),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.users.update_user_info(payload.into()).await?;
    Ok(Json(ApiResponse::empty()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "ID is not an unsigned integer"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let id: u64 = id
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid user id: {}", id)))?;

    let user = state.users.get_user_info(id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

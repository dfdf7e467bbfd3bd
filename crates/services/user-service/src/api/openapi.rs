//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::user_handler::{CreateUserRequest, UpdateUserRequest};
use domain::UserResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::user_handler::create_user,
        crate::api::handlers::user_handler::update_user,
        crate::api::handlers::user_handler::get_user,
    ),
    components(schemas(CreateUserRequest, UpdateUserRequest, UserResponse)),
    tags((name = "Users", description = "User registration and lookup"))
)]
pub struct ApiDoc;

// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{
    middleware::AuthenticatedUser,
    models::{LoginRequest, LoginResponse, RegisterRequest, UserProfile, UserResponse},
};
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::AppState;

/// Register a new user
/// POST /users/register
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or username already exists", body = crate::error::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    tracing::debug!("Registering user: {}", request.username);

    let user = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login a user
/// POST /users/login
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// Get the caller's profile (protected endpoint)
/// GET /api/get-info
#[utoipa::path(
    get,
    path = "/api/get-info",
    responses(
        (status = 200, description = "Caller profile with quests", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_info_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.auth_service.get_info(user.user_id).await?;
    Ok(Json(profile))
}

// HTTP handlers for unit-of-measure endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::uoms::models::{Uom, UomInput};
use crate::AppState;

/// GET /api/uoms
#[utoipa::path(
    get,
    path = "/api/uoms",
    responses(
        (status = 200, description = "All units", body = Vec<Uom>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    ),
    tag = "uoms"
)]
pub async fn list_uoms_handler(State(state): State<AppState>) -> Result<Json<Vec<Uom>>, ApiError> {
    Ok(Json(state.uom_service.list_uoms().await?))
}

/// GET /api/uom/{id}
#[utoipa::path(
    get,
    path = "/api/uom/{id}",
    params(("id" = i32, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Unit found", body = Uom),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse)
    ),
    tag = "uoms"
)]
pub async fn get_uom_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Uom>, ApiError> {
    Ok(Json(state.uom_service.get_uom(id).await?))
}

/// POST /api/uom
#[utoipa::path(
    post,
    path = "/api/uom",
    request_body = UomInput,
    responses(
        (status = 201, description = "Unit created", body = Uom),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse)
    ),
    tag = "uoms"
)]
pub async fn create_uom_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(request): AppJson<UomInput>,
) -> Result<(StatusCode, Json<Uom>), ApiError> {
    let uom = state.uom_service.create_uom(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(uom)))
}

/// PUT /api/uom/{id}
#[utoipa::path(
    put,
    path = "/api/uom/{id}",
    params(("id" = i32, Path, description = "Unit id")),
    request_body = UomInput,
    responses(
        (status = 200, description = "Unit updated", body = Uom),
        (status = 403, description = "Caller may not modify this unit", body = crate::error::ErrorResponse),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse)
    ),
    tag = "uoms"
)]
pub async fn update_uom_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<UomInput>,
) -> Result<Json<Uom>, ApiError> {
    let uom = state.uom_service.update_uom(id, user.user_id, request).await?;
    Ok(Json(uom))
}

/// DELETE /api/uom/{id}
#[utoipa::path(
    delete,
    path = "/api/uom/{id}",
    params(("id" = i32, Path, description = "Unit id")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 403, description = "Caller may not modify this unit", body = crate::error::ErrorResponse),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse)
    ),
    tag = "uoms"
)]
pub async fn delete_uom_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.uom_service.delete_uom(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

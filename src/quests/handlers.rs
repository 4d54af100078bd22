// HTTP handlers for quest endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::quests::models::{CompleteQuestRequest, Quest, QuestCompletion, QuestInput};
use crate::AppState;

/// List all quests
/// GET /api/quests
#[utoipa::path(
    get,
    path = "/api/quests",
    responses(
        (status = 200, description = "All quests", body = Vec<Quest>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    ),
    tag = "quests"
)]
pub async fn list_quests_handler(State(state): State<AppState>) -> Result<Json<Vec<Quest>>, ApiError> {
    let quests = state.quest_service.list_quests().await?;
    Ok(Json(quests))
}

/// Get a quest by id
/// GET /api/quest/{id}
#[utoipa::path(
    get,
    path = "/api/quest/{id}",
    params(("id" = i32, Path, description = "Quest id")),
    responses(
        (status = 200, description = "Quest found", body = Quest),
        (status = 404, description = "Quest not found", body = crate::error::ErrorResponse)
    ),
    tag = "quests"
)]
pub async fn get_quest_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Quest>, ApiError> {
    let quest = state.quest_service.get_quest(id).await?;
    Ok(Json(quest))
}

/// Create a new quest owned by the caller
/// POST /api/quest
#[utoipa::path(
    post,
    path = "/api/quest",
    request_body = QuestInput,
    responses(
        (status = 201, description = "Quest created", body = Quest),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    ),
    tag = "quests"
)]
pub async fn create_quest_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(request): AppJson<QuestInput>,
) -> Result<(StatusCode, Json<Quest>), ApiError> {
    let quest = state.quest_service.create_quest(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(quest)))
}

/// Update an existing quest
/// PUT /api/quest/{id}
#[utoipa::path(
    put,
    path = "/api/quest/{id}",
    params(("id" = i32, Path, description = "Quest id")),
    request_body = QuestInput,
    responses(
        (status = 200, description = "Quest updated", body = Quest),
        (status = 400, description = "Invalid input data", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller may not modify this quest", body = crate::error::ErrorResponse),
        (status = 404, description = "Quest not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Reward is frozen after completion", body = crate::error::ErrorResponse)
    ),
    tag = "quests"
)]
pub async fn update_quest_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<QuestInput>,
) -> Result<Json<Quest>, ApiError> {
    let quest = state
        .quest_service
        .update_quest(id, user.user_id, request)
        .await?;
    Ok(Json(quest))
}

/// Delete a quest
/// DELETE /api/quest/{id}
#[utoipa::path(
    delete,
    path = "/api/quest/{id}",
    params(("id" = i32, Path, description = "Quest id")),
    responses(
        (status = 204, description = "Quest deleted"),
        (status = 403, description = "Caller may not modify this quest", body = crate::error::ErrorResponse),
        (status = 404, description = "Quest not found", body = crate::error::ErrorResponse)
    ),
    tag = "quests"
)]
pub async fn delete_quest_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.quest_service.delete_quest(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Complete a quest as the caller
/// POST /api/quest-complete
#[utoipa::path(
    post,
    path = "/api/quest-complete",
    request_body = CompleteQuestRequest,
    responses(
        (status = 200, description = "Reward credited", body = QuestCompletion),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Quest not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Quest already completed", body = crate::error::ErrorResponse)
    ),
    tag = "quests"
)]
pub async fn complete_quest_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(request): AppJson<CompleteQuestRequest>,
) -> Result<Json<QuestCompletion>, ApiError> {
    let completion = state.quest_service.complete_quest(user.user_id, request).await?;
    Ok(Json(completion))
}

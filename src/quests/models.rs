use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::models::{User, UserResponse};
use crate::validation::validate_not_blank;

/// A task with a reward, created by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Quest {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "T")]
    pub title: String,
    #[schema(example = "D")]
    pub description: String,
    #[schema(example = 10)]
    pub reward: i32,
    /// Creator of the quest
    #[schema(example = 1)]
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join record: `user_id` finished `quest_id` at `completed_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompletedQuest {
    pub id: i32,
    pub user_id: i32,
    pub quest_id: i32,
    pub completed_at: DateTime<Utc>,
}

/// Request DTO for creating or replacing a quest
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct QuestInput {
    #[validate(
        length(min = 1, max = 255, message = "Title is required"),
        custom = "validate_not_blank"
    )]
    #[schema(example = "T")]
    pub title: String,
    #[validate(
        length(min = 1, message = "Description is required"),
        custom = "validate_not_blank"
    )]
    #[schema(example = "D")]
    pub description: String,
    #[validate(range(min = 1, message = "Reward must be a positive integer"))]
    #[schema(example = 10)]
    pub reward: i32,
}

/// Fields written when a quest is created
#[derive(Debug, Clone)]
pub struct NewQuest {
    pub title: String,
    pub description: String,
    pub reward: i32,
    pub user_id: i32,
}

/// Request DTO for completing a quest as the authenticated user
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CompleteQuestRequest {
    #[validate(range(min = 1, message = "Quest id must be positive"))]
    #[schema(example = 1)]
    pub quest_id: i32,
}

/// Response DTO for a successful completion
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestCompletion {
    pub user: UserResponse,
    pub completion: CompletedQuest,
}

/// Result of the completion transaction
#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    Completed { user: User, completion: CompletedQuest },
    QuestNotFound,
    UserNotFound,
    AlreadyCompleted,
    /// The reward would push the user's total past `i32::MAX`
    PointOverflow,
}

// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::quests::models::{CompletedQuest, Quest};
use crate::validation::validate_not_blank;

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// SHA-256 digest of the most recently issued session token
    pub token_digest: Option<String>,
    pub point: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written when a user registers
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// User response model (excludes password_hash and token digest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@example.com")]
    pub email: String,
    #[schema(example = 10)]
    pub point: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            point: user.point,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user together with the quests they created and the quests they completed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserResponse,
    pub quests: Vec<Quest>,
    pub completed_quests: Vec<CompletedQuest>,
}

/// Registration request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 255, message = "Username is required"),
        custom = "validate_not_blank"
    )]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, max = 255, message = "Email is required"))]
    #[schema(example = "a@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "x")]
    pub password: String,
}

/// Login request DTO
///
/// `login_identifier` may be either an email address or a username.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Login identifier is required"))]
    #[schema(example = "a@example.com")]
    pub login_identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "x")]
    pub password: String,
}

/// Login response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

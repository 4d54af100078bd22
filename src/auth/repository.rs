// User persistence: the store interface and its PostgreSQL repository

use axum::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::auth::models::{NewUser, User, UserProfile};
use crate::db::{map_unique_violation, StoreError};
use crate::quests::models::{CompletedQuest, Quest};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, token_digest, point, created_at, updated_at";

/// Persistence operations the auth workflow depends on
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user; unique violations surface as `StoreError::Duplicate`
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Record the digest of the session token issued at login
    async fn store_token_digest(&self, user_id: i32, digest: &str) -> Result<(), StoreError>;

    /// Load a user with owned quests and completion records
    async fn load_profile(&self, user_id: i32) -> Result<Option<UserProfile>, StoreError>;
}

/// Hash a session token using SHA-256
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_one_by("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_one_by("username", username).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn store_token_digest(&self, user_id: i32, digest: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET token_digest = $1, updated_at = NOW() WHERE id = $2")
            .bind(digest)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn load_profile(&self, user_id: i32) -> Result<Option<UserProfile>, StoreError> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let quests = sqlx::query_as::<_, Quest>(
            r#"
            SELECT id, title, description, reward, user_id, created_at, updated_at
            FROM quests
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let completed_quests = sqlx::query_as::<_, CompletedQuest>(
            r#"
            SELECT id, user_id, quest_id, completed_at
            FROM completed_quests
            WHERE user_id = $1
            ORDER BY completed_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(UserProfile {
            user: user.into(),
            quests,
            completed_quests,
        }))
    }
}

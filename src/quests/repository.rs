use axum::async_trait;
use sqlx::PgPool;

use crate::auth::models::User;
use crate::config::CompletionPolicy;
use crate::db::StoreError;
use crate::quests::models::{CompletedQuest, CompletionOutcome, NewQuest, Quest, QuestInput};

/// Persistence operations the quest workflow depends on
#[async_trait]
pub trait QuestStore: Send + Sync {
    async fn create(&self, new_quest: NewQuest) -> Result<Quest, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Quest>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Quest>, StoreError>;

    /// Replace title, description and reward; `None` when the quest is gone
    async fn update(&self, id: i32, input: &QuestInput) -> Result<Option<Quest>, StoreError>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    async fn has_completions(&self, quest_id: i32) -> Result<bool, StoreError>;

    /// Credit `user_id` with the quest's reward and record the completion
    ///
    /// Implementations must apply the point increment and the completion
    /// record together or not at all.
    async fn complete(
        &self,
        user_id: i32,
        quest_id: i32,
        policy: CompletionPolicy,
    ) -> Result<CompletionOutcome, StoreError>;
}

/// Repository for database operations on quests
#[derive(Clone)]
pub struct QuestRepository {
    pool: PgPool,
}

impl QuestRepository {
    /// Create a new QuestRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestStore for QuestRepository {
    async fn create(&self, new_quest: NewQuest) -> Result<Quest, StoreError> {
        let quest = sqlx::query_as::<_, Quest>(
            r#"
            INSERT INTO quests (title, description, reward, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, reward, user_id, created_at, updated_at
            "#,
        )
        .bind(&new_quest.title)
        .bind(&new_quest.description)
        .bind(new_quest.reward)
        .bind(new_quest.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(quest)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Quest>, StoreError> {
        let quest = sqlx::query_as::<_, Quest>(
            r#"
            SELECT id, title, description, reward, user_id, created_at, updated_at
            FROM quests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quest)
    }

    async fn find_all(&self) -> Result<Vec<Quest>, StoreError> {
        let quests = sqlx::query_as::<_, Quest>(
            r#"
            SELECT id, title, description, reward, user_id, created_at, updated_at
            FROM quests
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quests)
    }

    async fn update(&self, id: i32, input: &QuestInput) -> Result<Option<Quest>, StoreError> {
        let quest = sqlx::query_as::<_, Quest>(
            r#"
            UPDATE quests
            SET title = $1, description = $2, reward = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, title, description, reward, user_id, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.reward)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quest)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM quests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn has_completions(&self, quest_id: i32) -> Result<bool, StoreError> {
        let exists: Option<bool> =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM completed_quests WHERE quest_id = $1)")
                .bind(quest_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.unwrap_or(false))
    }

    async fn complete(
        &self,
        user_id: i32,
        quest_id: i32,
        policy: CompletionPolicy,
    ) -> Result<CompletionOutcome, StoreError> {
        // Dropping `tx` without commit rolls everything back.
        let mut tx = self.pool.begin().await?;

        // FOR SHARE keeps the reward stable until commit.
        let quest = sqlx::query_as::<_, Quest>(
            r#"
            SELECT id, title, description, reward, user_id, created_at, updated_at
            FROM quests
            WHERE id = $1
            FOR SHARE
            "#,
        )
        .bind(quest_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(quest) = quest else {
            return Ok(CompletionOutcome::QuestNotFound);
        };

        // Serializes concurrent completions by the same user.
        let locked: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        if locked.is_none() {
            return Ok(CompletionOutcome::UserNotFound);
        }

        if policy == CompletionPolicy::OncePerQuest {
            let already: Option<bool> = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM completed_quests WHERE user_id = $1 AND quest_id = $2)",
            )
            .bind(user_id)
            .bind(quest_id)
            .fetch_one(&mut *tx)
            .await?;

            if already.unwrap_or(false) {
                return Ok(CompletionOutcome::AlreadyCompleted);
            }
        }

        // The row is locked, so a miss here means the total would overflow.
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET point = point + $1, updated_at = NOW()
            WHERE id = $2 AND point <= 2147483647 - $1
            RETURNING id, username, email, password_hash, token_digest, point, created_at, updated_at
            "#,
        )
        .bind(quest.reward)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            return Ok(CompletionOutcome::PointOverflow);
        };

        let completion = sqlx::query_as::<_, CompletedQuest>(
            r#"
            INSERT INTO completed_quests (user_id, quest_id)
            VALUES ($1, $2)
            RETURNING id, user_id, quest_id, completed_at
            "#,
        )
        .bind(user_id)
        .bind(quest.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CompletionOutcome::Completed { user, completion })
    }
}

use std::sync::Arc;
use validator::Validate;

use crate::config::Policies;
use crate::error::ApiError;
use crate::quests::{
    CompleteQuestRequest, CompletionOutcome, NewQuest, Quest, QuestCompletion, QuestInput, QuestStore,
};

/// Service layer for quest business logic
#[derive(Clone)]
pub struct QuestService {
    quests: Arc<dyn QuestStore>,
    policies: Policies,
}

impl QuestService {
    /// Create a new QuestService
    pub fn new(quests: Arc<dyn QuestStore>, policies: Policies) -> Self {
        Self { quests, policies }
    }

    /// Create a quest owned by the authenticated caller
    pub async fn create_quest(&self, user_id: i32, input: QuestInput) -> Result<Quest, ApiError> {
        input.validate()?;

        let quest = self
            .quests
            .create(NewQuest {
                title: input.title,
                description: input.description,
                reward: input.reward,
                user_id,
            })
            .await?;

        tracing::info!(quest_id = quest.id, user_id, "Quest created");
        Ok(quest)
    }

    pub async fn get_quest(&self, id: i32) -> Result<Quest, ApiError> {
        self.quests.find_by_id(id).await?.ok_or_else(|| {
            tracing::debug!("Quest with id {} not found", id);
            ApiError::not_found("Quest", id)
        })
    }

    pub async fn list_quests(&self) -> Result<Vec<Quest>, ApiError> {
        let quests = self.quests.find_all().await?;
        tracing::debug!("Retrieved {} quests", quests.len());
        Ok(quests)
    }

    /// Update an existing quest
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Fetches the existing quest
    /// 3. Applies the configured mutation policy
    /// 4. Refuses to change the reward once a completion references the quest
    /// 5. Writes the new fields
    pub async fn update_quest(&self, id: i32, caller: i32, input: QuestInput) -> Result<Quest, ApiError> {
        input.validate()?;

        let existing = self.get_quest(id).await?;
        self.authorize(&existing, caller)?;

        if input.reward != existing.reward && self.quests.has_completions(id).await? {
            return Err(ApiError::Conflict {
                message: "Quest reward cannot change after the quest has been completed".to_string(),
            });
        }

        let updated = self
            .quests
            .update(id, &input)
            .await?
            .ok_or_else(|| ApiError::not_found("Quest", id))?;

        tracing::info!(quest_id = id, caller, "Quest updated");
        Ok(updated)
    }

    pub async fn delete_quest(&self, id: i32, caller: i32) -> Result<(), ApiError> {
        let existing = self.get_quest(id).await?;
        self.authorize(&existing, caller)?;

        if !self.quests.delete(id).await? {
            return Err(ApiError::not_found("Quest", id));
        }

        tracing::info!(quest_id = id, caller, "Quest deleted");
        Ok(())
    }

    /// Complete a quest as `user_id`
    ///
    /// Adds the quest's reward to the user's points and appends exactly one
    /// completion record, in a single store transaction.
    pub async fn complete_quest(
        &self,
        user_id: i32,
        request: CompleteQuestRequest,
    ) -> Result<QuestCompletion, ApiError> {
        request.validate()?;

        let outcome = self
            .quests
            .complete(user_id, request.quest_id, self.policies.completion)
            .await?;

        match outcome {
            CompletionOutcome::Completed { user, completion } => {
                tracing::info!(
                    user_id,
                    quest_id = completion.quest_id,
                    point = user.point,
                    "Quest completed"
                );
                Ok(QuestCompletion {
                    user: user.into(),
                    completion,
                })
            }
            CompletionOutcome::QuestNotFound => Err(ApiError::not_found("Quest", request.quest_id)),
            CompletionOutcome::UserNotFound => Err(ApiError::not_found("User", user_id)),
            CompletionOutcome::AlreadyCompleted => Err(ApiError::Conflict {
                message: "Quest has already been completed".to_string(),
            }),
            CompletionOutcome::PointOverflow => Err(ApiError::Conflict {
                message: "Reward would exceed the maximum point total".to_string(),
            }),
        }
    }

    fn authorize(&self, quest: &Quest, caller: i32) -> Result<(), ApiError> {
        if self.policies.mutation.permits(quest.user_id, caller) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Only the quest's creator may modify it".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::UserStore;
    use crate::config::{CompletionPolicy, MutationPolicy};
    use crate::error::ErrorKind;
    use crate::testing::MemoryStore;

    fn quest_input(title: &str, reward: i32) -> QuestInput {
        QuestInput {
            title: title.to_string(),
            description: "D".to_string(),
            reward,
        }
    }

    async fn setup(policies: Policies) -> (Arc<MemoryStore>, QuestService, i32, i32) {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice", "a@example.com");
        let bob = store.insert_user("bob", "b@example.com");
        let service = QuestService::new(store.clone(), policies);
        (store, service, alice, bob)
    }

    #[tokio::test]
    async fn test_create_quest_sets_creator() {
        let (_, service, alice, _) = setup(Policies::default()).await;

        let quest = service.create_quest(alice, quest_input("T", 10)).await.unwrap();

        assert_eq!(quest.user_id, alice);
        assert_eq!(quest.title, "T");
        assert_eq!(quest.reward, 10);
    }

    #[tokio::test]
    async fn test_create_quest_validation() {
        let (_, service, alice, _) = setup(Policies::default()).await;

        for input in [quest_input("", 10), quest_input("T", 0), quest_input("T", -5), quest_input("  ", 1)] {
            let err = service.create_quest(alice, input).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn test_get_missing_quest_is_not_found() {
        let (_, service, _, _) = setup(Policies::default()).await;
        let err = service.get_quest(99).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_quests() {
        let (_, service, alice, bob) = setup(Policies::default()).await;
        service.create_quest(alice, quest_input("A", 1)).await.unwrap();
        service.create_quest(bob, quest_input("B", 2)).await.unwrap();

        let quests = service.list_quests().await.unwrap();
        let titles: Vec<&str> = quests.iter().map(|q| q.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_any_authenticated_user_may_edit_by_default() {
        let (_, service, alice, bob) = setup(Policies::default()).await;
        let quest = service.create_quest(alice, quest_input("T", 10)).await.unwrap();

        let updated = service
            .update_quest(quest.id, bob, quest_input("Renamed", 10))
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.user_id, alice);

        service.delete_quest(quest.id, bob).await.unwrap();
        assert_eq!(service.get_quest(quest.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_owner_only_policy_forbids_other_users() {
        let policies = Policies {
            mutation: MutationPolicy::OwnerOnly,
            ..Policies::default()
        };
        let (_, service, alice, bob) = setup(policies).await;
        let quest = service.create_quest(alice, quest_input("T", 10)).await.unwrap();

        let err = service
            .update_quest(quest.id, bob, quest_input("Mine now", 10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = service.delete_quest(quest.id, bob).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        service.delete_quest(quest.id, alice).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_quest_is_not_found() {
        let (_, service, alice, _) = setup(Policies::default()).await;
        let err = service.update_quest(5, alice, quest_input("T", 1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = service.delete_quest(5, alice).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_complete_quest_awards_reward_once_per_call() {
        let (store, service, alice, _) = setup(Policies::default()).await;
        let quest = service.create_quest(alice, quest_input("T", 10)).await.unwrap();

        let first = service
            .complete_quest(alice, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap();
        assert_eq!(first.user.point, 10);
        assert_eq!(first.completion.user_id, alice);
        assert_eq!(first.completion.quest_id, quest.id);

        let second = service
            .complete_quest(alice, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap();
        assert_eq!(second.user.point, 20);

        let profile = store.load_profile(alice).await.unwrap().unwrap();
        assert_eq!(profile.completed_quests.len(), 2);
    }

    #[tokio::test]
    async fn test_once_policy_rejects_repeat_completion() {
        let policies = Policies {
            completion: CompletionPolicy::OncePerQuest,
            ..Policies::default()
        };
        let (store, service, alice, _) = setup(policies).await;
        let quest = service.create_quest(alice, quest_input("T", 10)).await.unwrap();

        service
            .complete_quest(alice, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap();
        let err = service
            .complete_quest(alice, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let user = UserStore::find_by_id(store.as_ref(), alice).await.unwrap().unwrap();
        assert_eq!(user.point, 10);
    }

    #[tokio::test]
    async fn test_complete_unknown_quest_is_not_found() {
        let (store, service, alice, _) = setup(Policies::default()).await;

        let err = service
            .complete_quest(alice, CompleteQuestRequest { quest_id: 404 })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let user = UserStore::find_by_id(store.as_ref(), alice).await.unwrap().unwrap();
        assert_eq!(user.point, 0);
    }

    #[tokio::test]
    async fn test_complete_as_unknown_user_is_not_found() {
        let (_, service, alice, _) = setup(Policies::default()).await;
        let quest = service.create_quest(alice, quest_input("T", 10)).await.unwrap();

        let err = service
            .complete_quest(9999, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_point_total_cannot_overflow() {
        let (store, service, alice, _) = setup(Policies::default()).await;
        let quest = service.create_quest(alice, quest_input("Jackpot", i32::MAX)).await.unwrap();

        let first = service
            .complete_quest(alice, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap();
        assert_eq!(first.user.point, i32::MAX);

        let err = service
            .complete_quest(alice, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let profile = store.load_profile(alice).await.unwrap().unwrap();
        assert_eq!(profile.user.point, i32::MAX);
        assert_eq!(profile.completed_quests.len(), 1);
    }

    #[tokio::test]
    async fn test_reward_is_frozen_after_completion() {
        let (_, service, alice, _) = setup(Policies::default()).await;
        let quest = service.create_quest(alice, quest_input("T", 10)).await.unwrap();
        service
            .complete_quest(alice, CompleteQuestRequest { quest_id: quest.id })
            .await
            .unwrap();

        let err = service
            .update_quest(quest.id, alice, quest_input("T", 50))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let renamed = service
            .update_quest(quest.id, alice, quest_input("Renamed", 10))
            .await
            .unwrap();
        assert_eq!(renamed.title, "Renamed");
    }

    #[tokio::test]
    async fn test_concurrent_completions_do_not_lose_points() {
        let (store, service, alice, _) = setup(Policies::default()).await;
        let quest = service.create_quest(alice, quest_input("T", 3)).await.unwrap();

        let quest_id = quest.id;
        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .complete_quest(alice, CompleteQuestRequest { quest_id })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let user = UserStore::find_by_id(store.as_ref(), alice).await.unwrap().unwrap();
        assert_eq!(user.point, 60);
        let profile = store.load_profile(alice).await.unwrap().unwrap();
        assert_eq!(profile.completed_quests.len(), 20);
    }
}

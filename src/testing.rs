// In-memory store used by workflow and HTTP tests

use std::sync::Mutex;

use axum::async_trait;
use chrono::Utc;

use crate::auth::models::{NewUser, User, UserProfile};
use crate::auth::repository::UserStore;
use crate::config::CompletionPolicy;
use crate::db::{StoreError, UniqueField};
use crate::quests::models::{CompletedQuest, CompletionOutcome, NewQuest, Quest, QuestInput};
use crate::quests::repository::QuestStore;
use crate::uoms::models::{NewUom, Uom};
use crate::uoms::repository::UomStore;

#[derive(Default)]
struct State {
    users: Vec<User>,
    quests: Vec<Quest>,
    completions: Vec<CompletedQuest>,
    uoms: Vec<Uom>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Implements every store trait over one mutex, so each call is atomic
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, bypassing registration
    pub fn insert_user(&self, username: &str, email: &str) -> i32 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        state.users.push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            token_digest: None,
            point: 0,
            created_at: now,
            updated_at: now,
        });
        id
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate { field: UniqueField::Email });
        }
        if state.users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::Duplicate { field: UniqueField::Username });
        }

        let id = state.next_id();
        let now = Utc::now();
        let user = User {
            id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            token_digest: None,
            point: 0,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn store_token_digest(&self, user_id: i32, digest: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.token_digest = Some(digest.to_string());
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn load_profile(&self, user_id: i32) -> Result<Option<UserProfile>, StoreError> {
        let state = self.state.lock().unwrap();
        let Some(user) = state.users.iter().find(|u| u.id == user_id).cloned() else {
            return Ok(None);
        };

        Ok(Some(UserProfile {
            user: user.into(),
            quests: state.quests.iter().filter(|q| q.user_id == user_id).cloned().collect(),
            completed_quests: state
                .completions
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect(),
        }))
    }
}

#[async_trait]
impl QuestStore for MemoryStore {
    async fn create(&self, new_quest: NewQuest) -> Result<Quest, StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        let quest = Quest {
            id,
            title: new_quest.title,
            description: new_quest.description,
            reward: new_quest.reward,
            user_id: new_quest.user_id,
            created_at: now,
            updated_at: now,
        };
        state.quests.push(quest.clone());
        Ok(quest)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Quest>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.quests.iter().find(|q| q.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Quest>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.quests.clone())
    }

    async fn update(&self, id: i32, input: &QuestInput) -> Result<Option<Quest>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(quest) = state.quests.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        quest.title = input.title.clone();
        quest.description = input.description.clone();
        quest.reward = input.reward;
        quest.updated_at = Utc::now();
        Ok(Some(quest.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.quests.len();
        state.quests.retain(|q| q.id != id);
        Ok(state.quests.len() < before)
    }

    async fn has_completions(&self, quest_id: i32) -> Result<bool, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.completions.iter().any(|c| c.quest_id == quest_id))
    }

    async fn complete(
        &self,
        user_id: i32,
        quest_id: i32,
        policy: CompletionPolicy,
    ) -> Result<CompletionOutcome, StoreError> {
        let mut state = self.state.lock().unwrap();

        let Some(reward) = state.quests.iter().find(|q| q.id == quest_id).map(|q| q.reward) else {
            return Ok(CompletionOutcome::QuestNotFound);
        };
        let Some(current) = state.users.iter().find(|u| u.id == user_id).map(|u| u.point) else {
            return Ok(CompletionOutcome::UserNotFound);
        };
        if policy == CompletionPolicy::OncePerQuest
            && state
                .completions
                .iter()
                .any(|c| c.user_id == user_id && c.quest_id == quest_id)
        {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }
        let Some(point) = current.checked_add(reward) else {
            return Ok(CompletionOutcome::PointOverflow);
        };

        let id = state.next_id();
        let now = Utc::now();
        let completion = CompletedQuest {
            id,
            user_id,
            quest_id,
            completed_at: now,
        };
        state.completions.push(completion.clone());

        let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(CompletionOutcome::UserNotFound);
        };
        user.point = point;
        user.updated_at = now;

        Ok(CompletionOutcome::Completed {
            user: user.clone(),
            completion,
        })
    }
}

#[async_trait]
impl UomStore for MemoryStore {
    async fn create(&self, new_uom: NewUom) -> Result<Uom, StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        let uom = Uom {
            id,
            name: new_uom.name,
            user_id: new_uom.user_id,
            created_at: now,
            updated_at: now,
        };
        state.uoms.push(uom.clone());
        Ok(uom)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Uom>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.uoms.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Uom>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.uoms.clone())
    }

    async fn update(&self, id: i32, name: &str) -> Result<Option<Uom>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(uom) = state.uoms.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        uom.name = name.to_string();
        uom.updated_at = Utc::now();
        Ok(Some(uom.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.uoms.len();
        state.uoms.retain(|u| u.id != id);
        Ok(state.uoms.len() < before)
    }
}

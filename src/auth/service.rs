// Authentication service - business logic layer

use std::sync::Arc;
use validator::Validate;

use crate::auth::{
    models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, UserProfile, UserResponse},
    password::PasswordService,
    repository::{token_digest, UserStore},
    token::TokenService,
};
use crate::error::ApiError;
use crate::validation::{EmailShape, IdentifierKind};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Authentication service coordinating registration, login and profile lookup
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
    email_shape: EmailShape,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: PasswordService,
        tokens: Arc<TokenService>,
        email_shape: EmailShape,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            email_shape,
        }
    }

    /// Register a new user
    ///
    /// The email and username lookups only short-circuit obvious duplicates;
    /// the unique constraints on insert decide conflicts.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, ApiError> {
        request.validate()?;

        if !self.email_shape.matches(&request.email) {
            tracing::warn!("Rejected registration with malformed email");
            return Err(ApiError::BadRequest("Email must be in valid format".to_string()));
        }

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ApiError::Conflict {
                message: "Email already exists".to_string(),
            });
        }

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(ApiError::Conflict {
                message: "Username already exists".to_string(),
            });
        }

        let password_hash = self.passwords.hash_password(&request.password)?;

        let user = self
            .users
            .create(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User created");
        Ok(user.into())
    }

    /// Login with an email address or username
    ///
    /// Unknown identifiers and wrong passwords produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        request.validate()?;

        let identifier = request.login_identifier.as_str();
        let existing = match self.email_shape.classify(identifier) {
            IdentifierKind::Email => self.users.find_by_email(identifier).await?,
            IdentifierKind::Username => self.users.find_by_username(identifier).await?,
        };

        let Some(user) = existing else {
            self.passwords.dummy_verify(&request.password);
            tracing::warn!("Login attempt for unknown account");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !self.passwords.verify_password(&request.password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let issued = self.tokens.issue(user.id)?;
        self.users
            .store_token_digest(user.id, &token_digest(&issued.token))
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User login");
        Ok(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// Get the caller's profile with owned and completed quests
    pub async fn get_info(&self, user_id: i32) -> Result<UserProfile, ApiError> {
        tracing::debug!(user_id, "Loading user profile");

        self.users
            .load_profile(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", user_id))
    }
}

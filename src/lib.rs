pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod quests;
pub mod uoms;
pub mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, PasswordService, TokenError, TokenService, UserRepository, UserStore};
use config::{Config, Policies};
use db::DbPool;
use quests::{QuestRepository, QuestService, QuestStore};
use uoms::{UomRepository, UomService, UomStore};
use validation::EmailShape;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::get_info_handler,
        quests::handlers::list_quests_handler,
        quests::handlers::get_quest_handler,
        quests::handlers::create_quest_handler,
        quests::handlers::update_quest_handler,
        quests::handlers::delete_quest_handler,
        quests::handlers::complete_quest_handler,
        uoms::handlers::list_uoms_handler,
        uoms::handlers::get_uom_handler,
        uoms::handlers::create_uom_handler,
        uoms::handlers::update_uom_handler,
        uoms::handlers::delete_uom_handler,
    ),
    components(
        schemas(
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::LoginResponse,
            auth::models::UserResponse,
            auth::models::UserProfile,
            quests::models::Quest,
            quests::models::CompletedQuest,
            quests::models::QuestInput,
            quests::models::CompleteQuestRequest,
            quests::models::QuestCompletion,
            uoms::models::Uom,
            uoms::models::UomInput,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "users", description = "Registration, login and profile"),
        (name = "quests", description = "Quest management and completion"),
        (name = "uoms", description = "Units of measure")
    ),
    info(
        title = "Quest API",
        version = "1.0.0",
        description = "REST backend for quests, reward points and units of measure"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub quest_service: Arc<QuestService>,
    pub uom_service: Arc<UomService>,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl AppState {
    /// Wire the workflow services over the given stores
    pub fn new(
        tokens: Arc<TokenService>,
        users: Arc<dyn UserStore>,
        quests: Arc<dyn QuestStore>,
        uoms: Arc<dyn UomStore>,
        policies: Policies,
    ) -> Self {
        let auth_service = AuthService::new(users, PasswordService::new(), tokens.clone(), EmailShape::new());

        Self {
            tokens,
            auth_service: Arc::new(auth_service),
            quest_service: Arc::new(QuestService::new(quests, policies)),
            uom_service: Arc::new(UomService::new(uoms, policies.mutation)),
        }
    }

    /// Build the production state backed by PostgreSQL
    pub fn from_pool(pool: DbPool, config: &Config) -> Result<Self, TokenError> {
        let tokens = TokenService::new(&config.jwt_secret, chrono::Duration::hours(config.token_ttl_hours))?;

        Ok(Self::new(
            Arc::new(tokens),
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(QuestRepository::new(pool.clone())),
            Arc::new(UomRepository::new(pool)),
            config.policies,
        ))
    }
}

/// Liveness check
async fn health() -> &'static str {
    "OK"
}

/// Creates and configures the application router
///
/// `/users/*` is public; everything under `/api` passes the auth gate first.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let users = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler));

    let api = Router::new()
        .route("/get-info", get(auth::get_info_handler))
        .route("/quests", get(quests::list_quests_handler))
        .route("/quest", post(quests::create_quest_handler))
        .route(
            "/quest/:id",
            get(quests::get_quest_handler)
                .put(quests::update_quest_handler)
                .delete(quests::delete_quest_handler),
        )
        .route("/quest-complete", post(quests::complete_quest_handler))
        .route("/uoms", get(uoms::list_uoms_handler))
        .route("/uom", post(uoms::create_uom_handler))
        .route(
            "/uom/:id",
            get(uoms::get_uom_handler)
                .put(uoms::update_uom_handler)
                .delete(uoms::delete_uom_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/users", users)
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// Authentication module
// Provides JWT-based sessions: registration, login, the auth gate and profile lookup

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use handlers::{get_info_handler, login_handler, register_handler};
pub use middleware::{require_auth, AuthenticatedUser};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, User, UserProfile, UserResponse};
pub use password::PasswordService;
pub use repository::{UserRepository, UserStore};
pub use service::AuthService;
pub use token::{TokenError, TokenService};

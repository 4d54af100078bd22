// Quest module
// Quest CRUD and the completion workflow that credits rewards

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::*;
pub use models::*;
pub use repository::{QuestRepository, QuestStore};
pub use service::QuestService;

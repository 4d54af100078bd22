// Units of measure
// Independent reference data with plain CRUD

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::*;
pub use models::*;
pub use repository::{UomRepository, UomStore};
pub use service::UomService;

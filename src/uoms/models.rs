use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_not_blank;

/// Unit of measure, a named reference record owned by its creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Uom {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "kilogram")]
    pub name: String,
    #[schema(example = 1)]
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating or renaming a unit
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct UomInput {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom = "validate_not_blank"
    )]
    #[schema(example = "kilogram")]
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewUom {
    pub name: String,
    pub user_id: i32,
}

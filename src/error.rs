// Error handling module for the Quest API
// Provides centralized error types and HTTP response conversion

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::db::StoreError;

/// Main error type for the API
/// All workflow operations and handlers return Result<T, ApiError>
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation errors from request validation
    ValidationError(validator::ValidationErrors),

    /// Malformed input that is not tied to a derive rule
    BadRequest(String),

    /// Resource not found by ID
    NotFound { resource: String, id: String },

    /// Uniqueness or state conflict
    Conflict { message: String },

    /// Missing, invalid or expired token, or credential mismatch
    Unauthorized(String),

    /// Caller is authenticated but the mutation policy forbids the operation
    Forbidden(String),

    /// Database operation errors
    /// Sensitive details are filtered from client responses
    DatabaseError(sqlx::Error),

    /// Internal server errors (hashing, signing)
    /// Sensitive details are filtered from client responses
    InternalError(String),
}

/// Coarse error taxonomy shared by every workflow operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Auth,
    Forbidden,
    Internal,
}

impl ErrorKind {
    /// Transport status for each kind
    pub const fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Auth => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code used in the error envelope
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Auth => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Consistent error response structure
///
/// Provides both a machine-readable `error_code` and a human-readable `message`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    #[schema(example = "NOT_FOUND")]
    pub error_code: String,

    /// Human-readable error message
    #[schema(example = "Quest with id 7 not found")]
    pub message: String,

    /// Field-level validation errors, omitted when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ApiError {
    /// Shorthand for a NotFound error on a numeric id
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Taxonomy kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::ValidationError(_) | ApiError::BadRequest(_) => ErrorKind::Validation,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Conflict { .. } => ErrorKind::Conflict,
            ApiError::Unauthorized(_) => ErrorKind::Auth,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        self.kind().status()
    }

    /// Message that is safe to send to clients
    pub fn client_message(&self) -> String {
        match self {
            ApiError::ValidationError(_) => "Request validation failed".to_string(),
            ApiError::BadRequest(message) => message.clone(),
            ApiError::NotFound { resource, id } => format!("{} with id {} not found", resource, id),
            ApiError::Conflict { message } => message.clone(),
            ApiError::Unauthorized(message) => message.clone(),
            ApiError::Forbidden(message) => message.clone(),
            ApiError::DatabaseError(_) => "A database error occurred".to_string(),
            ApiError::InternalError(_) => "An internal server error occurred".to_string(),
        }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logs at a level matching the severity: error! for 500-class,
    /// warn! for conflicts and auth failures, debug! for expected client errors.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let details = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({})))
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                None
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                None
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                None
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);
                None
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                None
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                None
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                None
            }
        };

        let kind = self.kind();
        (
            kind.status(),
            ErrorResponse {
                error_code: kind.code().to_string(),
                message: self.client_message(),
                details,
                timestamp: Utc::now().to_rfc3339(),
            },
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            other => write!(f, "{}", other.client_message()),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::DatabaseError(e) => Some(e),
            ApiError::ValidationError(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// Unique-constraint rejections are the authoritative conflict signal
impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Duplicate { field } => ApiError::Conflict {
                message: format!("{} already exists", field),
            },
            StoreError::Database(e) => ApiError::DatabaseError(e),
        }
    }
}

/// Verification failures collapse into one message; signing failures are internal
impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Signing(msg) => ApiError::InternalError(format!("token signing failed: {}", msg)),
            TokenError::Configuration(msg) => ApiError::InternalError(format!("token configuration: {}", msg)),
            _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        ApiError::InternalError(error.to_string())
    }
}

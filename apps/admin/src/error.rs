//! # API Error Type
//!
//! Unified error type for the page and form handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Maestro                                │
//! │                                                                         │
//! │  Handler ── Result<Response, ApiError>                                  │
//! │     │                                                                   │
//! │     ├── FieldErrors (validation) ─────────────► 422 { message, errors } │
//! │     ├── DbError::UniqueViolation on code ─────► 422 { errors.codigo }   │
//! │     ├── record missing on show/edit ──────────► 404 { message }         │
//! │     └── DbError::QueryFailed / Internal ──────► 500 generic message     │
//! │                                   (real cause logged with error!)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "codigo is required (and 1 more errors)",
//!   "errors": { "codigo": ["codigo is required"], "descripcion": ["descripcion is required"] }
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use maestro_core::validation::duplicate_code;
use maestro_core::FieldErrors;
use maestro_db::DbError;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (422)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            errors: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error carrying every failing field.
    pub fn validation(errors: FieldErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: errors.to_string(),
            errors: Some(errors),
        }
    }

    /// Maps a failed insert/update, turning a unique violation on `code`
    /// into the same field error the `code_taken` probe produces.
    pub fn from_write(err: DbError, code: &str) -> Self {
        if err.is_unique_violation_on("code") {
            tracing::warn!(code, "Unique code violation past the probe");
            return ApiError::validation(FieldErrors::from(duplicate_code(code)));
        }
        ApiError::from(err)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { table, column } => {
                let mut errors = FieldErrors::new();
                let field = if column == "code" { "codigo".to_string() } else { column };
                errors.push(field.clone(), format!("{} already exists in {}", field, table));
                ApiError::validation(errors)
            }
            DbError::ConstraintViolation(message) => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_core::ValidationError;

    #[test]
    fn test_validation_error_shape() {
        let mut errors = FieldErrors::new();
        errors.add(ValidationError::Required {
            field: "codigo".into(),
        });
        errors.add(ValidationError::Required {
            field: "descripcion".into(),
        });

        let err = ApiError::validation(errors);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "codigo is required (and 1 more errors)");
        assert_eq!(json["errors"]["codigo"][0], "codigo is required");
        assert_eq!(json["errors"]["descripcion"][0], "descripcion is required");
    }

    #[test]
    fn test_unique_violation_maps_to_codigo() {
        let err = ApiError::from_write(DbError::duplicate("products", "code"), "SKU1");
        assert_eq!(err.code, ErrorCode::ValidationError);
        let errors = err.errors.unwrap();
        assert_eq!(errors.get("codigo").unwrap(), ["codigo 'SKU1' already exists"]);

        let generic = ApiError::from(DbError::duplicate("warehouses", "code"));
        assert!(generic.errors.unwrap().contains("codigo"));
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err = ApiError::from(DbError::QueryFailed("syntax error near SELEC".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database operation failed");
        assert!(err.errors.is_none());

        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("errors").is_none());
    }
}

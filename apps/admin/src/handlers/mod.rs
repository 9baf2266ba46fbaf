//! # HTTP Handlers
//!
//! One module per resource, each exposing the same seven actions:
//!
//! | Action    | Route                      | Answer                          |
//! |-----------|----------------------------|---------------------------------|
//! | `index`   | `GET /{res}`               | list page                       |
//! | `create`  | `GET /{res}/create`        | create-form page                |
//! | `store`   | `POST /{res}`              | 303 + flash, or 422             |
//! | `show`    | `GET /{res}/{id}`          | detail page, or 404             |
//! | `edit`    | `GET /{res}/{id}/edit`     | edit-form page, or 404          |
//! | `update`  | `PUT/PATCH /{res}/{id}`    | 303 + flash, or 422             |
//! | `destroy` | `DELETE /{res}/{id}`       | 303 + flash                     |
//!
//! Products have no detail page.
//!
//! Every write runs the same pipeline: allow-list the payload, validate all
//! fields, probe code uniqueness, then touch the repository. A failure at any
//! step returns before the write.

pub mod product;
pub mod seller;
pub mod warehouse;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::debug;

use maestro_core::validation::{guard_fillable, required_string, Payload};
use maestro_core::{FieldErrors, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Parses a route id. Ids that cannot name a row are reported as missing.
pub(crate) fn parse_id(raw: &str, resource: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::not_found(resource, raw))
}

/// Reduces a payload to the resource's fillable fields.
pub(crate) fn fillable(payload: &Payload, allowed: &[&str], resource: &str) -> Payload {
    let (kept, dropped) = guard_fillable(payload, allowed);
    if !dropped.is_empty() {
        debug!(resource, ?dropped, "Dropped non-fillable fields");
    }
    kept
}

/// The submitted `codigo`, when it passes its own rules.
pub(crate) fn submitted_code(payload: &Payload, max: usize) -> Option<String> {
    required_string(payload, "codigo", Some(max)).ok()
}

/// Merges field validation with the uniqueness probe.
///
/// Every failing field is reported together, the duplicate code included.
pub(crate) fn validated<T>(
    result: Result<T, FieldErrors>,
    duplicate: Option<ValidationError>,
) -> ApiResult<T> {
    match (result, duplicate) {
        (Ok(fields), None) => Ok(fields),
        (Ok(_), Some(dup)) => Err(ApiError::validation(FieldErrors::from(dup))),
        (Err(mut errors), dup) => {
            if let Some(dup) = dup {
                errors.add(dup);
            }
            Err(ApiError::validation(errors))
        }
    }
}

/// `GET /health`: process and database liveness.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.database {
        Some(db) if db.health_check().await => "ok",
        Some(_) => "unavailable",
        None => "memory",
    };

    let status = if database == "unavailable" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(json!({
            "status": if status.is_success() { "ok" } else { "degraded" },
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================

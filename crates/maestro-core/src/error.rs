//! # Error Types
//!
//! Domain-specific error types for maestro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  maestro-core errors (this file)                                       │
//! │  ├── CoreError        - Page state machine misuse                      │
//! │  ├── ValidationError  - One rule failed on one field                   │
//! │  └── FieldErrors      - Every failed rule, keyed by field              │
//! │                                                                         │
//! │  maestro-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  maestro-admin errors (in app)                                         │
//! │  └── ApiError         - What the client page sees (JSON)               │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → ApiError (422) → Client form    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A page state machine received an action its current state forbids.
    ///
    /// ## When This Occurs
    /// - Submitting a form dialog that is not open
    /// - Confirming a delete that was never requested
    #[error("cannot {action} while {state}")]
    InvalidTransition { state: String, action: String },
}

impl CoreError {
    /// Creates an InvalidTransition error.
    pub fn invalid_transition(state: impl Into<String>, action: impl Into<String>) -> Self {
        CoreError::InvalidTransition {
            state: state.into(),
            action: action.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single failed validation rule.
///
/// The `field` is always the wire name of the input (`codigo`, `precio_neto`,
/// ...), so messages can be shown next to the matching form control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, null or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field must be a string.
    #[error("{field} must be a string")]
    NotString { field: String },

    /// Field value is too long (in characters).
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field must be a boolean (`true`, `false`, `1`, `0`, `"1"`, `"0"`).
    #[error("{field} must be true or false")]
    NotBoolean { field: String },

    /// Field must be a number or a numeric string.
    #[error("{field} must be a number")]
    NotNumeric { field: String },

    /// Numeric value is below the allowed minimum.
    #[error("{field} must be at least {min}")]
    TooSmall { field: String, min: i64 },

    /// Invalid format (e.g. more decimals than the currency supports).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. a warehouse code already in use).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Returns the name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotString { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotBoolean { field }
            | ValidationError::NotNumeric { field }
            | ValidationError::TooSmall { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every failed rule of one submission, keyed by field name.
///
/// ## Serialization
/// ```json
/// { "codigo": ["codigo 'BP1' already exists"], "descripcion": ["descripcion is required"] }
/// ```
/// A `BTreeMap` keeps the keys in a stable order for clients and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records a failed rule under its field.
    pub fn add(&mut self, err: ValidationError) {
        let field = err.field().to_string();
        self.push(field, err.to_string());
    }

    /// Records a raw message under a field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Folds a rule result into the set, returning the value on success.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.add(err);
                None
            }
        }
    }

    /// Returns true if no rule failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields with at least one failure.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the field has at least one failure.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the messages recorded for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterates over `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the first message of the first failing field.
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(err);
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first_message(), self.len()) {
            (None, _) => write!(f, "The given data was invalid."),
            (Some(first), 1) => write!(f, "{}", first),
            (Some(first), n) => write!(f, "{} (and {} more errors)", first, n - 1),
        }
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "codigo".to_string(),
        };
        assert_eq!(err.to_string(), "codigo is required");

        let err = ValidationError::TooLong {
            field: "codigo".to_string(),
            max: 20,
        };
        assert_eq!(err.to_string(), "codigo must be at most 20 characters");
        assert_eq!(err.field(), "codigo");
    }

    #[test]
    fn test_field_errors_group_by_field() {
        let mut errors = FieldErrors::new();
        errors.add(ValidationError::Required {
            field: "descripcion".into(),
        });
        errors.add(ValidationError::Duplicate {
            field: "codigo".into(),
            value: "BP1".into(),
        });
        errors.push("codigo", "second message");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("codigo").unwrap().len(), 2);
        // BTreeMap ordering: "codigo" < "descripcion"
        assert_eq!(errors.first_message(), Some("codigo 'BP1' already exists"));
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors: FieldErrors = ValidationError::NotBoolean {
            field: "activo".into(),
        }
        .into();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["activo"][0], "activo must be true or false");
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = CoreError::invalid_transition("Idle", "submit");
        assert_eq!(err.to_string(), "cannot submit while Idle");
    }
}

//! # Validation Module
//!
//! Mass-assignment guard and per-entity input rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Client page                                                  │
//! │  └── Form controls, immediate feedback                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Admin handler                                                │
//! │  ├── guard_fillable: drop every key not in FILLABLE (id included)      │
//! │  ├── THIS MODULE: normalise + check every rule, collect all failures   │
//! │  └── code_taken probe (needs the repository, done by the handler)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE(code) closes the probe/insert race                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Input Normalisation
//! - Strings are trimmed; a blank string counts as missing
//! - Booleans accept `true`, `false`, `1`, `0`, `"1"`, `"0"`
//! - Numbers accept JSON numbers or numeric strings
//! - Lengths are counted in characters, not bytes
//!
//! ## Usage
//! ```rust
//! use maestro_core::validation::{guard_fillable, validate_warehouse};
//! use maestro_core::WarehouseFields;
//! use serde_json::json;
//!
//! let payload = json!({ "id": 9, "codigo": " BP1 ", "descripcion": "Principal" });
//! let (kept, dropped) = guard_fillable(payload.as_object().unwrap(), WarehouseFields::FILLABLE);
//! assert_eq!(dropped, vec!["id".to_string()]);
//!
//! let fields = validate_warehouse(&kept).unwrap();
//! assert_eq!(fields.code, "BP1");
//! assert!(!fields.ecommerce);
//! ```

use serde_json::{Map, Value};

use crate::error::{FieldErrors, ValidationError};
use crate::money::{Money, MoneyParseError};
use crate::types::{ProductFields, SellerFields, WarehouseFields};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A JSON form payload.
pub type Payload = Map<String, Value>;

// =============================================================================
// Mass-Assignment Guard
// =============================================================================

/// Reduces a payload to the allow-listed keys.
///
/// Returns the kept entries and the names of the dropped ones, so the caller
/// can log them. Dropping is silent towards the client: an edit form that
/// posts its own `id` is not an error.
pub fn guard_fillable(payload: &Payload, fillable: &[&str]) -> (Payload, Vec<String>) {
    let mut kept = Map::new();
    let mut dropped = Vec::new();

    for (key, value) in payload {
        if fillable.contains(&key.as_str()) {
            kept.insert(key.clone(), value.clone());
        } else {
            dropped.push(key.clone());
        }
    }

    (kept, dropped)
}

// =============================================================================
// Field Rules
// =============================================================================

/// Returns the value of a field unless it is missing, null or a blank string.
fn present<'a>(payload: &'a Payload, field: &str) -> Option<&'a Value> {
    match payload.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn string_rule(value: &Value, field: &str, max: Option<usize>) -> ValidationResult<String> {
    let s = match value {
        Value::String(s) => s.trim(),
        _ => {
            return Err(ValidationError::NotString {
                field: field.to_string(),
            })
        }
    };

    if let Some(max) = max {
        if s.chars().count() > max {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max,
            });
        }
    }

    Ok(s.to_string())
}

/// `required|string|max:N`
pub fn required_string(payload: &Payload, field: &str, max: Option<usize>) -> ValidationResult<String> {
    let value = present(payload, field).ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })?;
    string_rule(value, field, max)
}

/// `nullable|string|max:N`
pub fn optional_string(
    payload: &Payload,
    field: &str,
    max: Option<usize>,
) -> ValidationResult<Option<String>> {
    present(payload, field)
        .map(|value| string_rule(value, field, max))
        .transpose()
}

fn boolean_rule(value: &Value, field: &str) -> ValidationResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
        Value::String(s) if s.trim() == "1" => Ok(true),
        Value::String(s) if s.trim() == "0" => Ok(false),
        _ => Err(ValidationError::NotBoolean {
            field: field.to_string(),
        }),
    }
}

/// `required|boolean`
pub fn required_boolean(payload: &Payload, field: &str) -> ValidationResult<bool> {
    let value = present(payload, field).ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })?;
    boolean_rule(value, field)
}

/// `boolean`, absent meaning `false`.
pub fn optional_boolean(payload: &Payload, field: &str) -> ValidationResult<bool> {
    present(payload, field)
        .map(|value| boolean_rule(value, field))
        .transpose()
        .map(|b| b.unwrap_or(false))
}

/// `required|numeric|min:0` for a money amount.
pub fn required_price(payload: &Payload, field: &str) -> ValidationResult<Money> {
    let value = present(payload, field).ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })?;

    let parsed = match value {
        Value::Number(n) => Money::parse_non_negative(&n.to_string()),
        Value::String(s) => Money::parse_non_negative(s),
        _ => Err(MoneyParseError::NotNumeric),
    };

    parsed.map_err(|err| match err {
        MoneyParseError::NotNumeric => ValidationError::NotNumeric {
            field: field.to_string(),
        },
        MoneyParseError::Negative => ValidationError::TooSmall {
            field: field.to_string(),
            min: 0,
        },
        MoneyParseError::Overflow => ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: err.to_string(),
        },
    })
}

/// The error reported when a code is already used by another record.
pub fn duplicate_code(code: &str) -> ValidationError {
    ValidationError::Duplicate {
        field: "codigo".to_string(),
        value: code.to_string(),
    }
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a warehouse payload, reporting every failing field.
///
/// ## Rules
/// - `codigo`: required, string, max 20
/// - `descripcion`: required, string, max 150
/// - `direccion`: optional, string, max 255
/// - `bodega_ecommerce`: optional, boolean
///
/// Uniqueness of `codigo` needs the store; the handler checks it separately.
pub fn validate_warehouse(payload: &Payload) -> Result<WarehouseFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let code = errors.check(required_string(payload, "codigo", Some(WarehouseFields::CODE_MAX)));
    let description = errors.check(required_string(
        payload,
        "descripcion",
        Some(WarehouseFields::DESCRIPTION_MAX),
    ));
    let address = errors.check(optional_string(
        payload,
        "direccion",
        Some(WarehouseFields::ADDRESS_MAX),
    ));
    let ecommerce = errors.check(optional_boolean(payload, "bodega_ecommerce"));

    match (code, description, address, ecommerce) {
        (Some(code), Some(description), Some(address), Some(ecommerce)) if errors.is_empty() => {
            Ok(WarehouseFields {
                code,
                description,
                address,
                ecommerce,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a product payload, reporting every failing field.
///
/// ## Rules
/// - `codigo`: required, string, max 255
/// - `descripcion`: required, string, max 255
/// - `precio_neto`, `precio_bruto`: required, numeric, at least 0
/// - `activo`: required, boolean
pub fn validate_product(payload: &Payload) -> Result<ProductFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let code = errors.check(required_string(payload, "codigo", Some(ProductFields::CODE_MAX)));
    let description = errors.check(required_string(
        payload,
        "descripcion",
        Some(ProductFields::DESCRIPTION_MAX),
    ));
    let net_price = errors.check(required_price(payload, "precio_neto"));
    let gross_price = errors.check(required_price(payload, "precio_bruto"));
    let active = errors.check(required_boolean(payload, "activo"));

    match (code, description, net_price, gross_price, active) {
        (Some(code), Some(description), Some(net_price), Some(gross_price), Some(active))
            if errors.is_empty() =>
        {
            Ok(ProductFields {
                code,
                description,
                net_price,
                gross_price,
                active,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a seller payload, reporting every failing field.
///
/// ## Rules
/// - `descripcion`: required, string (no length cap)
/// - `usuario`, `sucursal`: required, string, max 255
pub fn validate_seller(payload: &Payload) -> Result<SellerFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let description = errors.check(required_string(payload, "descripcion", None));
    let username = errors.check(required_string(
        payload,
        "usuario",
        Some(SellerFields::USERNAME_MAX),
    ));
    let branch = errors.check(required_string(
        payload,
        "sucursal",
        Some(SellerFields::BRANCH_MAX),
    ));

    match (description, username, branch) {
        (Some(description), Some(username), Some(branch)) if errors.is_empty() => {
            Ok(SellerFields {
                description,
                username,
                branch,
            })
        }
        _ => Err(errors),
    }
}

// =============================================================================
// Search
// =============================================================================

/// Normalises a search term from the query string.
///
/// ## Rules
/// - Surrounding whitespace is removed
/// - Blank terms mean "no search"
/// - Everything else is kept as typed, whatever its length
pub fn normalize_search(raw: &str) -> Option<String> {
    let term = raw.trim();
    (!term.is_empty()).then(|| term.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_guard_fillable_drops_id_and_unknown_keys() {
        let payload = obj(json!({
            "id": 3,
            "codigo": "SKU1",
            "created_at": "now",
            "activo": true,
        }));
        let (kept, mut dropped) = guard_fillable(&payload, ProductFields::FILLABLE);
        dropped.sort();

        assert_eq!(kept.len(), 2);
        assert!(kept.contains_key("codigo"));
        assert_eq!(dropped, vec!["created_at".to_string(), "id".to_string()]);
    }

    #[test]
    fn test_warehouse_collects_all_errors() {
        let payload = obj(json!({
            "codigo": "X".repeat(21),
            "descripcion": "   ",
            "bodega_ecommerce": "yes",
        }));
        let errors = validate_warehouse(&payload).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get("codigo").unwrap()[0],
            "codigo must be at most 20 characters"
        );
        assert_eq!(errors.get("descripcion").unwrap()[0], "descripcion is required");
        assert!(errors.contains("bodega_ecommerce"));
    }

    #[test]
    fn test_warehouse_blank_address_is_null() {
        let payload = obj(json!({
            "codigo": "BP1",
            "descripcion": "Bodega Principal",
            "direccion": "",
            "bodega_ecommerce": 1,
        }));
        let fields = validate_warehouse(&payload).unwrap();
        assert_eq!(fields.address, None);
        assert!(fields.ecommerce);
    }

    #[test]
    fn test_length_counts_characters() {
        // 20 multi-byte characters fit a 20-character code.
        let payload = obj(json!({ "codigo": "ñ".repeat(20), "descripcion": "Bodega" }));
        assert!(validate_warehouse(&payload).is_ok());
    }

    #[test]
    fn test_product_accepts_numeric_strings_and_numbers() {
        let payload = obj(json!({
            "codigo": "SKU1",
            "descripcion": "Widget Azul",
            "precio_neto": "1000",
            "precio_bruto": 1190.5,
            "activo": "0",
        }));
        let fields = validate_product(&payload).unwrap();
        assert_eq!(fields.net_price.cents(), 100_000);
        assert_eq!(fields.gross_price.cents(), 119_050);
        assert!(!fields.active);
    }

    #[test]
    fn test_product_price_rules() {
        let payload = obj(json!({
            "codigo": "SKU1",
            "descripcion": "Widget",
            "precio_neto": -1,
            "precio_bruto": "abc",
        }));
        let errors = validate_product(&payload).unwrap_err();

        assert_eq!(errors.get("precio_neto").unwrap()[0], "precio_neto must be at least 0");
        assert_eq!(errors.get("precio_bruto").unwrap()[0], "precio_bruto must be a number");
        assert_eq!(errors.get("activo").unwrap()[0], "activo is required");
    }

    #[test]
    fn test_product_prices_round_to_hundredths() {
        let payload = obj(json!({
            "codigo": "SKU1",
            "descripcion": "Widget",
            "precio_neto": "1.555",
            "precio_bruto": 1.555e0,
            "activo": true,
        }));
        let fields = validate_product(&payload).unwrap();
        assert_eq!(fields.net_price.cents(), 156);
        assert_eq!(fields.gross_price, fields.net_price);

        let payload = obj(json!({
            "codigo": "SKU1",
            "descripcion": "Widget",
            "precio_neto": 0.1 + 0.2,
            "precio_bruto": "-0.004",
            "activo": true,
        }));
        let errors = validate_product(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("precio_bruto").unwrap()[0], "precio_bruto must be at least 0");
    }

    #[test]
    fn test_seller_requires_strings() {
        let payload = obj(json!({ "descripcion": 42, "usuario": "jperez" }));
        let errors = validate_seller(&payload).unwrap_err();

        assert_eq!(errors.get("descripcion").unwrap()[0], "descripcion must be a string");
        assert_eq!(errors.get("sucursal").unwrap()[0], "sucursal is required");
        assert!(!errors.contains("usuario"));
    }

    #[test]
    fn test_seller_description_unbounded() {
        let payload = obj(json!({
            "descripcion": "d".repeat(5000),
            "usuario": "jperez",
            "sucursal": "Centro",
        }));
        assert!(validate_seller(&payload).is_ok());
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  AZUL "), Some("AZUL".to_string()));
        assert_eq!(normalize_search("   "), None);

        let long = format!("{} azul", "a".repeat(150));
        assert_eq!(normalize_search(&long), Some(long.clone()));
    }
}

//! Entity models and document validation.
//!
//! Documents flow through the keyed collection store as raw JSON. Every
//! repository revalidates them field by field on read and write — presence,
//! type, enum membership, and cross-field invariants — and reports failures
//! as [`ValidationError`]s tagged with the offending field. Nothing is ever
//! silently coerced.
//!
//! The wire format is camelCase JSON (`userId`, `progressSeconds`, ...),
//! matching the documents the hosted document store holds.

pub mod content;
pub mod progress;
pub mod request;
pub mod saved;
pub mod user;

pub use content::Content;
pub use progress::ContentProgress;
pub use request::{NewServiceRequest, ServiceRequest};
pub use saved::SavedContent;
pub use user::{ParentalConsent, PrivacyErasureRequest, User};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// The payload must be a JSON object.
pub(crate) fn require_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::new("<document>", "JSON object"))
}

/// Required non-empty string field.
pub(crate) fn required_str(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<String, ValidationError> {
    match fields.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_owned()),
        _ => Err(ValidationError::new(key, "non-empty string")),
    }
}

/// Optional string field; `null` and absent both mean "not provided".
pub(crate) fn optional_str(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(key, "string when provided")),
    }
}

/// Required finite number field.
pub(crate) fn required_number(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<f64, ValidationError> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::new(key, "finite number"))
}

/// Optional finite number field.
pub(crate) fn optional_number(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<f64>, ValidationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| ValidationError::new(key, "finite number when provided")),
    }
}

/// Optional boolean field.
pub(crate) fn optional_bool(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<bool>, ValidationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::new(key, "boolean when provided")),
    }
}

/// Optional array-of-strings field.
pub(crate) fn optional_str_array(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, ValidationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| ValidationError::new(key, "array of strings when provided"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(ValidationError::new(key, "array of strings when provided")),
    }
}

/// Required enum field, deserialized through serde so wire names stay in one
/// place. `variants` feeds the error message.
pub(crate) fn required_enum<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    key: &str,
    variants: &[&str],
) -> Result<T, ValidationError> {
    let value = fields
        .get(key)
        .ok_or_else(|| ValidationError::new(key, format!("one of: {}", variants.join(", "))))?;
    serde_json::from_value(value.clone())
        .map_err(|_| ValidationError::new(key, format!("one of: {}", variants.join(", "))))
}

/// Required RFC 3339 timestamp field.
pub(crate) fn required_datetime(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    let raw = required_str(fields, key)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::new(key, "RFC 3339 timestamp"))
}

/// Optional RFC 3339 timestamp field.
pub(crate) fn optional_datetime(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match optional_str(fields, key)? {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| ValidationError::new(key, "RFC 3339 timestamp when provided")),
    }
}

/// Serialize an entity back into a store document.
///
/// Entities are JSON-safe by construction (validated fields, no NaN, string
/// map keys), so serialization cannot fail in practice.
pub(crate) fn to_value<T: Serialize>(entity: &T) -> Value {
    serde_json::to_value(entity).unwrap_or(Value::Null)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_required_str_rejects_blank() {
        let f = fields(json!({"title": "   "}));
        let err = required_str(&f, "title").unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn test_optional_str_treats_null_as_absent() {
        let f = fields(json!({"phone": null}));
        assert_eq!(optional_str(&f, "phone").unwrap(), None);
        assert_eq!(optional_str(&f, "missing").unwrap(), None);
    }

    #[test]
    fn test_required_number_rejects_non_finite() {
        let f = fields(json!({"progressSeconds": "30"}));
        assert!(required_number(&f, "progressSeconds").is_err());
    }

    #[test]
    fn test_required_enum_reports_allowed_values() {
        use crate::taxonomy::Category;

        let f = fields(json!({"category": "cooking"}));
        let err = required_enum::<Category>(&f, "category", Category::VARIANTS).unwrap_err();
        assert!(err.expected.contains("cook"));
        assert!(err.expected.contains("family"));
    }

    #[test]
    fn test_required_datetime_parses_rfc3339() {
        let f = fields(json!({"createdAt": "2025-01-02T00:00:00Z"}));
        let dt = required_datetime(&f, "createdAt").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-01-02T00:00:00+00:00");

        let bad = fields(json!({"createdAt": "yesterday"}));
        assert!(required_datetime(&bad, "createdAt").is_err());
    }

    #[test]
    fn test_optional_str_array() {
        let f = fields(json!({"tags": ["a", "b"]}));
        assert_eq!(
            optional_str_array(&f, "tags").unwrap(),
            Some(vec!["a".to_owned(), "b".to_owned()])
        );

        let bad = fields(json!({"tags": ["a", 3]}));
        assert!(optional_str_array(&bad, "tags").is_err());
    }
}

//! Field validators and payload validation.
//!
//! Every validator treats an absent value and an explicit `null` the same way: as "not
//! provided", which always passes. This is what lets an update carry only the fields it
//! changes.

use crate::{
    error::ValidationError,
    model::{self, FieldKind},
};

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// The only accepted timestamp layout, e.g. `2024-01-01T00:00:00.000Z`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn provided(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

/// Checks that `value` is a string of at most `max_length` characters.
pub fn validate_string(
    value: Option<&Value>,
    field: &str,
    max_length: Option<usize>,
) -> Result<(), ValidationError> {
    let Some(value) = provided(value) else {
        return Ok(());
    };
    let text = value
        .as_str()
        .ok_or_else(|| ValidationError::new(field, "must be a string"))?;
    match max_length {
        Some(max_length) if text.chars().count() > max_length => Err(ValidationError::new(
            field,
            format!("must be no longer than {max_length} characters"),
        )),
        _ => Ok(()),
    }
}

/// Checks that `value` is a timestamp in exactly the [`DATE_FORMAT`] layout.
///
/// Looser ISO-8601 spellings (no milliseconds, offsets, single digit months) are rejected.
pub fn validate_date(value: Option<&Value>, field: &str) -> Result<(), ValidationError> {
    let Some(value) = provided(value) else {
        return Ok(());
    };
    let invalid = || {
        ValidationError::new(
            field,
            "must be a valid ISO 8601 date (YYYY-MM-DDTHH:MM:SS.mmmZ)",
        )
    };
    let text = value.as_str().ok_or_else(invalid)?;
    let parsed = NaiveDateTime::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())?;
    // the parser tolerates unpadded numbers, the canonical rendering does not
    if parsed.format(DATE_FORMAT).to_string() != text {
        return Err(invalid());
    }
    Ok(())
}

fn is_string_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

/// Checks that `value` is a list whose elements are all strings.
pub fn validate_list_of_strings(value: Option<&Value>, field: &str) -> Result<(), ValidationError> {
    match provided(value) {
        Some(value) if !is_string_list(value) => {
            Err(ValidationError::new(field, "must be a list of strings"))
        }
        _ => Ok(()),
    }
}

/// Checks that `value` is a boolean.
pub fn validate_boolean(value: Option<&Value>, field: &str) -> Result<(), ValidationError> {
    match provided(value) {
        Some(value) if !value.is_boolean() => {
            Err(ValidationError::new(field, "must be a boolean"))
        }
        _ => Ok(()),
    }
}

/// Checks that `value` is a key-value mapping.
pub fn validate_object(value: Option<&Value>, field: &str) -> Result<(), ValidationError> {
    match provided(value) {
        Some(value) if !value.is_object() => {
            Err(ValidationError::new(field, "must be a valid JSON object"))
        }
        _ => Ok(()),
    }
}

/// Runs the validator matching `kind`.
pub fn validate_field(
    value: Option<&Value>,
    field: &str,
    kind: FieldKind,
) -> Result<(), ValidationError> {
    match kind {
        FieldKind::Text { max_length } => validate_string(value, field, max_length),
        FieldKind::Date => validate_date(value, field),
        FieldKind::Boolean => validate_boolean(value, field),
        FieldKind::StringList => validate_list_of_strings(value, field),
        FieldKind::Object => validate_object(value, field),
        FieldKind::StringListOrObject => validate_list_of_strings(value, field)
            .or_else(|_| validate_object(value, field))
            .map_err(|_| ValidationError::new(field, "must be a list of strings or a JSON object")),
    }
}

/// Validates a complete record about to be created.
///
/// Every schema field is checked. `id` and keys outside the schema are not inspected;
/// the caller drops them.
pub fn validate_new_post(document: &Map<String, Value>) -> Result<(), ValidationError> {
    for (field, kind) in model::FIELDS {
        validate_field(document.get(*field), field, *kind)?;
    }
    Ok(())
}

/// Validates the fields of a partial update.
///
/// Only the fields present are checked. `id` and keys outside the schema are refused.
pub fn validate_update(document: &Map<String, Value>) -> Result<(), ValidationError> {
    for (field, value) in document {
        if field == crate::common::key::PARTITION_KEY {
            return Err(ValidationError::new(field, "cannot be modified"));
        }
        let kind = model::field_kind(field)
            .ok_or_else(|| ValidationError::new(field, "is not a blog post field"))?;
        validate_field(Some(value), field, kind)?;
    }
    Ok(())
}

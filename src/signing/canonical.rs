//! Canonical message construction
//!
//! The canonical message is the exact byte sequence a signature covers. It is
//! derived from the operation's declared signable fields only: the record's
//! own key order never matters, and no field is ever filled with a
//! placeholder.

use crate::error::{ConfigError, ProviderError, Result};
use crate::operations::{OperationSpec, Render, SignableField};
use crate::signing::ParameterRecord;
use serde_json::Value;

/// Separator between top-level signable fields
pub const FIELD_SEPARATOR: char = ',';

/// Separator between the sub-fields of a nested object
pub const NESTED_SEPARATOR: char = ':';

/// Renders the canonical message of `params` for `spec`
///
/// # Errors
/// * `Configuration(MissingSignableField)` - a declared field is absent or null
/// * `Configuration(UnrenderableField)` - a value has no declared rendering
/// * `Validation` - a rendered value contains a separator
pub fn canonicalize(spec: &OperationSpec, params: &ParameterRecord) -> Result<String> {
    let mut parts = Vec::with_capacity(spec.signable.len());

    for field in spec.signable {
        let value = lookup(spec, params, field.name)?;
        let rendered = render_field(spec, field, value)?;
        if rendered.contains(FIELD_SEPARATOR) && !matches!(field.render, Render::Nested(_)) {
            return Err(ambiguous(field.name, FIELD_SEPARATOR));
        }
        parts.push(rendered);
    }

    Ok(parts.join(&FIELD_SEPARATOR.to_string()))
}

fn lookup<'a>(
    spec: &OperationSpec,
    params: &'a serde_json::Map<String, Value>,
    name: &str,
) -> Result<&'a Value> {
    match params.get(name) {
        Some(Value::Null) | None => Err(ConfigError::MissingSignableField {
            operation: spec.name,
            field: name.to_string(),
        }
        .into()),
        Some(value) => Ok(value),
    }
}

fn render_field(spec: &OperationSpec, field: &SignableField, value: &Value) -> Result<String> {
    match field.render {
        Render::Verbatim => render_scalar(value)
            .ok_or_else(|| unrenderable(spec, field.name, value, "expected a scalar")),
        Render::Upper => match value {
            Value::String(s) => Ok(s.to_uppercase()),
            other => Err(unrenderable(spec, field.name, other, "expected a string")),
        },
        Render::Nested(sub_fields) => {
            let object = value
                .as_object()
                .ok_or_else(|| unrenderable(spec, field.name, value, "expected an object"))?;

            let mut parts = Vec::with_capacity(sub_fields.len());
            for sub in sub_fields {
                let path = format!("{}.{}", field.name, sub.name);
                let sub_value = match object.get(sub.name) {
                    Some(Value::Null) | None => {
                        return Err(ConfigError::MissingSignableField {
                            operation: spec.name,
                            field: path,
                        }
                        .into())
                    }
                    Some(v) => v,
                };
                let rendered = render_scalar(sub_value)
                    .ok_or_else(|| unrenderable(spec, &path, sub_value, "expected a scalar"))?;
                if let Some(sep) = [FIELD_SEPARATOR, NESTED_SEPARATOR]
                    .into_iter()
                    .find(|sep| rendered.contains(*sep))
                {
                    return Err(ambiguous(&path, sep));
                }
                parts.push(rendered);
            }

            Ok(parts.join(&NESTED_SEPARATOR.to_string()))
        }
    }
}

/// Fixed textual form of a scalar JSON value
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn unrenderable(spec: &OperationSpec, field: &str, value: &Value, reason: &str) -> ProviderError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ConfigError::UnrenderableField {
        operation: spec.name,
        field: field.to_string(),
        reason: format!("{}, got {}", reason, kind),
    }
    .into()
}

fn ambiguous(field: &str, sep: char) -> ProviderError {
    ProviderError::Validation(format!(
        "field '{}' must not contain '{}'",
        field, sep
    ))
}

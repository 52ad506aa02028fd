// ABOUTME: Structural validation of tool arguments against a JSON Schema
// ABOUTME: subset, reporting the offending field path on mismatch.

use serde_json::Value;

use crate::error::ToolError;

/// Validate `args` against `schema`, a JSON Schema object of the shape
/// tools declare: `type`, `properties`, `required`, `items`, `enum`.
///
/// Returns a validated clone of the arguments so callers hand executors
/// exactly what passed the check. Errors carry the dotted path of the
/// offending field (`profile.email`, `tags[1]`).
pub fn validate(schema: &Value, args: &Value) -> Result<Value, ToolError> {
    check(schema, args, "")?;
    Ok(args.clone())
}

fn check(schema: &Value, value: &Value, path: &str) -> Result<(), ToolError> {
    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            return Err(fail(
                path,
                format!(
                    "expected one of {}, got {}",
                    serde_json::to_string(allowed).unwrap_or_default(),
                    value
                ),
            ));
        }
    }

    let Some(ty) = schema.get("type").and_then(Value::as_str) else {
        return Ok(());
    };

    match ty {
        "object" => {
            let Some(obj) = value.as_object() else {
                return Err(fail(path, format!("expected object, got {}", kind_of(value))));
            };

            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for field in required.iter().filter_map(Value::as_str) {
                    if !obj.contains_key(field) {
                        return Err(fail(&join(path, field), "missing required field".into()));
                    }
                }
            }

            if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                for (field, sub) in props {
                    if let Some(v) = obj.get(field) {
                        check(sub, v, &join(path, field))?;
                    }
                }
            }
        }
        "array" => {
            let Some(items) = value.as_array() else {
                return Err(fail(path, format!("expected array, got {}", kind_of(value))));
            };
            if let Some(item_schema) = schema.get("items") {
                for (i, v) in items.iter().enumerate() {
                    check(item_schema, v, &format!("{}[{}]", display_path(path), i))?;
                }
            }
        }
        "string" => {
            if !value.is_string() {
                return Err(fail(path, format!("expected string, got {}", kind_of(value))));
            }
        }
        "integer" => {
            if !value.is_i64() && !value.is_u64() {
                return Err(fail(path, format!("expected integer, got {}", kind_of(value))));
            }
        }
        "number" => {
            if !value.is_number() {
                return Err(fail(path, format!("expected number, got {}", kind_of(value))));
            }
        }
        "boolean" => {
            if !value.is_boolean() {
                return Err(fail(path, format!("expected boolean, got {}", kind_of(value))));
            }
        }
        // Unknown type keyword: accept rather than reject.
        _ => {}
    }

    Ok(())
}

fn fail(path: &str, message: String) -> ToolError {
    ToolError::Validation {
        path: display_path(path).to_string(),
        message,
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "arguments" } else { path }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

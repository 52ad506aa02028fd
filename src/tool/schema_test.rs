// ABOUTME: Tests for structural argument validation - required fields,
// ABOUTME: primitive types, nesting, enums, and field paths.

use serde_json::json;

use super::schema::validate;
use crate::error::ToolError;

fn path_of(err: ToolError) -> String {
    match err {
        ToolError::Validation { path, .. } => path,
        other => panic!("expected validation error, got {}", other),
    }
}

#[test]
fn test_accepts_matching_object() {
    let schema = json!({
        "type": "object",
        "properties": {
            "email": { "type": "string" },
            "count": { "type": "integer" }
        },
        "required": ["email"]
    });

    let args = json!({"email": "a@b.com", "count": 3});
    assert_eq!(validate(&schema, &args).unwrap(), args);
}

#[test]
fn test_missing_required_field() {
    let schema = json!({
        "type": "object",
        "properties": { "email": { "type": "string" } },
        "required": ["email"]
    });

    let err = validate(&schema, &json!({})).unwrap_err();
    assert_eq!(path_of(err), "email");
}

#[test]
fn test_wrong_primitive_type() {
    let schema = json!({
        "type": "object",
        "properties": { "email": { "type": "string" } },
        "required": ["email"]
    });

    let err = validate(&schema, &json!({"email": 42})).unwrap_err();
    match err {
        ToolError::Validation { path, message } => {
            assert_eq!(path, "email");
            assert!(message.contains("expected string"));
            assert!(message.contains("number"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_nested_field_path() {
    let schema = json!({
        "type": "object",
        "properties": {
            "profile": {
                "type": "object",
                "properties": { "email": { "type": "string" } },
                "required": ["email"]
            }
        },
        "required": ["profile"]
    });

    let err = validate(&schema, &json!({"profile": {"email": false}})).unwrap_err();
    assert_eq!(path_of(err), "profile.email");
}

#[test]
fn test_array_item_path() {
    let schema = json!({
        "type": "object",
        "properties": {
            "tags": {
                "type": "array",
                "items": { "type": "string" }
            }
        }
    });

    let err = validate(&schema, &json!({"tags": ["ok", 7]})).unwrap_err();
    assert_eq!(path_of(err), "tags[1]");
}

#[test]
fn test_enum_mismatch() {
    let schema = json!({
        "type": "object",
        "properties": {
            "type": { "type": "string", "enum": ["delayed", "cron"] }
        },
        "required": ["type"]
    });

    assert!(validate(&schema, &json!({"type": "delayed"})).is_ok());

    let err = validate(&schema, &json!({"type": "weekly"})).unwrap_err();
    assert_eq!(path_of(err), "type");
}

#[test]
fn test_non_object_root() {
    let schema = json!({"type": "object", "properties": {}});
    let err = validate(&schema, &json!("just a string")).unwrap_err();
    assert_eq!(path_of(err), "arguments");
}

#[test]
fn test_untyped_property_accepts_anything() {
    let schema = json!({
        "type": "object",
        "properties": {
            "when": { "description": "date, seconds, or cron string" }
        }
    });

    assert!(validate(&schema, &json!({"when": "tomorrow"})).is_ok());
    assert!(validate(&schema, &json!({"when": 30})).is_ok());
}

#[test]
fn test_optional_fields_may_be_absent() {
    let schema = json!({
        "type": "object",
        "properties": {
            "email": { "type": "string" },
            "first_name": { "type": "string" }
        },
        "required": ["email"]
    });

    assert!(validate(&schema, &json!({"email": "a@b.com"})).is_ok());
}

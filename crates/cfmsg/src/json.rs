// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON view of messages.
//!
//! Objects map field names to values. Arrays, `uint8[]` included, are JSON
//! arrays; `bytes` fields are arrays of numbers. Non-finite floats become
//! `null`, and `null` reads back into a float field as NaN.

use crate::message::{Message, MessageError};
use crate::schema::{FieldKind, FieldType, Schema};
use crate::value::Value;
use serde_json::{Map, Number, Value as Json};
use std::fmt;
use std::sync::Arc;

/// JSON conversion error.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonError {
    /// Expected a JSON object for a message.
    NotAnObject { type_name: String },
    /// The object names a field the schema does not have.
    UnknownField { type_name: String, field: String },
    /// A JSON value does not fit the field type.
    InvalidValue { field: String, expected: String },
    /// The converted value was rejected by the message.
    Message(MessageError),
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { type_name } => {
                write!(f, "expected a JSON object for {}", type_name)
            }
            Self::UnknownField { type_name, field } => {
                write!(f, "{} has no field '{}'", type_name, field)
            }
            Self::InvalidValue { field, expected } => {
                write!(f, "field '{}': expected {}", field, expected)
            }
            Self::Message(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Message(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MessageError> for JsonError {
    fn from(e: MessageError) -> Self {
        Self::Message(e)
    }
}

/// Render a message as a JSON object.
///
/// Unset fields show their default; required fields that are unset are
/// omitted.
pub fn to_json(message: &Message) -> Json {
    let mut object = Map::new();
    for field in message.schema().fields() {
        if let Ok(value) = message.get_value(field.name()) {
            object.insert(field.name().to_string(), value_to_json(value));
        }
    }
    Json::Object(object)
}

/// Render a single value.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Bool(v) => Json::Bool(*v),
        Value::I8(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::U8(v) => Json::from(*v),
        Value::U16(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        Value::F32(v) => float(f64::from(*v)),
        Value::F64(v) => float(*v),
        Value::String(s) => Json::String(s.clone()),
        Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Message(msg) => to_json(msg),
    }
}

fn float(v: f64) -> Json {
    Number::from_f64(v).map_or(Json::Null, Json::Number)
}

/// Build a message of type `schema` from a JSON object.
///
/// Fields absent from the object stay unset, so encoding falls back to
/// their defaults.
pub fn from_json(schema: &Arc<Schema>, json: &Json) -> Result<Message, JsonError> {
    let object = json.as_object().ok_or_else(|| JsonError::NotAnObject {
        type_name: schema.name().to_string(),
    })?;

    let mut message = Message::new(schema);
    for (key, item) in object {
        let field = schema.field(key).ok_or_else(|| JsonError::UnknownField {
            type_name: schema.name().to_string(),
            field: key.clone(),
        })?;
        let value = typed_from_json(key, field.field_type(), item)?;
        message.set(key, value)?;
    }
    Ok(message)
}

fn typed_from_json(field: &str, ty: &FieldType, json: &Json) -> Result<Value, JsonError> {
    if !ty.is_array() {
        return element_from_json(field, ty.kind(), json);
    }
    let items = json.as_array().ok_or_else(|| invalid(field, ty.to_string()))?;
    let values = items
        .iter()
        .map(|item| element_from_json(field, ty.kind(), item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(values))
}

fn element_from_json(field: &str, kind: &FieldKind, json: &Json) -> Result<Value, JsonError> {
    let expected = || invalid(field, kind.type_name().to_string());
    let value = match kind {
        FieldKind::Bool => Value::Bool(json.as_bool().ok_or_else(expected)?),
        FieldKind::I8 => Value::I8(signed(json).ok_or_else(expected)?),
        FieldKind::I16 => Value::I16(signed(json).ok_or_else(expected)?),
        FieldKind::I32 => Value::I32(signed(json).ok_or_else(expected)?),
        FieldKind::I64 => Value::I64(json.as_i64().ok_or_else(expected)?),
        FieldKind::U8 => Value::U8(unsigned(json).ok_or_else(expected)?),
        FieldKind::U16 => Value::U16(unsigned(json).ok_or_else(expected)?),
        FieldKind::U32 => Value::U32(unsigned(json).ok_or_else(expected)?),
        FieldKind::U64 => Value::U64(json.as_u64().ok_or_else(expected)?),
        FieldKind::F32 => Value::F32(float_from_json(json).ok_or_else(expected)? as f32),
        FieldKind::F64 => Value::F64(float_from_json(json).ok_or_else(expected)?),
        FieldKind::String => Value::String(json.as_str().ok_or_else(expected)?.to_string()),
        FieldKind::Bytes => {
            let items = json.as_array().ok_or_else(expected)?;
            let bytes = items
                .iter()
                .map(unsigned::<u8>)
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(expected)?;
            Value::Bytes(bytes)
        }
        FieldKind::Message(schema) => Value::Message(from_json(schema, json)?),
    };
    Ok(value)
}

fn float_from_json(json: &Json) -> Option<f64> {
    match json {
        Json::Null => Some(f64::NAN),
        other => other.as_f64(),
    }
}

fn signed<T: TryFrom<i64>>(json: &Json) -> Option<T> {
    json.as_i64().and_then(|v| T::try_from(v).ok())
}

fn unsigned<T: TryFrom<u64>>(json: &Json) -> Option<T> {
    json.as_u64().and_then(|v| T::try_from(v).ok())
}

fn invalid(field: &str, expected: String) -> JsonError {
    JsonError::InvalidValue {
        field: field.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::schema::SchemaBuilder;
    use serde_json::json;

    fn point() -> Arc<Schema> {
        Arc::new(
            SchemaBuilder::new("geometry_msgs/Point")
                .field("x", FieldKind::F64)
                .field("y", FieldKind::F64)
                .field("z", FieldKind::F64)
                .build()
                .expect("point"),
        )
    }

    fn goal() -> Arc<Schema> {
        Arc::new(
            SchemaBuilder::new("test/Goal")
                .field("group", FieldKind::U8)
                .nested_field("goal", point())
                .field_with_default("yaw", FieldKind::F32, 0.5f32)
                .array_field("mask", FieldKind::U8, 2)
                .field("blob", FieldKind::Bytes)
                .build()
                .expect("goal"),
        )
    }

    #[test]
    fn test_from_json_then_encode() {
        let schema = goal();
        let msg = from_json(
            &schema,
            &json!({
                "group": 3,
                "goal": {"x": 1.0, "y": 2.0, "z": 3.0},
                "mask": [1, 2],
                "blob": [255, 0]
            }),
        )
        .expect("from_json");

        assert!(!msg.contains("yaw"));
        let bytes = codec::encode(&msg, &schema).expect("encode");
        let back = codec::decode(&bytes, &schema).expect("decode");
        assert_eq!(back.get::<f32>("yaw").expect("yaw"), 0.5);
        assert_eq!(back.get::<Vec<u8>>("blob").expect("blob"), vec![255, 0]);
    }

    #[test]
    fn test_to_json_shows_defaults() {
        let schema = goal();
        let msg = Message::zeroed(&schema).with("group", 7u8).expect("set");
        let out = to_json(&msg);
        assert_eq!(out["group"], json!(7));
        assert_eq!(out["goal"], json!({"x": 0.0, "y": 0.0, "z": 0.0}));
        assert_eq!(out["mask"], json!([0, 0]));
        assert_eq!(out["blob"], json!([]));
    }

    #[test]
    fn test_unknown_field() {
        let err = from_json(&goal(), &json!({"speed": 1})).unwrap_err();
        assert!(matches!(err, JsonError::UnknownField { ref field, .. } if field == "speed"));
    }

    #[test]
    fn test_out_of_range_integer() {
        let err = from_json(&goal(), &json!({"group": 256})).unwrap_err();
        assert!(matches!(err, JsonError::InvalidValue { ref field, .. } if field == "group"));
    }

    #[test]
    fn test_fixed_array_length_checked() {
        let err = from_json(&goal(), &json!({"mask": [1, 2, 3]})).unwrap_err();
        assert!(matches!(err, JsonError::Message(MessageError::TypeMismatch { .. })));
    }

    #[test]
    fn test_not_an_object() {
        let err = from_json(&goal(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, JsonError::NotAnObject { .. }));
    }

    #[test]
    fn test_nan_renders_null() {
        assert_eq!(value_to_json(&Value::F64(f64::NAN)), Json::Null);
    }

    #[test]
    fn test_null_reads_back_as_nan() {
        let schema = goal();
        let msg = Message::zeroed(&schema)
            .with("yaw", f32::NAN)
            .and_then(|m| m.with("goal", Message::zeroed(&point()).with("x", f64::INFINITY)?))
            .expect("set");
        let out = to_json(&msg);
        assert_eq!(out["yaw"], Json::Null);
        assert_eq!(out["goal"]["x"], Json::Null);

        let back = from_json(&schema, &out).expect("from_json");
        assert!(back.get::<f32>("yaw").expect("yaw").is_nan());
        let goal = back.get::<Message>("goal").expect("goal");
        assert!(goal.get::<f64>("x").expect("x").is_nan());
        assert_eq!(goal.get::<f64>("y"), Ok(0.0));

        let err = from_json(&schema, &json!({"group": null})).unwrap_err();
        assert!(matches!(err, JsonError::InvalidValue { ref field, .. } if field == "group"));
    }
}

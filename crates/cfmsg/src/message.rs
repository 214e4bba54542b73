// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message container: a schema reference plus the values set on it.

use crate::schema::{FieldDescriptor, FieldKind, Schema};
use crate::value::{FromValue, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Errors for Message operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageError {
    /// The schema does not declare the field.
    UnknownField { type_name: String, field: String },
    /// Value shape does not conform to the field type.
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },
    /// Field has neither a value nor a default.
    NotSet(String),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { type_name, field } => {
                write!(f, "Unknown field '{}' for type {}", field, type_name)
            }
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Type mismatch for field '{}': expected {}, got {}",
                field, expected, found
            ),
            Self::NotSet(field) => write!(f, "Field '{}' is not set", field),
        }
    }
}

impl std::error::Error for MessageError {}

/// Field values for one schema.
///
/// The field set is always a subset of the schema's fields and every stored
/// value conforms to its field type. Fields left unset fall back to their
/// default on encode.
///
/// Equality compares the effective value of every field: an unset field with
/// a default equals the same field explicitly set to that default.
#[derive(Debug, Clone)]
pub struct Message {
    schema: Arc<Schema>,
    values: HashMap<String, Value>,
}

impl Message {
    /// Create an empty message (no field set).
    pub fn new(schema: &Arc<Schema>) -> Self {
        Self {
            schema: schema.clone(),
            values: HashMap::new(),
        }
    }

    /// Create a message with every field set to its default, or to the zero
    /// value of its type when it has none.
    pub fn zeroed(schema: &Arc<Schema>) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|field| {
                let value = field
                    .default()
                    .cloned()
                    .unwrap_or_else(|| field.field_type().zero_value());
                (field.name().to_string(), value)
            })
            .collect();
        Self {
            schema: schema.clone(),
            values,
        }
    }

    /// Assemble a message from already-validated values (decoder output).
    pub(crate) fn from_values(schema: &Arc<Schema>, values: HashMap<String, Value>) -> Self {
        Self {
            schema: schema.clone(),
            values,
        }
    }

    /// Get the schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Set a field value.
    ///
    /// A `Value::Bytes` assigned to a `uint8` array field is stored as an
    /// array of `uint8` elements.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), MessageError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| MessageError::UnknownField {
                type_name: self.schema.name().to_string(),
                field: name.to_string(),
            })?;

        let mut value = value.into();
        if field.field_type().is_array() && *field.kind() == FieldKind::U8 {
            if let Value::Bytes(bytes) = value {
                value = Value::Array(bytes.into_iter().map(Value::U8).collect());
            }
        }

        if !field.field_type().accepts(&value) {
            return Err(MessageError::TypeMismatch {
                field: name.to_string(),
                expected: field.field_type().to_string(),
                found: value.kind_name(),
            });
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, MessageError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Get a typed field value, falling back to the field default.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, MessageError> {
        let value = self.get_value(name)?;
        T::from_value(value).ok_or_else(|| MessageError::TypeMismatch {
            field: name.to_string(),
            expected: T::KIND.to_string(),
            found: value.kind_name(),
        })
    }

    /// Get a field value, falling back to the field default.
    pub fn get_value(&self, name: &str) -> Result<&Value, MessageError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| MessageError::UnknownField {
                type_name: self.schema.name().to_string(),
                field: name.to_string(),
            })?;

        self.values
            .get(name)
            .or_else(|| field.default())
            .ok_or_else(|| MessageError::NotSet(name.to_string()))
    }

    /// Value explicitly set on this message (defaults not applied).
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// True if the field was explicitly set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Clear a field, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Set fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .iter()
            .filter_map(|f| self.values.get(f.name()).map(|v| (f.name(), v)))
    }

    /// Number of fields explicitly set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of required fields (no default) that are not set.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .filter(|f| f.is_required() && !self.values.contains_key(f.name()))
            .map(|f| f.name())
            .collect()
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema
            && self
                .schema
                .fields()
                .iter()
                .all(|field| effective(self, field) == effective(other, field))
    }
}

fn effective<'a>(message: &'a Message, field: &'a FieldDescriptor) -> Option<&'a Value> {
    message.values.get(field.name()).or_else(|| field.default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;

    fn takeoff() -> Arc<Schema> {
        Arc::new(
            SchemaBuilder::new("crazyflie_driver/TakeoffRequest")
                .field("groupMask", FieldKind::U8)
                .field("height", FieldKind::F32)
                .field_with_default("duration_ms", FieldKind::U32, 2000u32)
                .build()
                .expect("schema"),
        )
    }

    #[test]
    fn test_set_and_get() {
        let schema = takeoff();
        let mut msg = Message::new(&schema);
        msg.set("groupMask", 1u8).expect("set");
        msg.set("height", 0.5f32).expect("set");

        assert_eq!(msg.get::<u8>("groupMask"), Ok(1));
        assert_eq!(msg.get::<f32>("height"), Ok(0.5));
        assert_eq!(msg.len(), 2);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let schema = takeoff();
        let mut msg = Message::new(&schema);
        let err = msg.set("altitude", 1.0f32).unwrap_err();
        assert!(matches!(err, MessageError::UnknownField { .. }));
        assert!(msg.is_empty());
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let schema = takeoff();
        let mut msg = Message::new(&schema);
        let err = msg.set("height", 0.5f64).unwrap_err();
        assert_eq!(
            err,
            MessageError::TypeMismatch {
                field: "height".into(),
                expected: "float32".into(),
                found: "float64",
            }
        );
        assert!(msg.get::<u32>("height").is_err());
    }

    #[test]
    fn test_default_fallback() {
        let schema = takeoff();
        let msg = Message::new(&schema);
        assert_eq!(msg.get::<u32>("duration_ms"), Ok(2000));
        assert_eq!(msg.get::<u8>("groupMask"), Err(MessageError::NotSet("groupMask".into())));
        assert_eq!(msg.missing_fields(), vec!["groupMask", "height"]);
    }

    #[test]
    fn test_zeroed_fills_defaults() {
        let schema = takeoff();
        let msg = Message::zeroed(&schema);
        assert_eq!(msg.len(), 3);
        assert_eq!(msg.value("duration_ms"), Some(&Value::U32(2000)));
        assert_eq!(msg.value("height"), Some(&Value::F32(0.0)));
        assert!(msg.missing_fields().is_empty());
    }

    #[test]
    fn test_bytes_coerced_into_u8_array() {
        let schema = Arc::new(
            SchemaBuilder::new("crtpPacket")
                .field("size", FieldKind::U8)
                .array_field("data", FieldKind::U8, 3)
                .build()
                .expect("schema"),
        );
        let msg = Message::new(&schema)
            .with("data", Value::Bytes(vec![1, 2, 3]))
            .expect("set");
        assert_eq!(msg.get::<Vec<u8>>("data"), Ok(vec![1, 2, 3]));

        let err = Message::new(&schema).with("data", Value::Bytes(vec![1]));
        assert!(matches!(err, Err(MessageError::TypeMismatch { .. })));
    }

    #[test]
    fn test_equality_uses_effective_values() {
        let schema = takeoff();
        let sparse = Message::new(&schema)
            .with("groupMask", 1u8)
            .and_then(|m| m.with("height", 0.5f32))
            .expect("set");
        let explicit = sparse.clone().with("duration_ms", 2000u32).expect("set");
        assert_eq!(sparse, explicit);

        let other = sparse.clone().with("duration_ms", 1500u32).expect("set");
        assert_ne!(sparse, other);

        let unset_required = Message::new(&schema).with("groupMask", 1u8).expect("set");
        assert_ne!(sparse, unset_required);
    }

    #[test]
    fn test_fields_iterate_in_schema_order() {
        let schema = takeoff();
        let msg = Message::new(&schema)
            .with("height", 1.0f32)
            .and_then(|m| m.with("groupMask", 2u8))
            .expect("set");
        let names: Vec<_> = msg.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["groupMask", "height"]);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message schemas.
//!
//! A [`Schema`] is an ordered list of [`FieldDescriptor`]s under a unique type
//! name. Field order is wire-significant; the [`Signature`] hashes it so that
//! two peers can check layout compatibility without exchanging definitions.
//!
//! # Example
//!
//! ```rust
//! use cfmsg::schema::{FieldKind, SchemaBuilder};
//!
//! let position = SchemaBuilder::new("Position")
//!     .field("x", FieldKind::F32)
//!     .field("y", FieldKind::F32)
//!     .field("z", FieldKind::F32)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(position.fixed_size(), Some(12));
//! ```

mod builder;
mod field;
mod signature;

pub use builder::SchemaBuilder;
pub use field::{ArrayMarker, FieldDescriptor, FieldKind, FieldType};
pub use signature::Signature;

use crate::value::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Errors raised while constructing a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Type name is empty or contains characters outside `[A-Za-z0-9_/]`.
    InvalidTypeName(String),
    /// Field or constant name is not an identifier.
    InvalidFieldName { type_name: String, field: String },
    /// Two fields share a name.
    DuplicateField { type_name: String, field: String },
    /// Default value does not conform to the field type.
    InvalidDefault {
        type_name: String,
        field: String,
        expected: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTypeName(name) => write!(f, "Invalid type name: '{}'", name),
            Self::InvalidFieldName { type_name, field } => {
                write!(f, "Invalid field name '{}' in {}", field, type_name)
            }
            Self::DuplicateField { type_name, field } => {
                write!(f, "Duplicate field '{}' in {}", field, type_name)
            }
            Self::InvalidDefault {
                type_name,
                field,
                expected,
            } => write!(
                f,
                "Default for {}.{} does not conform to {}",
                type_name, field, expected
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Named constant declared alongside the fields. Never encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub kind: FieldKind,
    pub value: Value,
}

/// Ordered, named field definition for one message type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
    constants: Vec<Constant>,
    signature: Signature,
}

impl Schema {
    /// Build a schema from an ordered field list.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        Self::with_constants(name, fields, Vec::new())
    }

    /// Build a schema with named constants.
    pub fn with_constants(
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        constants: Vec<Constant>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if !is_valid_type_name(&name) {
            return Err(SchemaError::InvalidTypeName(name));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !is_identifier(field.name()) {
                return Err(SchemaError::InvalidFieldName {
                    type_name: name,
                    field: field.name().to_string(),
                });
            }
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    type_name: name,
                    field: field.name().to_string(),
                });
            }
            if let Some(default) = field.default() {
                if !field.field_type().accepts(default) {
                    return Err(SchemaError::InvalidDefault {
                        type_name: name,
                        field: field.name().to_string(),
                        expected: field.field_type().to_string(),
                    });
                }
            }
        }
        for constant in &constants {
            if !is_identifier(&constant.name) {
                return Err(SchemaError::InvalidFieldName {
                    type_name: name,
                    field: constant.name.clone(),
                });
            }
        }

        let signature = Signature::compute(&fields);
        Ok(Self {
            name,
            fields,
            constants,
            signature,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Smallest possible encoded size (all arrays and strings empty).
    pub fn min_size(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.field_type().min_encoded_size())
            .fold(0usize, usize::saturating_add)
    }

    /// Exact encoded size if no field has a value-dependent size.
    pub fn fixed_size(&self) -> Option<usize> {
        self.fields.iter().try_fold(0usize, |acc, f| {
            f.field_type()
                .fixed_size()
                .and_then(|size| acc.checked_add(size))
        })
    }

    /// Schemas referenced directly by nested-message fields.
    pub fn nested(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.fields.iter().filter_map(|f| f.kind().nested())
    }

    /// Field list in interface-definition form, one `type name` per line.
    pub fn definition_text(&self) -> String {
        let mut text = String::new();
        for constant in &self.constants {
            text.push_str(&format!(
                "{} {}={}\n",
                constant.kind.type_name(),
                constant.name,
                constant_text(&constant.value)
            ));
        }
        for field in &self.fields {
            text.push_str(&format!("{} {}\n", field.field_type(), field.name()));
        }
        text
    }
}

// Two schemas are the same type when name, layout and field defaults agree.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.signature == other.signature
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| same_default(a.default(), b.default()))
    }
}

impl Eq for Schema {}

// Float defaults compare by bit pattern so a NaN default equals itself.
fn same_default(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(Value::F32(x)), Some(Value::F32(y))) => x.to_bits() == y.to_bits(),
        (Some(Value::F64(x)), Some(Value::F64(y))) => x.to_bits() == y.to_bits(),
        (a, b) => a == b,
    }
}

fn constant_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        other => other
            .as_i64()
            .map(|v| v.to_string())
            .or_else(|| other.as_f64().map(|v| v.to_string()))
            .or_else(|| match other {
                Value::U64(v) => Some(v.to_string()),
                _ => None,
            })
            .unwrap_or_default(),
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn is_valid_type_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.ends_with('/')
        && !name.contains("//")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_rejected() {
        let err = SchemaBuilder::new("Dup")
            .field("x", FieldKind::F32)
            .field("x", FieldKind::F64)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { ref field, .. } if field == "x"));
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(matches!(
            Schema::new("", Vec::new()),
            Err(SchemaError::InvalidTypeName(_))
        ));
        assert!(matches!(
            Schema::new("pkg//Type", Vec::new()),
            Err(SchemaError::InvalidTypeName(_))
        ));
        let err = SchemaBuilder::new("T").field("9lives", FieldKind::U8).build();
        assert!(matches!(err, Err(SchemaError::InvalidFieldName { .. })));
    }

    #[test]
    fn test_invalid_default_rejected() {
        let field = FieldDescriptor::new("height", FieldType::scalar(FieldKind::F32))
            .with_default(1.0f64);
        let err = Schema::new("Takeoff", vec![field]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn test_sizes() {
        let point = Arc::new(
            SchemaBuilder::new("geometry_msgs/Point")
                .field("x", FieldKind::F64)
                .field("y", FieldKind::F64)
                .field("z", FieldKind::F64)
                .build()
                .unwrap(),
        );
        assert_eq!(point.fixed_size(), Some(24));

        let goto = SchemaBuilder::new("GoToRequest")
            .field("groupMask", FieldKind::U8)
            .field("relative", FieldKind::Bool)
            .nested_field("goal", point)
            .field("yaw", FieldKind::F32)
            .build()
            .unwrap();
        assert_eq!(goto.fixed_size(), Some(1 + 1 + 24 + 4));

        let log = SchemaBuilder::new("GenericLogData")
            .sequence_field("values", FieldKind::F64)
            .build()
            .unwrap();
        assert_eq!(log.fixed_size(), None);
        assert_eq!(log.min_size(), 4);
    }

    #[test]
    fn test_equality_uses_name_and_layout() {
        let a = SchemaBuilder::new("A").field("x", FieldKind::U8).build().unwrap();
        let a2 = SchemaBuilder::new("A").field("x", FieldKind::U8).build().unwrap();
        let b = SchemaBuilder::new("B").field("x", FieldKind::U8).build().unwrap();
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_equality_includes_defaults() {
        let land = |height: f32| {
            SchemaBuilder::new("crazyflie_driver/LandRequest")
                .field("groupMask", FieldKind::U8)
                .field_with_default("height", FieldKind::F32, height)
                .build()
                .unwrap()
        };
        assert_eq!(land(0.05), land(0.05));
        assert_ne!(land(0.05), land(0.1));
        assert_eq!(land(0.05).signature(), land(0.1).signature());
        assert_eq!(land(f32::NAN), land(f32::NAN));
    }

    #[test]
    fn test_definition_text() {
        let schema = SchemaBuilder::new("crtpPacket")
            .constant("MAX_SIZE", FieldKind::U8, Value::U8(30))
            .field("size", FieldKind::U8)
            .field("header", FieldKind::U8)
            .array_field("data", FieldKind::U8, 30)
            .build()
            .unwrap();
        assert_eq!(
            schema.definition_text(),
            "uint8 MAX_SIZE=30\nuint8 size\nuint8 header\nuint8[30] data\n"
        );
        assert_eq!(schema.constant("MAX_SIZE").map(|c| &c.value), Some(&Value::U8(30)));
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors for schema members.

use crate::schema::Schema;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Kind of a single field element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bytes,
    /// Nested message, encoded inline with its own schema.
    Message(Arc<Schema>),
}

impl FieldKind {
    /// Wire size in bytes for fixed-width scalars (None for strings, bytes, messages).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::String | Self::Bytes | Self::Message(_) => None,
        }
    }

    /// Smallest number of bytes one element of this kind can occupy on the wire.
    pub fn min_encoded_size(&self) -> usize {
        match self {
            Self::String | Self::Bytes => 4,
            Self::Message(schema) => schema.min_size(),
            scalar => scalar.size().unwrap_or(0),
        }
    }

    /// Exact encoded size when it does not depend on the value.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Message(schema) => schema.fixed_size(),
            other => other.size(),
        }
    }

    /// Interface-definition type name (`float32`, `string`, `pkg/Type`, ...).
    pub fn type_name(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Message(schema) => schema.name(),
        }
    }

    /// Parse a built-in scalar type name. Nested references are not handled here.
    pub fn from_primitive_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => Self::Bool,
            "int8" | "byte" => Self::I8,
            "int16" => Self::I16,
            "int32" => Self::I32,
            "int64" => Self::I64,
            "uint8" | "char" => Self::U8,
            "uint16" => Self::U16,
            "uint32" => Self::U32,
            "uint64" => Self::U64,
            "float32" => Self::F32,
            "float64" => Self::F64,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            _ => return None,
        };
        Some(kind)
    }

    /// Nested schema, if this is a message reference.
    pub fn nested(&self) -> Option<&Arc<Schema>> {
        match self {
            Self::Message(schema) => Some(schema),
            _ => None,
        }
    }

    /// Check that a scalar value has exactly this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool, Value::Bool(_))
            | (Self::I8, Value::I8(_))
            | (Self::I16, Value::I16(_))
            | (Self::I32, Value::I32(_))
            | (Self::I64, Value::I64(_))
            | (Self::U8, Value::U8(_))
            | (Self::U16, Value::U16(_))
            | (Self::U32, Value::U32(_))
            | (Self::U64, Value::U64(_))
            | (Self::F32, Value::F32(_))
            | (Self::F64, Value::F64(_))
            | (Self::String, Value::String(_))
            | (Self::Bytes, Value::Bytes(_)) => true,
            (Self::Message(schema), Value::Message(msg)) => msg.schema().as_ref() == schema.as_ref(),
            _ => false,
        }
    }
}

/// Array marker on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayMarker {
    /// Exactly `N` elements.
    Fixed(usize),
    /// Any number of elements.
    Variable,
}

/// Full type of a field: element kind plus optional array marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    kind: FieldKind,
    array: Option<ArrayMarker>,
}

impl FieldType {
    /// Single element.
    pub fn scalar(kind: FieldKind) -> Self {
        Self { kind, array: None }
    }

    /// Fixed-length array.
    pub fn fixed_array(kind: FieldKind, length: usize) -> Self {
        Self {
            kind,
            array: Some(ArrayMarker::Fixed(length)),
        }
    }

    /// Variable-length array.
    pub fn sequence(kind: FieldKind) -> Self {
        Self {
            kind,
            array: Some(ArrayMarker::Variable),
        }
    }

    /// Nested message.
    pub fn message(schema: Arc<Schema>) -> Self {
        Self::scalar(FieldKind::Message(schema))
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn array(&self) -> Option<ArrayMarker> {
        self.array
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    /// Smallest encoded size of a value of this type.
    pub fn min_encoded_size(&self) -> usize {
        match self.array {
            None => self.kind.min_encoded_size(),
            Some(ArrayMarker::Variable) => 4,
            Some(ArrayMarker::Fixed(n)) => 4 + n.saturating_mul(self.kind.min_encoded_size()),
        }
    }

    /// Exact encoded size when it does not depend on the value.
    pub fn fixed_size(&self) -> Option<usize> {
        match self.array {
            None => self.kind.fixed_size(),
            Some(ArrayMarker::Variable) => None,
            Some(ArrayMarker::Fixed(n)) => self
                .kind
                .fixed_size()
                .and_then(|size| size.checked_mul(n))
                .and_then(|size| size.checked_add(4)),
        }
    }

    /// Check that a value conforms to this type, including nested shapes.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self.array, value) {
            (None, v) => self.kind.accepts(v),
            (Some(marker), Value::Array(items)) => {
                if let ArrayMarker::Fixed(n) = marker {
                    if items.len() != n {
                        return false;
                    }
                }
                items.iter().all(|item| self.kind.accepts(item))
            }
            _ => false,
        }
    }

    /// Zero value for this type (empty arrays, zeroed fixed arrays, nested zeroes).
    pub fn zero_value(&self) -> Value {
        match self.array {
            None => zero_scalar(&self.kind),
            Some(ArrayMarker::Variable) => Value::Array(Vec::new()),
            Some(ArrayMarker::Fixed(n)) => Value::Array(vec![zero_scalar(&self.kind); n]),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.type_name())?;
        match self.array {
            Some(ArrayMarker::Fixed(n)) => write!(f, "[{}]", n),
            Some(ArrayMarker::Variable) => write!(f, "[]"),
            None => Ok(()),
        }
    }
}

// @audit-ok: Simple pattern matching - zero value dispatch table
fn zero_scalar(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Bool => Value::Bool(false),
        FieldKind::I8 => Value::I8(0),
        FieldKind::I16 => Value::I16(0),
        FieldKind::I32 => Value::I32(0),
        FieldKind::I64 => Value::I64(0),
        FieldKind::U8 => Value::U8(0),
        FieldKind::U16 => Value::U16(0),
        FieldKind::U32 => Value::U32(0),
        FieldKind::U64 => Value::U64(0),
        FieldKind::F32 => Value::F32(0.0),
        FieldKind::F64 => Value::F64(0.0),
        FieldKind::String => Value::String(String::new()),
        FieldKind::Bytes => Value::Bytes(Vec::new()),
        FieldKind::Message(schema) => Value::Message(crate::message::Message::zeroed(schema)),
    }
}

/// A named, typed schema member. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    default: Option<Value>,
}

impl FieldDescriptor {
    /// Create a field without default (required on encode).
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
        }
    }

    /// Attach a default value. Conformance is checked when the schema is built.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn kind(&self) -> &FieldKind {
        &self.field_type.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// True when the field must be present on encode.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message encoder.

use super::cursor::Writer;
use super::{CodecLimits, EncodeError};
use crate::message::Message;
use crate::schema::{ArrayMarker, FieldDescriptor, FieldKind, FieldType, Schema};
use crate::value::Value;

pub(crate) fn encode_message(
    message: &Message,
    schema: &Schema,
    limits: &CodecLimits,
) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(schema.min_size());
    let mut encoder = Encoder {
        writer: &mut writer,
        limits,
    };
    encoder.message(message, schema)?;

    if writer.len() > limits.max_message_size {
        return Err(EncodeError::LimitExceeded {
            what: "message size",
            value: writer.len(),
            limit: limits.max_message_size,
        });
    }
    Ok(writer.into_bytes())
}

/// Exact number of bytes `message` encodes to, under the same limits as
/// [`encode_message`].
pub(crate) fn message_len(
    message: &Message,
    schema: &Schema,
    limits: &CodecLimits,
) -> Result<usize, EncodeError> {
    let total = fields_len(message, schema, limits)?;
    if total > limits.max_message_size {
        return Err(EncodeError::LimitExceeded {
            what: "message size",
            value: total,
            limit: limits.max_message_size,
        });
    }
    Ok(total)
}

fn fields_len(message: &Message, schema: &Schema, limits: &CodecLimits) -> Result<usize, EncodeError> {
    check_schema(message, schema)?;
    let mut total = 0usize;
    for field in schema.fields() {
        let value = field_value(message, schema, field)?;
        let len = type_len(field.field_type(), value, field.name(), limits)?;
        total = total.saturating_add(len);
    }
    Ok(total)
}

struct Encoder<'a> {
    writer: &'a mut Writer,
    limits: &'a CodecLimits,
}

impl Encoder<'_> {
    fn message(&mut self, message: &Message, schema: &Schema) -> Result<(), EncodeError> {
        check_schema(message, schema)?;
        for field in schema.fields() {
            let value = field_value(message, schema, field)?;
            self.typed(field.field_type(), value, field.name())?;
        }
        Ok(())
    }

    fn typed(&mut self, ty: &FieldType, value: &Value, field: &str) -> Result<(), EncodeError> {
        let Some(marker) = ty.array() else {
            return self.element(ty.kind(), value, field);
        };

        let items = match value {
            Value::Array(items) => items,
            other => return Err(mismatch(field, ty.to_string(), other)),
        };
        if let ArrayMarker::Fixed(expected) = marker {
            if items.len() != expected {
                return Err(EncodeError::ArrayLengthMismatch {
                    field: field.to_string(),
                    expected,
                    found: items.len(),
                });
            }
        }
        if items.len() > self.limits.max_array_len {
            return Err(EncodeError::LimitExceeded {
                what: "array length",
                value: items.len(),
                limit: self.limits.max_array_len,
            });
        }

        self.length(items.len(), field)?;
        for item in items {
            self.element(ty.kind(), item, field)?;
        }
        Ok(())
    }

    fn element(&mut self, kind: &FieldKind, value: &Value, field: &str) -> Result<(), EncodeError> {
        match (kind, value) {
            (FieldKind::Bool, Value::Bool(v)) => self.writer.write_u8(u8::from(*v)),
            (FieldKind::I8, Value::I8(v)) => self.writer.write_i8(*v),
            (FieldKind::I16, Value::I16(v)) => self.writer.write_i16(*v),
            (FieldKind::I32, Value::I32(v)) => self.writer.write_i32(*v),
            (FieldKind::I64, Value::I64(v)) => self.writer.write_i64(*v),
            (FieldKind::U8, Value::U8(v)) => self.writer.write_u8(*v),
            (FieldKind::U16, Value::U16(v)) => self.writer.write_u16(*v),
            (FieldKind::U32, Value::U32(v)) => self.writer.write_u32(*v),
            (FieldKind::U64, Value::U64(v)) => self.writer.write_u64(*v),
            (FieldKind::F32, Value::F32(v)) => self.writer.write_f32(*v),
            (FieldKind::F64, Value::F64(v)) => self.writer.write_f64(*v),
            (FieldKind::String, Value::String(s)) => {
                self.length(s.len(), field)?;
                self.writer.write_bytes(s.as_bytes());
            }
            (FieldKind::Bytes, Value::Bytes(b)) => {
                self.length(b.len(), field)?;
                self.writer.write_bytes(b);
            }
            (FieldKind::Message(nested), Value::Message(m)) => self.message(m, nested)?,
            (kind, other) => return Err(mismatch(field, kind.type_name().to_string(), other)),
        }
        Ok(())
    }

    fn length(&mut self, len: usize, field: &str) -> Result<(), EncodeError> {
        let prefix = u32::try_from(len).map_err(|_| EncodeError::LengthOverflow {
            field: field.to_string(),
            len,
        })?;
        self.writer.write_u32(prefix);
        Ok(())
    }
}

fn check_schema(message: &Message, schema: &Schema) -> Result<(), EncodeError> {
    if message.schema().as_ref() != schema {
        return Err(EncodeError::SchemaMismatch {
            expected: format!("{} ({})", schema.name(), schema.signature()),
            found: format!(
                "{} ({})",
                message.schema().name(),
                message.schema().signature()
            ),
        });
    }
    Ok(())
}

fn field_value<'m>(
    message: &'m Message,
    schema: &'m Schema,
    field: &'m FieldDescriptor,
) -> Result<&'m Value, EncodeError> {
    message
        .value(field.name())
        .or_else(|| field.default())
        .ok_or_else(|| EncodeError::MissingField {
            type_name: schema.name().to_string(),
            field: field.name().to_string(),
        })
}

fn mismatch(field: &str, expected: String, found: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind_name(),
    }
}

fn type_len(
    ty: &FieldType,
    value: &Value,
    field: &str,
    limits: &CodecLimits,
) -> Result<usize, EncodeError> {
    let Some(marker) = ty.array() else {
        return element_len(ty.kind(), value, field, limits);
    };
    let items = match value {
        Value::Array(items) => items,
        other => return Err(mismatch(field, ty.to_string(), other)),
    };
    if let ArrayMarker::Fixed(expected) = marker {
        if items.len() != expected {
            return Err(EncodeError::ArrayLengthMismatch {
                field: field.to_string(),
                expected,
                found: items.len(),
            });
        }
    }
    if items.len() > limits.max_array_len {
        return Err(EncodeError::LimitExceeded {
            what: "array length",
            value: items.len(),
            limit: limits.max_array_len,
        });
    }
    if let Some(size) = ty.kind().fixed_size() {
        return Ok(4usize.saturating_add(size.saturating_mul(items.len())));
    }
    items.iter().try_fold(4usize, |acc, item| {
        element_len(ty.kind(), item, field, limits).map(|len| acc.saturating_add(len))
    })
}

fn element_len(
    kind: &FieldKind,
    value: &Value,
    field: &str,
    limits: &CodecLimits,
) -> Result<usize, EncodeError> {
    match (kind, value) {
        (FieldKind::String, Value::String(s)) => Ok(4 + s.len()),
        (FieldKind::Bytes, Value::Bytes(b)) => Ok(4 + b.len()),
        (FieldKind::Message(nested), Value::Message(m)) => fields_len(m, nested, limits),
        (kind, value) if kind.accepts(value) => Ok(kind.size().unwrap_or(0)),
        (kind, other) => Err(mismatch(field, kind.type_name().to_string(), other)),
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message decoder.

use super::cursor::Reader;
use super::{CodecLimits, DecodeError};
use crate::message::Message;
use crate::schema::{ArrayMarker, FieldKind, FieldType, Schema};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) fn decode_message(
    bytes: &[u8],
    schema: &Arc<Schema>,
    limits: &CodecLimits,
) -> Result<Message, DecodeError> {
    if bytes.len() > limits.max_message_size {
        return Err(DecodeError::LimitExceeded {
            what: "message size",
            value: bytes.len(),
            limit: limits.max_message_size,
        });
    }

    let mut decoder = Decoder {
        reader: Reader::new(bytes),
        limits,
    };
    let message = decoder.message(schema)?;

    let remaining = decoder.reader.remaining();
    if remaining > 0 {
        return Err(DecodeError::TrailingBytes { remaining });
    }
    Ok(message)
}

struct Decoder<'a> {
    reader: Reader<'a>,
    limits: &'a CodecLimits,
}

impl Decoder<'_> {
    fn message(&mut self, schema: &Arc<Schema>) -> Result<Message, DecodeError> {
        let mut values = HashMap::with_capacity(schema.len());
        for field in schema.fields() {
            let value = self.typed(field.field_type(), field.name())?;
            values.insert(field.name().to_string(), value);
        }
        Ok(Message::from_values(schema, values))
    }

    fn typed(&mut self, ty: &FieldType, field: &str) -> Result<Value, DecodeError> {
        let Some(marker) = ty.array() else {
            return self.element(ty.kind(), field);
        };

        let count = self
            .reader
            .read_length(field, ty.kind().min_encoded_size())?;
        if count > self.limits.max_array_len {
            return Err(DecodeError::LimitExceeded {
                what: "array length",
                value: count,
                limit: self.limits.max_array_len,
            });
        }
        if let ArrayMarker::Fixed(expected) = marker {
            if count != expected {
                return Err(DecodeError::MalformedLength {
                    field: field.to_string(),
                    declared: count as u64,
                    remaining: self.reader.remaining(),
                });
            }
        }

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.element(ty.kind(), field)?);
        }
        Ok(Value::Array(items))
    }

    fn element(&mut self, kind: &FieldKind, field: &str) -> Result<Value, DecodeError> {
        let r = &mut self.reader;
        let value = match kind {
            FieldKind::Bool => Value::Bool(r.read_u8(field)? != 0),
            FieldKind::I8 => Value::I8(r.read_i8(field)?),
            FieldKind::I16 => Value::I16(r.read_i16(field)?),
            FieldKind::I32 => Value::I32(r.read_i32(field)?),
            FieldKind::I64 => Value::I64(r.read_i64(field)?),
            FieldKind::U8 => Value::U8(r.read_u8(field)?),
            FieldKind::U16 => Value::U16(r.read_u16(field)?),
            FieldKind::U32 => Value::U32(r.read_u32(field)?),
            FieldKind::U64 => Value::U64(r.read_u64(field)?),
            FieldKind::F32 => Value::F32(r.read_f32(field)?),
            FieldKind::F64 => Value::F64(r.read_f64(field)?),
            FieldKind::String => {
                let len = r.read_length(field, 1)?;
                let raw = r.read_bytes(len, field)?;
                let text = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8 {
                    field: field.to_string(),
                })?;
                Value::String(text.to_string())
            }
            FieldKind::Bytes => {
                let len = r.read_length(field, 1)?;
                Value::Bytes(r.read_bytes(len, field)?.to_vec())
            }
            FieldKind::Message(nested) => Value::Message(self.message(nested)?),
        };
        Ok(value)
    }
}

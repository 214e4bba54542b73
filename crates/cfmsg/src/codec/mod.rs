// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary wire codec.
//!
//! # Wire format
//!
//! No header, no alignment, no padding. Fields are written in schema order:
//!
//! | kind              | representation                              |
//! |-------------------|---------------------------------------------|
//! | bool              | 1 byte, 0 or 1 (any non-zero decodes true)  |
//! | intN / uintN      | N/8 bytes, little-endian                    |
//! | float32 / float64 | IEEE-754, little-endian                     |
//! | string            | u32 byte length, UTF-8 bytes, no terminator |
//! | bytes             | u32 length, raw bytes                       |
//! | nested message    | nested encoding, inline                     |
//! | array `[N]`/`[]`  | u32 element count, then each element        |
//!
//! # Example
//!
//! ```rust
//! use cfmsg::codec;
//! use cfmsg::schema::{FieldKind, SchemaBuilder};
//! use cfmsg::Message;
//! use std::sync::Arc;
//!
//! let schema = Arc::new(
//!     SchemaBuilder::new("Position")
//!         .field("x", FieldKind::F32)
//!         .field("y", FieldKind::F32)
//!         .field("z", FieldKind::F32)
//!         .build()
//!         .unwrap(),
//! );
//! let msg = Message::new(&schema)
//!     .with("x", 1.0f32).unwrap()
//!     .with("y", 2.0f32).unwrap()
//!     .with("z", 3.0f32).unwrap();
//!
//! let bytes = codec::encode(&msg, &schema).unwrap();
//! assert_eq!(bytes, [0, 0, 0x80, 0x3F, 0, 0, 0, 0x40, 0, 0, 0x40, 0x40]);
//! assert_eq!(codec::decode(&bytes, &schema).unwrap(), msg);
//! ```

mod cursor;
mod decoder;
mod encoder;
mod error;

pub use error::{DecodeError, EncodeError};

use crate::message::Message;
use crate::schema::Schema;
use std::fmt;
use std::sync::Arc;

/// Default upper bound on an encoded message (16 MiB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Default upper bound on elements in one array.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1 << 20;

/// Resource limits applied by [`BinaryCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    pub max_message_size: usize,
    pub max_array_len: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

/// Encode/decode contract between messages and bytes.
///
/// Implementations must be pure: the same message and schema always
/// produce the same bytes, and decode never returns a partial message.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Short identifier, for diagnostics.
    fn name(&self) -> &str;

    fn encode(&self, message: &Message, schema: &Schema) -> Result<Vec<u8>, EncodeError>;

    fn decode(&self, bytes: &[u8], schema: &Arc<Schema>) -> Result<Message, DecodeError>;

    /// Exact encoded size of `message` against its own schema.
    fn encoded_len(&self, message: &Message) -> Result<usize, EncodeError> {
        self.encode(message, message.schema()).map(|bytes| bytes.len())
    }
}

/// Default little-endian, length-prefixed codec.
#[derive(Debug, Clone, Default)]
pub struct BinaryCodec {
    limits: CodecLimits,
}

impl BinaryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: CodecLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &CodecLimits {
        &self.limits
    }
}

impl Codec for BinaryCodec {
    fn name(&self) -> &str {
        "binary"
    }

    fn encode(&self, message: &Message, schema: &Schema) -> Result<Vec<u8>, EncodeError> {
        encoder::encode_message(message, schema, &self.limits)
    }

    fn decode(&self, bytes: &[u8], schema: &Arc<Schema>) -> Result<Message, DecodeError> {
        decoder::decode_message(bytes, schema, &self.limits)
    }

    fn encoded_len(&self, message: &Message) -> Result<usize, EncodeError> {
        encoder::message_len(message, message.schema(), &self.limits)
    }
}

/// Encode with the default [`BinaryCodec`].
pub fn encode(message: &Message, schema: &Schema) -> Result<Vec<u8>, EncodeError> {
    encoder::encode_message(message, schema, &CodecLimits::default())
}

/// Decode with the default [`BinaryCodec`].
pub fn decode(bytes: &[u8], schema: &Arc<Schema>) -> Result<Message, DecodeError> {
    decoder::decode_message(bytes, schema, &CodecLimits::default())
}

/// Exact number of bytes [`encode`] produces for `message`.
pub fn encoded_len(message: &Message) -> Result<usize, EncodeError> {
    encoder::message_len(message, message.schema(), &CodecLimits::default())
}

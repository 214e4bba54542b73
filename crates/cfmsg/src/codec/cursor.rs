// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked read/write cursors for the wire format.

use super::DecodeError;

/// Generate read methods for little-endian primitives.
///
/// Each generated method checks the remaining length before touching the
/// buffer and reports the field being decoded on failure.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, field: &str) -> Result<$type, DecodeError> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size, field)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Generate write methods for little-endian primitives.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.buffer.extend_from_slice(&value.to_le_bytes());
        }
    };
}

/// Immutable cursor for reading.
pub(crate) struct Reader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_u16, u16, 2);
    impl_read_le!(read_i16, i16, 2);
    impl_read_le!(read_u32, u32, 4);
    impl_read_le!(read_i32, i32, 4);
    impl_read_le!(read_u64, u64, 8);
    impl_read_le!(read_i64, i64, 8);
    impl_read_le!(read_f32, f32, 4);
    impl_read_le!(read_f64, f64, 8);

    pub fn read_bytes(&mut self, len: usize, field: &str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::TruncatedInput {
                field: field.to_string(),
                need: len,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read a u32 length prefix and check that `len * min_element_size`
    /// bytes are available. A count of zero-size elements is only bounded
    /// by the caller's array limit.
    pub fn read_length(&mut self, field: &str, min_element_size: usize) -> Result<usize, DecodeError> {
        let declared = self.read_u32(field)?;
        let remaining = self.remaining();
        let malformed = || DecodeError::MalformedLength {
            field: field.to_string(),
            declared: u64::from(declared),
            remaining,
        };

        let len = usize::try_from(declared).map_err(|_| malformed())?;
        let need = len.checked_mul(min_element_size).ok_or_else(malformed)?;
        if need > remaining {
            return Err(malformed());
        }
        Ok(len)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

/// Growable cursor for writing.
pub(crate) struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    impl_write_le!(write_u8, u8);
    impl_write_le!(write_i8, i8);
    impl_write_le!(write_u16, u16);
    impl_write_le!(write_i16, i16);
    impl_write_le!(write_u32, u32);
    impl_write_le!(write_i32, i32);
    impl_write_le!(write_u64, u64);
    impl_write_le!(write_i64, i64);
    impl_write_le!(write_f32, f32);
    impl_write_le!(write_f64, f64);

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

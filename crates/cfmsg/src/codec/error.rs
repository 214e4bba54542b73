// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec error types.

use std::fmt;

/// Errors raised while decoding bytes against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes than a fixed-width value or length prefix requires.
    TruncatedInput {
        field: String,
        need: usize,
        have: usize,
    },
    /// Declared length or element count cannot fit in the remaining bytes,
    /// or a fixed array's count differs from its declared length.
    MalformedLength {
        field: String,
        declared: u64,
        remaining: usize,
    },
    /// String bytes are not valid UTF-8.
    InvalidUtf8 { field: String },
    /// Bytes left over after the last field.
    TrailingBytes { remaining: usize },
    /// A configured codec limit was exceeded.
    LimitExceeded {
        what: &'static str,
        value: usize,
        limit: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedInput { field, need, have } => write!(
                f,
                "Truncated input at '{}': need {} bytes, have {}",
                field, need, have
            ),
            Self::MalformedLength {
                field,
                declared,
                remaining,
            } => write!(
                f,
                "Malformed length at '{}': declared {}, {} bytes remaining",
                field, declared, remaining
            ),
            Self::InvalidUtf8 { field } => write!(f, "Invalid UTF-8 in string '{}'", field),
            Self::TrailingBytes { remaining } => {
                write!(f, "{} trailing bytes after last field", remaining)
            }
            Self::LimitExceeded { what, value, limit } => {
                write!(f, "{} {} exceeds limit {}", what, value, limit)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors raised while encoding a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Required field (no default) not set.
    MissingField { type_name: String, field: String },
    /// Value shape does not conform to the field type.
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },
    /// Fixed array with the wrong element count.
    ArrayLengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    /// Message was built for a different schema.
    SchemaMismatch { expected: String, found: String },
    /// Length does not fit the u32 prefix.
    LengthOverflow { field: String, len: usize },
    /// A configured codec limit was exceeded.
    LimitExceeded {
        what: &'static str,
        value: usize,
        limit: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { type_name, field } => {
                write!(f, "Missing required field '{}' of {}", field, type_name)
            }
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Type mismatch for field '{}': expected {}, found {}",
                field, expected, found
            ),
            Self::ArrayLengthMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Array '{}' has {} elements, expected {}",
                field, found, expected
            ),
            Self::SchemaMismatch { expected, found } => {
                write!(f, "Schema mismatch: expected {}, found {}", expected, found)
            }
            Self::LengthOverflow { field, len } => {
                write!(f, "Length {} of '{}' exceeds u32 prefix", len, field)
            }
            Self::LimitExceeded { what, value, limit } => {
                write!(f, "{} {} exceeds limit {}", what, value, limit)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

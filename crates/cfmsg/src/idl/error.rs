// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interface definition errors.

use crate::schema::SchemaError;
use std::fmt;

/// Errors raised while parsing or resolving interface definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Malformed line.
    Syntax {
        file: String,
        line: usize,
        message: String,
    },
    /// Constant value does not parse as its declared type.
    InvalidConstant {
        file: String,
        line: usize,
        name: String,
        value: String,
    },
    /// Referenced type is neither defined nor already registered.
    UnresolvedType {
        file: String,
        line: usize,
        type_name: String,
    },
    /// Types reference each other in a loop.
    Cycle(Vec<String>),
    /// Two sources define the same type or service name.
    DuplicateDefinition(String),
    /// Definition parsed but does not form a valid schema.
    Schema { file: String, error: SchemaError },
    /// Reading a definition file failed.
    Io { path: String, message: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax {
                file,
                line,
                message,
            } => write!(f, "{}:{}: {}", file, line, message),
            Self::InvalidConstant {
                file,
                line,
                name,
                value,
            } => write!(
                f,
                "{}:{}: invalid value '{}' for constant {}",
                file, line, value, name
            ),
            Self::UnresolvedType {
                file,
                line,
                type_name,
            } => write!(f, "{}:{}: unknown type '{}'", file, line, type_name),
            Self::Cycle(types) => write!(f, "Type reference cycle: {}", types.join(" -> ")),
            Self::DuplicateDefinition(name) => write!(f, "Duplicate definition of {}", name),
            Self::Schema { file, error } => write!(f, "{}: {}", file, error),
            Self::Io { path, message } => write!(f, "Failed to read {}: {}", path, message),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema { error, .. } => Some(error),
            _ => None,
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interface definition text (`.msg` / `.srv`).
//!
//! ```text
//! # comment
//! uint8 MODE_RELATIVE=1      constant, not encoded
//! Header header              std_msgs/Header
//! geometry_msgs/Point goal   qualified reference
//! LogBlock[] log_blocks      same-package reference, variable-length
//! uint8[30] data             fixed-length
//! duration duration          {secs: int32, nsecs: int32}
//! ```
//!
//! A `.srv` file holds a request and a response definition separated by a
//! `---` line. Parse results are collected in an [`InterfaceSet`] and
//! resolved into a [`SchemaCatalog`](crate::catalog::SchemaCatalog).

mod error;
mod parser;
mod set;

pub use error::ParseError;
pub use parser::{
    parse_message, parse_service, ConstantDecl, FieldDecl, MsgFile, SrvFile, TypeRef,
    SERVICE_SEPARATOR,
};
pub use set::{InterfaceSet, RegisterError, RegisterSummary};

use crate::schema::{FieldKind, Schema, SchemaBuilder};
use std::sync::{Arc, OnceLock};

static TIME: OnceLock<Arc<Schema>> = OnceLock::new();
static DURATION: OnceLock<Arc<Schema>> = OnceLock::new();

/// Schema of the `time` built-in: `{secs: uint32, nsecs: uint32}`.
pub fn time_schema() -> Arc<Schema> {
    TIME.get_or_init(|| stamp_schema("time", FieldKind::U32))
        .clone()
}

/// Schema of the `duration` built-in: `{secs: int32, nsecs: int32}`.
pub fn duration_schema() -> Arc<Schema> {
    DURATION
        .get_or_init(|| stamp_schema("duration", FieldKind::I32))
        .clone()
}

fn stamp_schema(name: &str, kind: FieldKind) -> Arc<Schema> {
    let schema = SchemaBuilder::new(name)
        .field("secs", kind.clone())
        .field("nsecs", kind)
        .build();
    match schema {
        Ok(schema) => Arc::new(schema),
        // Static field list; building cannot fail.
        Err(e) => unreachable!("built-in {} schema: {}", name, e),
    }
}

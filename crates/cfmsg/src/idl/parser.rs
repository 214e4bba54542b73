// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Line parser for `.msg` and `.srv` definition text.

use super::ParseError;
use crate::schema::{is_identifier, ArrayMarker, FieldKind};
use crate::value::Value;

/// Separator between the request and response halves of a `.srv` file.
pub const SERVICE_SEPARATOR: &str = "---";

/// Element type named by a field declaration, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Built-in scalar.
    Primitive(FieldKind),
    /// `time`: `{secs: uint32, nsecs: uint32}`.
    Time,
    /// `duration`: `{secs: int32, nsecs: int32}`.
    Duration,
    /// Fully qualified `package/Type` reference.
    Named(String),
}

/// One field line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub type_ref: TypeRef,
    pub array: Option<ArrayMarker>,
    /// 1-based line number in the source text.
    pub line: usize,
}

/// One constant line (`type NAME=value`).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDecl {
    pub name: String,
    pub kind: FieldKind,
    pub value: Value,
    pub line: usize,
}

/// Parsed `.msg` text (or one half of a `.srv`).
#[derive(Debug, Clone, PartialEq)]
pub struct MsgFile {
    pub package: String,
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub constants: Vec<ConstantDecl>,
}

impl MsgFile {
    /// `package/Name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.package, self.name)
    }

    /// Source label used in error messages.
    pub fn file_label(&self) -> String {
        format!("{}/{}.msg", self.package, self.name)
    }
}

/// Parsed `.srv` text.
#[derive(Debug, Clone, PartialEq)]
pub struct SrvFile {
    pub package: String,
    pub name: String,
    /// `<Name>Request`.
    pub request: MsgFile,
    /// `<Name>Response`.
    pub response: MsgFile,
}

impl SrvFile {
    /// `package/Name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.package, self.name)
    }
}

/// Parse `.msg` text for `package/name`.
pub fn parse_message(package: &str, name: &str, text: &str) -> Result<MsgFile, ParseError> {
    let file = format!("{}/{}.msg", package, name);
    parse_lines(package, name, &file, text.lines().enumerate())
}

/// Parse `.srv` text for `package/name`.
pub fn parse_service(package: &str, name: &str, text: &str) -> Result<SrvFile, ParseError> {
    let file = format!("{}/{}.srv", package, name);
    let lines: Vec<(usize, &str)> = text.lines().enumerate().collect();
    let split = lines
        .iter()
        .position(|(_, l)| l.trim() == SERVICE_SEPARATOR)
        .ok_or_else(|| ParseError::Syntax {
            file: file.clone(),
            line: lines.len().max(1),
            message: format!("missing '{}' separator", SERVICE_SEPARATOR),
        })?;

    let request_name = format!("{}Request", name);
    let response_name = format!("{}Response", name);
    let request = parse_lines(package, &request_name, &file, lines[..split].iter().copied())?;
    let response = parse_lines(
        package,
        &response_name,
        &file,
        lines[split + 1..].iter().copied(),
    )?;

    Ok(SrvFile {
        package: package.to_string(),
        name: name.to_string(),
        request,
        response,
    })
}

fn parse_lines<'t>(
    package: &str,
    name: &str,
    file: &str,
    lines: impl Iterator<Item = (usize, &'t str)>,
) -> Result<MsgFile, ParseError> {
    let mut msg = MsgFile {
        package: package.to_string(),
        name: name.to_string(),
        fields: Vec::new(),
        constants: Vec::new(),
    };

    for (index, raw) in lines {
        let line = index + 1;
        let syntax = |message: String| ParseError::Syntax {
            file: file.to_string(),
            line,
            message,
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == SERVICE_SEPARATOR {
            return Err(syntax(format!("unexpected '{}'", SERVICE_SEPARATOR)));
        }

        let (type_token, rest) = trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| syntax(format!("expected 'type name', got '{}'", trimmed)))?;
        let rest = rest.trim_start();

        // String constants keep everything after '=' verbatim, '#' included.
        let is_constant = match (rest.find('='), rest.find('#')) {
            (Some(eq), Some(hash)) => eq < hash,
            (Some(_), None) => true,
            _ => false,
        };

        if is_constant {
            let (const_name, raw_value) = rest.split_once('=').unwrap_or((rest, ""));
            let const_name = const_name.trim();
            let kind = FieldKind::from_primitive_name(type_token)
                .ok_or_else(|| syntax(format!("constant {} must have a primitive type", const_name)))?;
            let raw_value = if kind == FieldKind::String {
                raw_value.trim()
            } else {
                strip_comment(raw_value).trim()
            };
            if !is_identifier(const_name) {
                return Err(syntax(format!("invalid constant name '{}'", const_name)));
            }
            let value = parse_constant(&kind, raw_value).ok_or_else(|| ParseError::InvalidConstant {
                file: file.to_string(),
                line,
                name: const_name.to_string(),
                value: raw_value.to_string(),
            })?;
            msg.constants.push(ConstantDecl {
                name: const_name.to_string(),
                kind,
                value,
                line,
            });
            continue;
        }

        let field_name = strip_comment(rest).trim();
        if !is_identifier(field_name) {
            return Err(syntax(format!("invalid field name '{}'", field_name)));
        }
        let (base, array) = split_array(type_token).map_err(syntax)?;
        msg.fields.push(FieldDecl {
            name: field_name.to_string(),
            type_ref: resolve_type_name(package, base).map_err(syntax)?,
            array,
            line,
        });
    }

    Ok(msg)
}

fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Split `type[N]` / `type[]` into base type and array marker.
fn split_array(token: &str) -> Result<(&str, Option<ArrayMarker>), String> {
    let Some(open) = token.find('[') else {
        return Ok((token, None));
    };
    let inner = token[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| format!("unterminated array type '{}'", token))?;
    let base = &token[..open];
    if inner.is_empty() {
        return Ok((base, Some(ArrayMarker::Variable)));
    }
    let len = inner
        .parse::<usize>()
        .map_err(|_| format!("invalid array length '{}'", inner))?;
    Ok((base, Some(ArrayMarker::Fixed(len))))
}

fn resolve_type_name(package: &str, base: &str) -> Result<TypeRef, String> {
    if let Some(kind) = FieldKind::from_primitive_name(base) {
        return Ok(TypeRef::Primitive(kind));
    }
    match base {
        "time" => return Ok(TypeRef::Time),
        "duration" => return Ok(TypeRef::Duration),
        "Header" => return Ok(TypeRef::Named("std_msgs/Header".to_string())),
        _ => {}
    }

    match base.split_once('/') {
        Some((pkg, ty)) if is_identifier(pkg) && is_identifier(ty) => {
            Ok(TypeRef::Named(base.to_string()))
        }
        None if is_identifier(base) => Ok(TypeRef::Named(format!("{}/{}", package, base))),
        _ => Err(format!("invalid type name '{}'", base)),
    }
}

fn parse_constant(kind: &FieldKind, raw: &str) -> Option<Value> {
    let value = match kind {
        FieldKind::Bool => match raw {
            "true" | "True" | "1" => Value::Bool(true),
            "false" | "False" | "0" => Value::Bool(false),
            _ => return None,
        },
        FieldKind::I8 => Value::I8(raw.parse().ok()?),
        FieldKind::I16 => Value::I16(raw.parse().ok()?),
        FieldKind::I32 => Value::I32(raw.parse().ok()?),
        FieldKind::I64 => Value::I64(raw.parse().ok()?),
        FieldKind::U8 => Value::U8(raw.parse().ok()?),
        FieldKind::U16 => Value::U16(raw.parse().ok()?),
        FieldKind::U32 => Value::U32(raw.parse().ok()?),
        FieldKind::U64 => Value::U64(raw.parse().ok()?),
        FieldKind::F32 => Value::F32(raw.parse().ok()?),
        FieldKind::F64 => Value::F64(raw.parse().ok()?),
        FieldKind::String => Value::String(raw.to_string()),
        FieldKind::Bytes | FieldKind::Message(_) => return None,
    };
    Some(value)
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Content signature over a schema's wire layout.

use crate::schema::{ArrayMarker, FieldDescriptor, FieldKind};
use std::fmt;
use std::fmt::Write as _;

/// MD5 over the canonical layout text of a schema.
///
/// The canonical text has one line per field, in order: `<type> <name>`,
/// where `<type>` is the primitive name (with `[N]` or `[]` suffix) and a
/// nested message contributes its own signature in hex. Type names of nested
/// schemas do not affect the result, only their layout does.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 16]);

impl Signature {
    /// Compute the signature of an ordered field list.
    pub fn compute(fields: &[FieldDescriptor]) -> Self {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(canonical_text(fields).as_bytes());
        let result = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex form (32 characters).
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl From<[u8; 16]> for Signature {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

fn canonical_text(fields: &[FieldDescriptor]) -> String {
    let mut text = String::new();
    for field in fields {
        match field.kind() {
            FieldKind::Message(nested) => text.push_str(&nested.signature().to_hex()),
            scalar => text.push_str(scalar.type_name()),
        }
        // Writing into a String cannot fail.
        let _ = match field.field_type().array() {
            Some(ArrayMarker::Fixed(n)) => write!(text, "[{}]", n),
            Some(ArrayMarker::Variable) => write!(text, "[]"),
            None => Ok(()),
        };
        text.push(' ');
        text.push_str(field.name());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn fields(layout: &[(&str, FieldKind)]) -> Vec<FieldDescriptor> {
        layout.iter()
            .map(|(name, kind)| FieldDescriptor::new(*name, FieldType::scalar(kind.clone())))
            .collect()
    }

    #[test]
    fn test_canonical_text() {
        let f = vec![
            FieldDescriptor::new("x", FieldType::scalar(FieldKind::F32)),
            FieldDescriptor::new("data", FieldType::fixed_array(FieldKind::U8, 30)),
            FieldDescriptor::new("values", FieldType::sequence(FieldKind::F64)),
        ];
        assert_eq!(
            canonical_text(&f),
            "float32 x\nuint8[30] data\nfloat64[] values\n"
        );
    }

    #[test]
    fn test_signature_is_stable() {
        let a = Signature::compute(&fields(&[("x", FieldKind::F32), ("y", FieldKind::F32)]));
        let b = Signature::compute(&fields(&[("x", FieldKind::F32), ("y", FieldKind::F32)]));
        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 32);
    }

    #[test]
    fn test_signature_depends_on_order_kind_and_name() {
        let base = Signature::compute(&fields(&[("x", FieldKind::F32), ("y", FieldKind::F32)]));
        let swapped = Signature::compute(&fields(&[("y", FieldKind::F32), ("x", FieldKind::F32)]));
        let retyped = Signature::compute(&fields(&[("x", FieldKind::F64), ("y", FieldKind::F32)]));
        let renamed = Signature::compute(&fields(&[("x", FieldKind::F32), ("z", FieldKind::F32)]));
        assert_ne!(base, swapped);
        assert_ne!(base, retyped);
        assert_ne!(base, renamed);
    }

    #[test]
    fn test_empty_field_list_is_md5_of_empty_string() {
        let sig = Signature::compute(&[]);
        assert_eq!(sig.to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
    }
}

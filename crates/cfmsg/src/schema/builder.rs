// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for Schema.

use crate::schema::{Constant, FieldDescriptor, FieldKind, FieldType, Schema, SchemaError};
use crate::value::Value;
use std::sync::Arc;

/// Builder for creating Schema instances.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    constants: Vec<Constant>,
}

impl SchemaBuilder {
    /// Create a new builder for a message type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Add a single-element field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, FieldType::scalar(kind)));
        self
    }

    /// Add a field with a default, emitted when the message leaves it unset.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        default: impl Into<Value>,
    ) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, FieldType::scalar(kind)).with_default(default));
        self
    }

    /// Add a field with an explicit type.
    pub fn field_with_type(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDescriptor::new(name, field_type));
        self
    }

    /// Add a prebuilt descriptor.
    pub fn descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::String)
    }

    /// Add a variable-length array field.
    pub fn sequence_field(mut self, name: impl Into<String>, element: FieldKind) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, FieldType::sequence(element)));
        self
    }

    /// Add a fixed-length array field.
    pub fn array_field(mut self, name: impl Into<String>, element: FieldKind, length: usize) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, FieldType::fixed_array(element, length)));
        self
    }

    /// Add a nested message field.
    pub fn nested_field(mut self, name: impl Into<String>, nested: Arc<Schema>) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, FieldType::message(nested)));
        self
    }

    /// Add a variable-length array of nested messages.
    pub fn nested_sequence_field(mut self, name: impl Into<String>, nested: Arc<Schema>) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldType::sequence(FieldKind::Message(nested)),
        ));
        self
    }

    /// Declare a named constant.
    pub fn constant(mut self, name: impl Into<String>, kind: FieldKind, value: Value) -> Self {
        self.constants.push(Constant {
            name: name.into(),
            kind,
            value,
        });
        self
    }

    /// Validate and build the Schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::with_constants(self.name, self.fields, self.constants)
    }
}

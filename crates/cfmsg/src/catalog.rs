// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema catalog: the set of known message and service definitions.
//!
//! The catalog is populated during initialization and then frozen into a
//! [`TypeRegistry`](crate::registry::TypeRegistry). A failed registration
//! leaves the catalog unchanged.

use crate::schema::Schema;
use crate::service::ServiceDefinition;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Errors for catalog and registry lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A type with this name is already registered.
    DuplicateType(String),
    /// No type with this name is registered.
    UnknownType(String),
    /// A service with this name is already registered.
    DuplicateService(String),
    /// No service with this name is registered.
    UnknownService(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateType(name) => write!(f, "Type already registered: {}", name),
            Self::UnknownType(name) => write!(f, "Unknown type: {}", name),
            Self::DuplicateService(name) => write!(f, "Service already registered: {}", name),
            Self::UnknownService(name) => write!(f, "Unknown service: {}", name),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Mutable collection of schemas and services, keyed by name.
#[derive(Debug, Default, Clone)]
pub struct SchemaCatalog {
    types: HashMap<String, Arc<Schema>>,
    services: HashMap<String, ServiceDefinition>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its type name.
    pub fn register(&mut self, schema: Schema) -> Result<Arc<Schema>, CatalogError> {
        self.register_arc(Arc::new(schema))
    }

    /// Register a shared schema under its type name.
    pub fn register_arc(&mut self, schema: Arc<Schema>) -> Result<Arc<Schema>, CatalogError> {
        if self.types.contains_key(schema.name()) {
            return Err(CatalogError::DuplicateType(schema.name().to_string()));
        }
        self.insert(schema.clone());
        Ok(schema)
    }

    /// Register a schema and every nested schema it references.
    ///
    /// Nested schemas already present with the same signature are reused.
    pub fn register_with_dependencies(
        &mut self,
        schema: Arc<Schema>,
    ) -> Result<Arc<Schema>, CatalogError> {
        if self.types.contains_key(schema.name()) {
            return Err(CatalogError::DuplicateType(schema.name().to_string()));
        }
        let plan = self.plan(&[&schema])?;
        for pending in plan {
            self.insert(pending);
        }
        Ok(schema)
    }

    /// Look up a schema by type name.
    pub fn lookup(&self, name: &str) -> Result<Arc<Schema>, CatalogError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Register a service along with its request and response schemas.
    ///
    /// Request or response schemas already present with the same signature
    /// are reused.
    pub fn register_service(&mut self, service: ServiceDefinition) -> Result<(), CatalogError> {
        if self.services.contains_key(service.name()) {
            return Err(CatalogError::DuplicateService(service.name().to_string()));
        }
        let plan = self.plan(&[service.request(), service.response()])?;
        for pending in plan {
            self.insert(pending);
        }
        log::debug!(
            "catalog: registered service '{}' ({} -> {})",
            service.name(),
            service.request().name(),
            service.response().name()
        );
        self.services.insert(service.name().to_string(), service);
        Ok(())
    }

    /// Look up a service by name.
    pub fn lookup_service(&self, name: &str) -> Result<ServiceDefinition, CatalogError> {
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownService(name.to_string()))
    }

    pub fn contains_service(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.types.values()
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.services.values()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Number of registered services.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    fn insert(&mut self, schema: Arc<Schema>) {
        log::debug!(
            "catalog: registered type '{}' (signature {})",
            schema.name(),
            schema.signature()
        );
        self.types.insert(schema.name().to_string(), schema);
    }

    /// Schemas reachable from `roots` that are not yet registered, in
    /// dependency order. Fails without side effects on a name conflict.
    fn plan(&self, roots: &[&Arc<Schema>]) -> Result<Vec<Arc<Schema>>, CatalogError> {
        let mut order = Vec::new();
        let mut pending: HashMap<&str, &Arc<Schema>> = HashMap::new();
        let mut visited = HashSet::new();
        for root in roots {
            self.visit(root, &mut visited, &mut pending, &mut order)?;
        }
        Ok(order)
    }

    fn visit<'s>(
        &self,
        schema: &'s Arc<Schema>,
        visited: &mut HashSet<&'s str>,
        pending: &mut HashMap<&'s str, &'s Arc<Schema>>,
        order: &mut Vec<Arc<Schema>>,
    ) -> Result<(), CatalogError> {
        let name = schema.name();
        if let Some(existing) = self.types.get(name).or_else(|| pending.get(name).copied()) {
            if existing.as_ref() != schema.as_ref() {
                return Err(CatalogError::DuplicateType(name.to_string()));
            }
            return Ok(());
        }
        if !visited.insert(name) {
            return Ok(());
        }
        for nested in schema.nested() {
            self.visit(nested, visited, pending, order)?;
        }
        pending.insert(name, schema);
        order.push(schema.clone());
        Ok(())
    }
}

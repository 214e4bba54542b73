// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable type registry.
//!
//! Built once from a [`SchemaCatalog`] snapshot, then shared read-only
//! (`Send + Sync`, no locking on lookups). One instance may be installed
//! process-wide with [`install`] and retrieved with [`global`].

use crate::catalog::{CatalogError, SchemaCatalog};
use crate::codec::{BinaryCodec, Codec, CodecLimits, DecodeError, EncodeError};
use crate::message::Message;
use crate::schema::Schema;
use crate::service::ServiceDefinition;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Errors for registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name lookup failed.
    Lookup(CatalogError),
    /// Encoding through the registry failed.
    Encode(EncodeError),
    /// Decoding through the registry failed.
    Decode(DecodeError),
    /// A process-wide registry is already installed.
    AlreadyInstalled,
    /// No process-wide registry installed yet.
    NotInstalled,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup(e) => write!(f, "{}", e),
            Self::Encode(e) => write!(f, "Encode failed: {}", e),
            Self::Decode(e) => write!(f, "Decode failed: {}", e),
            Self::AlreadyInstalled => write!(f, "Type registry already installed"),
            Self::NotInstalled => write!(f, "Type registry not installed"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lookup(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for RegistryError {
    fn from(e: CatalogError) -> Self {
        Self::Lookup(e)
    }
}

impl From<EncodeError> for RegistryError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl From<DecodeError> for RegistryError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

/// Schema and codec for one registered type.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    schema: Arc<Schema>,
    codec: Arc<dyn Codec>,
}

impl TypeEntry {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    pub fn encode(&self, message: &Message) -> Result<Vec<u8>, EncodeError> {
        self.codec.encode(message, &self.schema)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Message, DecodeError> {
        self.codec.decode(bytes, &self.schema)
    }
}

/// Read-only map from type name to schema and codec, plus services.
#[derive(Debug)]
pub struct TypeRegistry {
    types: HashMap<String, TypeEntry>,
    services: HashMap<String, ServiceDefinition>,
}

impl TypeRegistry {
    /// Snapshot a catalog with the default codec for every type.
    pub fn from_catalog(catalog: &SchemaCatalog) -> Self {
        Self::builder(catalog).build_unchecked()
    }

    /// Start a builder over a catalog snapshot.
    pub fn builder(catalog: &SchemaCatalog) -> TypeRegistryBuilder<'_> {
        TypeRegistryBuilder {
            catalog,
            limits: CodecLimits::default(),
            overrides: HashMap::new(),
        }
    }

    /// Resolve a type name to its schema and codec.
    pub fn resolve(&self, name: &str) -> Result<&TypeEntry, CatalogError> {
        self.types
            .get(name)
            .ok_or_else(|| CatalogError::UnknownType(name.to_string()))
    }

    /// Resolve a service name to its definition.
    pub fn resolve_service(&self, name: &str) -> Result<&ServiceDefinition, CatalogError> {
        self.services
            .get(name)
            .ok_or_else(|| CatalogError::UnknownService(name.to_string()))
    }

    /// Encode a message with the codec registered for `name`.
    pub fn encode(&self, name: &str, message: &Message) -> Result<Vec<u8>, RegistryError> {
        Ok(self.resolve(name)?.encode(message)?)
    }

    /// Decode bytes with the schema and codec registered for `name`.
    pub fn decode(&self, name: &str, bytes: &[u8]) -> Result<Message, RegistryError> {
        Ok(self.resolve(name)?.decode(bytes)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
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

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Builder for [`TypeRegistry`] with per-type codec overrides.
pub struct TypeRegistryBuilder<'c> {
    catalog: &'c SchemaCatalog,
    limits: CodecLimits,
    overrides: HashMap<String, Arc<dyn Codec>>,
}

impl TypeRegistryBuilder<'_> {
    /// Limits for the default codec.
    pub fn limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Use `codec` for `type_name` instead of the default.
    pub fn codec(mut self, type_name: impl Into<String>, codec: Arc<dyn Codec>) -> Self {
        self.overrides.insert(type_name.into(), codec);
        self
    }

    /// Build the registry. Fails if an override names an unknown type.
    pub fn build(self) -> Result<TypeRegistry, CatalogError> {
        let mut unknown: Vec<&String> = self
            .overrides
            .keys()
            .filter(|name| !self.catalog.contains(name))
            .collect();
        unknown.sort();
        if let Some(name) = unknown.first() {
            return Err(CatalogError::UnknownType((*name).clone()));
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(mut self) -> TypeRegistry {
        let default_codec: Arc<dyn Codec> = Arc::new(BinaryCodec::with_limits(self.limits));

        let types: HashMap<String, TypeEntry> = self
            .catalog
            .schemas()
            .map(|schema| {
                let codec = self
                    .overrides
                    .remove(schema.name())
                    .unwrap_or_else(|| default_codec.clone());
                (
                    schema.name().to_string(),
                    TypeEntry {
                        schema: schema.clone(),
                        codec,
                    },
                )
            })
            .collect();

        let services: HashMap<String, ServiceDefinition> = self
            .catalog
            .services()
            .map(|service| (service.name().to_string(), service.clone()))
            .collect();

        log::debug!(
            "registry: built with {} types and {} services",
            types.len(),
            services.len()
        );
        TypeRegistry { types, services }
    }
}

/// Install the process-wide registry. Succeeds exactly once.
pub fn install(registry: TypeRegistry) -> Result<Arc<TypeRegistry>, RegistryError> {
    let registry = Arc::new(registry);
    GLOBAL_REGISTRY
        .set(registry.clone())
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    log::debug!("registry: installed process-wide ({} types)", registry.len());
    Ok(registry)
}

/// The process-wide registry, if installed.
pub fn global() -> Result<Arc<TypeRegistry>, RegistryError> {
    GLOBAL_REGISTRY
        .get()
        .cloned()
        .ok_or(RegistryError::NotInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, SchemaBuilder};

    /// Codec that prefixes every payload with a marker byte.
    #[derive(Debug)]
    struct MarkedCodec;

    impl Codec for MarkedCodec {
        fn name(&self) -> &str {
            "marked"
        }

        fn encode(&self, message: &Message, schema: &Schema) -> Result<Vec<u8>, EncodeError> {
            let mut bytes = vec![0xAA];
            bytes.extend(crate::codec::encode(message, schema)?);
            Ok(bytes)
        }

        fn decode(&self, bytes: &[u8], schema: &Arc<Schema>) -> Result<Message, DecodeError> {
            crate::codec::decode(bytes.get(1..).unwrap_or_default(), schema)
        }
    }

    fn catalog() -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new();
        for name in ["StopRequest", "SetGroupMaskRequest"] {
            catalog
                .register(
                    SchemaBuilder::new(name)
                        .field("groupMask", FieldKind::U8)
                        .build()
                        .expect("schema"),
                )
                .expect("register");
        }
        catalog
    }

    #[test]
    fn test_resolve_and_round_trip() {
        let registry = TypeRegistry::from_catalog(&catalog());
        let entry = registry.resolve("StopRequest").expect("resolve");
        assert_eq!(entry.codec().name(), "binary");

        let msg = Message::new(entry.schema()).with("groupMask", 7u8).expect("set");
        let bytes = registry.encode("StopRequest", &msg).expect("encode");
        assert_eq!(bytes, vec![7]);
        assert_eq!(registry.decode("StopRequest", &bytes), Ok(msg));
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::from_catalog(&catalog());
        assert_eq!(
            registry.resolve("Nope").map(|_| ()),
            Err(CatalogError::UnknownType("Nope".into()))
        );
        assert_eq!(
            registry.decode("Nope", &[]),
            Err(RegistryError::Lookup(CatalogError::UnknownType("Nope".into())))
        );
        assert!(registry.resolve_service("Nope").is_err());
    }

    #[test]
    fn test_codec_override() {
        let catalog = catalog();
        let registry = TypeRegistry::builder(&catalog)
            .codec("StopRequest", Arc::new(MarkedCodec))
            .build()
            .expect("build");

        let entry = registry.resolve("StopRequest").expect("resolve");
        let msg = Message::new(entry.schema()).with("groupMask", 1u8).expect("set");
        assert_eq!(entry.encode(&msg), Ok(vec![0xAA, 1]));
        assert_eq!(
            registry.resolve("SetGroupMaskRequest").map(|e| e.codec().name()),
            Ok("binary")
        );
    }

    #[test]
    fn test_override_for_unknown_type_rejected() {
        let catalog = catalog();
        let err = TypeRegistry::builder(&catalog)
            .codec("Missing", Arc::new(MarkedCodec))
            .build()
            .unwrap_err();
        assert_eq!(err, CatalogError::UnknownType("Missing".into()));
    }

    #[test]
    fn test_registry_is_snapshot() {
        let mut catalog = catalog();
        let registry = TypeRegistry::from_catalog(&catalog);
        catalog
            .register(SchemaBuilder::new("Late").build().expect("schema"))
            .expect("register");
        assert!(!registry.contains("Late"));
        assert_eq!(registry.type_names(), vec!["SetGroupMaskRequest", "StopRequest"]);
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeRegistry>();
        assert_send_sync::<TypeEntry>();
    }
}

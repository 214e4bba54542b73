// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # cfmsg - Crazyflie driver message and service types
//!
//! Runtime schemas for ROS-style `.msg` / `.srv` interfaces, a binary wire
//! codec, a name-indexed type registry and a service dispatcher that turns
//! request bytes into response bytes through a registered handler.
//!
//! ## Quick Start
//!
//! ```rust
//! use cfmsg::{Message, SchemaCatalog, ServiceDispatcher, TypeRegistry};
//! use std::sync::Arc;
//!
//! let mut catalog = SchemaCatalog::new();
//! cfmsg::interfaces::load_builtin(&mut catalog).unwrap();
//! let registry = Arc::new(TypeRegistry::from_catalog(&catalog));
//!
//! // Encode a packet by type name
//! let packet = catalog.lookup("crazyflie_driver/crtpPacket").unwrap();
//! let msg = Message::zeroed(&packet).with("header", 0x3Cu8).unwrap();
//! let bytes = registry.encode("crazyflie_driver/crtpPacket", &msg).unwrap();
//! assert_eq!(bytes.len(), 36);
//!
//! // Serve a service
//! let response = catalog.lookup("crazyflie_driver/SetGroupMaskResponse").unwrap();
//! let mut dispatcher = ServiceDispatcher::new(registry.clone());
//! dispatcher
//!     .register_handler("crazyflie_driver/SetGroupMask", move |_req: Message| -> Result<Message, String> {
//!         Ok(Message::new(&response))
//!     })
//!     .unwrap();
//! let response = dispatcher.call("crazyflie_driver/SetGroupMask", &[0x02]).unwrap();
//! assert!(response.is_empty());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |   idl (.msg/.srv text)  ->  SchemaCatalog  <-  interfaces (built-in) |
//! +---------------------------------------------------------------------+
//! |   TypeRegistry: name -> (Schema, Codec), frozen at startup          |
//! +---------------------------------------------------------------------+
//! |   ServiceDispatcher: bytes -> decode -> handler -> encode -> bytes  |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Schema`] | Ordered, named, typed fields of one message type |
//! | [`Message`] | Field values conforming to a schema |
//! | [`SchemaCatalog`] | Registration-time collection of schemas and services |
//! | [`TypeRegistry`] | Immutable lookup of schema and codec by type name |
//! | [`ServiceDispatcher`] | Routes encoded requests to service handlers |
//!
//! ## Features
//!
//! - `async` (default): [`ServiceDispatcher::call_async`] and
//!   [`ServiceDispatcher::call_cancellable`] on the tokio blocking pool
//! - `loaders` (default): YAML [`config`] and the [`json`] message view

/// Crate-level error type.
pub mod error;
/// Field values.
pub mod value;
/// Message schemas: fields, constants, signatures.
pub mod schema;
/// Dynamic messages.
pub mod message;
/// Binary wire codec.
pub mod codec;
/// Registration-time schema and service catalog.
pub mod catalog;
/// Frozen type registry and the process-wide instance.
pub mod registry;
/// Service definitions, handlers and dispatch.
pub mod service;
/// `.msg` / `.srv` definition parser.
pub mod idl;
/// Built-in `crazyflie_driver` interfaces.
pub mod interfaces;
/// YAML configuration.
#[cfg(feature = "loaders")]
pub mod config;
/// JSON view of messages.
#[cfg(feature = "loaders")]
pub mod json;

pub use catalog::{CatalogError, SchemaCatalog};
pub use codec::{BinaryCodec, Codec, CodecLimits, DecodeError, EncodeError};
pub use error::{Error, Result};
pub use message::{Message, MessageError};
pub use registry::{RegistryError, TypeEntry, TypeRegistry};
pub use schema::{FieldDescriptor, FieldKind, FieldType, Schema, SchemaBuilder, Signature};
pub use service::{DispatchError, ServiceDefinition, ServiceDispatcher, ServiceHandler};
pub use value::{FromValue, Value};

#[cfg(feature = "loaders")]
pub use config::Config;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

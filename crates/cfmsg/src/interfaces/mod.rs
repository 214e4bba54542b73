// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in interface definitions.
//!
//! The `crazyflie_driver` package with the `std_msgs` and `geometry_msgs`
//! types it references. This table is the name-to-definition index that
//! callers resolve against; it replaces per-type generated modules.
//!
//! # Example
//!
//! ```rust
//! let catalog = cfmsg::interfaces::builtin_catalog().unwrap();
//! let takeoff = catalog.lookup_service("crazyflie_driver/Takeoff").unwrap();
//! assert_eq!(takeoff.request().name(), "crazyflie_driver/TakeoffRequest");
//! ```

mod common;
mod crazyflie_driver;

use crate::catalog::SchemaCatalog;
use crate::idl::{InterfaceSet, ParseError, RegisterError, RegisterSummary};

/// Message type names of the `crazyflie_driver` package.
pub const MESSAGE_TYPES: &[&str] = &[
    "crazyflie_driver/LogBlock",
    "crazyflie_driver/Hover",
    "crazyflie_driver/TrajectoryPolynomialPiece",
    "crazyflie_driver/FullState",
    "crazyflie_driver/GenericLogData",
    "crazyflie_driver/crtpPacket",
    "crazyflie_driver/Position",
];

/// Service names of the `crazyflie_driver` package.
pub const SERVICE_TYPES: &[&str] = &[
    "crazyflie_driver/SetGroupMask",
    "crazyflie_driver/UploadTrajectory",
    "crazyflie_driver/UpdateParams",
    "crazyflie_driver/StartTrajectory",
    "crazyflie_driver/AddCrazyflie",
    "crazyflie_driver/sendPacket",
    "crazyflie_driver/Takeoff",
    "crazyflie_driver/RemoveCrazyflie",
    "crazyflie_driver/UploadNN",
    "crazyflie_driver/Stop",
    "crazyflie_driver/GoTo",
    "crazyflie_driver/Land",
];

/// Whether an [`Interface`] holds `.msg` or `.srv` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Message,
    Service,
}

/// One built-in definition.
#[derive(Debug, Clone, Copy)]
pub struct Interface {
    pub package: &'static str,
    pub name: &'static str,
    pub kind: InterfaceKind,
    pub text: &'static str,
}

impl Interface {
    /// `package/Name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.package, self.name)
    }
}

/// Every built-in definition, dependencies first.
pub fn definitions() -> impl Iterator<Item = &'static Interface> {
    common::DEFINITIONS
        .iter()
        .chain(crazyflie_driver::DEFINITIONS.iter())
}

/// Look up the definition text of a built-in message or service.
pub fn definition(full_name: &str) -> Option<&'static Interface> {
    definitions().find(|i| i.full_name() == full_name)
}

/// Add every built-in definition to an interface set.
pub fn add_builtin(set: &mut InterfaceSet) -> Result<(), ParseError> {
    for interface in definitions() {
        match interface.kind {
            InterfaceKind::Message => {
                set.add_message_text(interface.package, interface.name, interface.text)?
            }
            InterfaceKind::Service => {
                set.add_service_text(interface.package, interface.name, interface.text)?
            }
        }
    }
    Ok(())
}

/// Register the built-in interfaces into `catalog`.
pub fn load_builtin(catalog: &mut SchemaCatalog) -> Result<RegisterSummary, RegisterError> {
    let mut set = InterfaceSet::new();
    add_builtin(&mut set)?;
    let summary = set.register_into(catalog)?;
    log::debug!(
        "interfaces: loaded {} built-in types and {} services",
        summary.types.len(),
        summary.services.len()
    );
    Ok(summary)
}

/// A catalog holding only the built-in interfaces.
pub fn builtin_catalog() -> Result<SchemaCatalog, RegisterError> {
    let mut catalog = SchemaCatalog::new();
    load_builtin(&mut catalog)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArrayMarker, FieldKind};

    #[test]
    fn test_all_listed_types_load() {
        let catalog = builtin_catalog().expect("builtin");
        for name in MESSAGE_TYPES {
            assert!(catalog.contains(name), "missing message {}", name);
        }
        for name in SERVICE_TYPES {
            let service = catalog.lookup_service(name).expect("service");
            assert!(catalog.contains(service.request().name()));
            assert!(catalog.contains(service.response().name()));
        }
        assert_eq!(catalog.service_count(), SERVICE_TYPES.len());
    }

    #[test]
    fn test_crtp_packet_layout() {
        let catalog = builtin_catalog().expect("builtin");
        let packet = catalog.lookup("crazyflie_driver/crtpPacket").expect("packet");
        let data = packet.field("data").expect("data");
        assert_eq!(*data.kind(), FieldKind::U8);
        assert_eq!(data.field_type().array(), Some(ArrayMarker::Fixed(30)));
        assert_eq!(packet.fixed_size(), Some(36));
    }

    #[test]
    fn test_header_resolves_to_std_msgs() {
        let catalog = builtin_catalog().expect("builtin");
        let position = catalog.lookup("crazyflie_driver/Position").expect("position");
        let header = position.field("header").and_then(|f| f.kind().nested()).expect("header");
        assert_eq!(header.name(), "std_msgs/Header");
        assert_eq!(header.field("stamp").and_then(|f| f.kind().nested()).map(|s| s.name()), Some("time"));
    }

    #[test]
    fn test_load_twice_is_idempotent_for_types() {
        let mut catalog = SchemaCatalog::new();
        load_builtin(&mut catalog).expect("first");
        let err = load_builtin(&mut catalog).unwrap_err();
        assert!(matches!(
            err,
            RegisterError::Catalog(crate::catalog::CatalogError::DuplicateService(_))
        ));
    }

    #[test]
    fn test_definition_lookup() {
        let takeoff = definition("crazyflie_driver/Takeoff").expect("takeoff");
        assert_eq!(takeoff.kind, InterfaceKind::Service);
        assert!(takeoff.text.contains("float32 height"));
        assert!(definition("crazyflie_driver/Nope").is_none());
    }
}

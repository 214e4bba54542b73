// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code

//! Built-in `crazyflie_driver` interfaces through the registry.
//!
//! Golden byte layouts for service requests the driver sends most, and
//! round trips through nested and array-of-message fields.

use cfmsg::interfaces::{self, MESSAGE_TYPES, SERVICE_TYPES};
use cfmsg::{DecodeError, Message, RegistryError, TypeRegistry, Value};

fn registry() -> TypeRegistry {
    let catalog = interfaces::builtin_catalog().expect("builtin catalog");
    TypeRegistry::from_catalog(&catalog)
}

fn zeroed(registry: &TypeRegistry, name: &str) -> Message {
    let entry = registry.resolve(name).expect("resolve");
    Message::zeroed(entry.schema())
}

#[test]
fn every_listed_type_resolves() {
    let registry = registry();
    for name in MESSAGE_TYPES {
        assert!(registry.contains(name), "missing {}", name);
    }
    for name in SERVICE_TYPES {
        let service = registry.resolve_service(name).expect("service");
        assert!(registry.contains(service.request().name()));
        assert!(registry.contains(service.response().name()));
    }
    assert!(registry.contains("time"));
    assert!(registry.contains("duration"));
}

#[test]
fn takeoff_request_golden_bytes() {
    let registry = registry();
    let duration = zeroed(&registry, "duration")
        .with("secs", 2i32)
        .expect("secs");
    let request = zeroed(&registry, "crazyflie_driver/TakeoffRequest")
        .with("height", 0.5f32)
        .expect("height")
        .with("duration", duration)
        .expect("duration");

    let bytes = registry
        .encode("crazyflie_driver/TakeoffRequest", &request)
        .expect("encode");
    assert_eq!(
        bytes,
        vec![
            0x00, // groupMask
            0x00, 0x00, 0x00, 0x3F, // height = 0.5
            0x02, 0x00, 0x00, 0x00, // duration.secs
            0x00, 0x00, 0x00, 0x00, // duration.nsecs
        ]
    );

    let back = registry
        .decode("crazyflie_driver/TakeoffRequest", &bytes)
        .expect("decode");
    assert_eq!(back, request);
}

#[test]
fn go_to_request_layout() {
    let registry = registry();
    let goal = zeroed(&registry, "geometry_msgs/Point")
        .with("x", 1.0f64)
        .expect("x")
        .with("z", -0.25f64)
        .expect("z");
    let request = zeroed(&registry, "crazyflie_driver/GoToRequest")
        .with("groupMask", 1u8)
        .expect("mask")
        .with("relative", true)
        .expect("relative")
        .with("goal", goal)
        .expect("goal")
        .with("yaw", 90.0f32)
        .expect("yaw");

    let bytes = registry
        .encode("crazyflie_driver/GoToRequest", &request)
        .expect("encode");
    assert_eq!(bytes.len(), 1 + 1 + 24 + 4 + 8);
    assert_eq!(&bytes[..2], &[0x01, 0x01]);
    assert_eq!(&bytes[2..10], &1.0f64.to_le_bytes());
    assert_eq!(&bytes[18..26], &(-0.25f64).to_le_bytes());

    let back = registry
        .decode("crazyflie_driver/GoToRequest", &bytes)
        .expect("decode");
    assert_eq!(back, request);
}

#[test]
fn add_crazyflie_with_log_blocks_round_trip() {
    let registry = registry();
    let block = |topic: &str, freq: i16, vars: &[&str]| {
        Value::Message(
            zeroed(&registry, "crazyflie_driver/LogBlock")
                .with("topic_name", topic)
                .expect("topic")
                .with("frequency", freq)
                .expect("freq")
                .with(
                    "variables",
                    Value::Array(vars.iter().map(|v| Value::from(*v)).collect()),
                )
                .expect("vars"),
        )
    };
    let blocks = Value::Array(vec![
        block("battery", 10, &["pm.vbat"]),
        block("pose", 100, &["stateEstimate.x", "stateEstimate.y"]),
    ]);

    let request = zeroed(&registry, "crazyflie_driver/AddCrazyflieRequest")
        .with("uri", "radio://0/80/2M/E7E7E7E701")
        .expect("uri")
        .with("tf_prefix", "cf1")
        .expect("tf")
        .with("enable_logging", true)
        .expect("logging")
        .with("log_blocks", blocks)
        .expect("blocks");

    let bytes = registry
        .encode("crazyflie_driver/AddCrazyflieRequest", &request)
        .expect("encode");
    let back = registry
        .decode("crazyflie_driver/AddCrazyflieRequest", &bytes)
        .expect("decode");
    assert_eq!(back, request);
    assert_eq!(
        back.get::<String>("uri").expect("uri"),
        "radio://0/80/2M/E7E7E7E701"
    );
}

#[test]
fn send_packet_uses_fixed_payload() {
    let registry = registry();
    let packet = zeroed(&registry, "crazyflie_driver/crtpPacket")
        .with("size", 3u8)
        .expect("size")
        .with("data", {
            let mut data = vec![0u8; 30];
            data[..3].copy_from_slice(&[0xAA, 0xBB, 0xCC]);
            Value::Bytes(data)
        })
        .expect("data");
    let request = zeroed(&registry, "crazyflie_driver/sendPacketRequest")
        .with("packet", packet)
        .expect("packet");

    let bytes = registry
        .encode("crazyflie_driver/sendPacketRequest", &request)
        .expect("encode");
    assert_eq!(bytes.len(), 36);
    assert_eq!(&bytes[2..6], &30u32.to_le_bytes());
    assert_eq!(&bytes[6..9], &[0xAA, 0xBB, 0xCC]);
}

#[test]
fn truncated_full_state_is_rejected() {
    let registry = registry();
    let state = zeroed(&registry, "crazyflie_driver/FullState");
    let bytes = registry
        .encode("crazyflie_driver/FullState", &state)
        .expect("encode");

    let err = registry
        .decode("crazyflie_driver/FullState", &bytes[..bytes.len() - 1])
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Decode(DecodeError::TruncatedInput { .. })
    ));
}

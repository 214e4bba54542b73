// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![cfg(feature = "loaders")]
#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::cast_possible_truncation)] // Test parameters

//! Configuration-driven setup end to end.
//!
//! A YAML file points at an interface directory holding a custom service;
//! the registry built from it serves calls through the dispatcher and the
//! JSON view.

use cfmsg::json::{from_json, to_json};
use cfmsg::service::{DispatchError, HandlerFailure};
use cfmsg::{Config, DecodeError, Message, ServiceDispatcher};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const SET_LED: &str = "swarm_msgs/SetLed";

fn write_interfaces(root: &Path) {
    let srv_dir = root.join("interfaces").join("swarm_msgs").join("srv");
    fs::create_dir_all(&srv_dir).expect("mkdir");
    fs::write(
        srv_dir.join("SetLed.srv"),
        "\
# Set the LED ring colour of one drone.
uint8 MODE_SOLID=0
uint8 MODE_BLINK=1
string uri
uint8 mode
uint8[3] rgb
---
bool accepted
string message
",
    )
    .expect("write srv");

    fs::write(
        root.join("cfmsg.yaml"),
        "\
limits:
  max_message_size: 4096
interface_dirs:
  - interfaces
",
    )
    .expect("write config");
}

fn dispatcher(config: &Config) -> Arc<ServiceDispatcher> {
    let registry = Arc::new(config.build_registry().expect("registry"));
    let response_schema = registry
        .resolve_service(SET_LED)
        .expect("service")
        .response()
        .clone();

    let mut dispatcher = ServiceDispatcher::new(registry);
    dispatcher
        .register_handler(SET_LED, move |req: Message| -> Result<Message, String> {
            let uri = req.get::<String>("uri").map_err(|e| e.to_string())?;
            if uri.is_empty() {
                return Err("empty uri".to_string());
            }
            let rgb = req.get::<Vec<u8>>("rgb").map_err(|e| e.to_string())?;
            Message::zeroed(&response_schema)
                .with("accepted", true)
                .and_then(|m| m.with("message", format!("{} -> {:?}", uri, rgb)))
                .map_err(|e| e.to_string())
        })
        .expect("register");
    Arc::new(dispatcher)
}

#[test]
fn yaml_config_builds_custom_service() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_interfaces(dir.path());
    let config = Config::from_file(dir.path().join("cfmsg.yaml")).expect("config");
    assert_eq!(config.limits.max_message_size, 4096);

    let dispatcher = dispatcher(&config);
    let registry = dispatcher.registry().clone();
    let request_schema = registry
        .resolve("swarm_msgs/SetLedRequest")
        .expect("request")
        .schema()
        .clone();
    assert_eq!(
        request_schema.constant("MODE_BLINK").map(|c| c.value.clone()),
        Some(cfmsg::Value::U8(1))
    );

    let request = from_json(
        &request_schema,
        &json!({"uri": "radio://0/80/2M/E7E7E7E701", "mode": 1, "rgb": [255, 0, 64]}),
    )
    .expect("json");
    let bytes = registry
        .encode("swarm_msgs/SetLedRequest", &request)
        .expect("encode");

    let response_bytes = dispatcher.call(SET_LED, &bytes).expect("call");
    let response = registry
        .decode("swarm_msgs/SetLedResponse", &response_bytes)
        .expect("decode");
    let view = to_json(&response);
    assert_eq!(view["accepted"], json!(true));
    assert_eq!(
        view["message"],
        json!("radio://0/80/2M/E7E7E7E701 -> [255, 0, 64]")
    );
}

#[test]
fn configured_limit_rejects_oversized_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_interfaces(dir.path());
    let config = Config::from_file(dir.path().join("cfmsg.yaml")).expect("config");
    let dispatcher = dispatcher(&config);

    let oversized = vec![0u8; 5000];
    let err = dispatcher.call(SET_LED, &oversized).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::BadRequest {
            source: DecodeError::LimitExceeded { .. },
            ..
        }
    ));
    assert_eq!(dispatcher.stats().failed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_async_calls_keep_their_responses() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_interfaces(dir.path());
    let config = Config::from_file(dir.path().join("cfmsg.yaml")).expect("config");
    let dispatcher = dispatcher(&config);
    let registry = dispatcher.registry().clone();
    let request_schema = registry
        .resolve("swarm_msgs/SetLedRequest")
        .expect("request")
        .schema()
        .clone();

    let mut tasks = Vec::new();
    for i in 0..50u32 {
        let dispatcher = dispatcher.clone();
        let registry = registry.clone();
        let schema = request_schema.clone();
        tasks.push(tokio::spawn(async move {
            let uri = if i % 10 == 0 {
                String::new()
            } else {
                format!("radio://0/80/2M/E7E7E7E7{:02}", i)
            };
            let request = Message::zeroed(&schema).with("uri", uri.clone()).expect("uri");
            let bytes = registry
                .encode("swarm_msgs/SetLedRequest", &request)
                .expect("encode");
            (i, uri, dispatcher.call_async(SET_LED, bytes).await)
        }));
    }

    for task in tasks {
        let (i, uri, result) = task.await.expect("join");
        if i % 10 == 0 {
            let err = result.unwrap_err();
            assert!(matches!(
                err,
                DispatchError::HandlerError {
                    failure: HandlerFailure::Failed(ref m),
                    ..
                } if m == "empty uri"
            ));
        } else {
            let response = registry
                .decode("swarm_msgs/SetLedResponse", &result.expect("call"))
                .expect("decode");
            let message = response.get::<String>("message").expect("message");
            assert!(message.starts_with(&uri), "{} vs {}", message, uri);
        }
    }

    let stats = dispatcher.stats();
    assert_eq!(stats.completed, 45);
    assert_eq!(stats.failed, 5);
}

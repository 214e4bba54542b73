// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec Benchmark
//!
//! Encode and decode cost for representative driver messages:
//! - fixed-size `crtpPacket` (the radio hot path)
//! - `GenericLogData` with a growing `float64[]` payload
//! - full service dispatch of a `GoTo` request

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]

use cfmsg::interfaces;
use cfmsg::{Message, ServiceDispatcher, TypeRegistry, Value};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

fn registry() -> Arc<TypeRegistry> {
    let catalog = interfaces::builtin_catalog().expect("builtin catalog");
    Arc::new(TypeRegistry::from_catalog(&catalog))
}

fn zeroed(registry: &TypeRegistry, name: &str) -> Message {
    Message::zeroed(registry.resolve(name).expect("resolve").schema())
}

fn bench_crtp_packet(c: &mut Criterion) {
    let registry = registry();
    let packet = zeroed(&registry, "crazyflie_driver/crtpPacket")
        .with("header", 0x3Cu8)
        .expect("header")
        .with("data", Value::Bytes(vec![0x5A; 30]))
        .expect("data");
    let bytes = registry
        .encode("crazyflie_driver/crtpPacket", &packet)
        .expect("encode");

    let mut group = c.benchmark_group("crtp_packet");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("encode", |b| {
        b.iter(|| registry.encode("crazyflie_driver/crtpPacket", black_box(&packet)))
    });
    group.bench_function("decode", |b| {
        b.iter(|| registry.decode("crazyflie_driver/crtpPacket", black_box(&bytes)))
    });
    group.finish();
}

fn bench_log_data(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("generic_log_data");

    for count in [8usize, 64, 512, 4096] {
        let values: Vec<f64> = (0..count).map(|i| i as f64 * 0.5).collect();
        let msg = zeroed(&registry, "crazyflie_driver/GenericLogData")
            .with("values", values)
            .expect("values");
        let bytes = registry
            .encode("crazyflie_driver/GenericLogData", &msg)
            .expect("encode");

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", count), &msg, |b, msg| {
            b.iter(|| registry.encode("crazyflie_driver/GenericLogData", black_box(msg)))
        });
        group.bench_with_input(BenchmarkId::new("decode", count), &bytes, |b, bytes| {
            b.iter(|| registry.decode("crazyflie_driver/GenericLogData", black_box(bytes)))
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let registry = registry();
    let response = registry
        .resolve_service("crazyflie_driver/GoTo")
        .expect("service")
        .response()
        .clone();
    let mut dispatcher = ServiceDispatcher::new(registry.clone());
    dispatcher
        .register_handler("crazyflie_driver/GoTo", move |_req: Message| -> Result<Message, String> {
            Ok(Message::new(&response))
        })
        .expect("register");

    let request = zeroed(&registry, "crazyflie_driver/GoToRequest")
        .with("yaw", 45.0f32)
        .expect("yaw");
    let bytes = registry
        .encode("crazyflie_driver/GoToRequest", &request)
        .expect("encode");

    c.bench_function("dispatch_go_to", |b| {
        b.iter(|| dispatcher.call("crazyflie_driver/GoTo", black_box(&bytes)))
    });
}

criterion_group!(benches, bench_crtp_packet, bench_log_data, bench_dispatch);
criterion_main!(benches);

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cfmsg::{interfaces, TypeRegistry};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

static REGISTRY: OnceLock<Option<TypeRegistry>> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let Some(registry) = REGISTRY
        .get_or_init(|| {
            interfaces::builtin_catalog()
                .ok()
                .map(|catalog| TypeRegistry::from_catalog(&catalog))
        })
        .as_ref()
    else {
        return;
    };
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    // First byte picks the type, the rest is the payload
    let names = registry.type_names();
    let name = names[usize::from(selector) % names.len()];

    if let Ok(message) = registry.decode(name, payload) {
        // Anything that decodes must re-encode, and the result decode again.
        // Bytes may differ: any non-zero bool byte re-encodes as 1.
        let bytes = registry.encode(name, &message).expect("re-encode");
        assert_eq!(bytes.len(), payload.len(), "{} length", name);
        registry.decode(name, &bytes).expect("re-decode");
    }
});

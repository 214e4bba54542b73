// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cfmsg::idl::{parse_message, parse_service, InterfaceSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Fuzz .msg parser
    let _ = parse_message("fuzz_msgs", "Sample", text);

    // Fuzz .srv parser
    let _ = parse_service("fuzz_msgs", "Call", text);

    // Fuzz resolution (cycles, unresolved references)
    let mut set = InterfaceSet::new();
    if set.add_message_text("fuzz_msgs", "Sample", text).is_ok() {
        let _ = set.into_catalog();
    }
});

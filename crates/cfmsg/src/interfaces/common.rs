// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `std_msgs` and `geometry_msgs` types referenced by the driver interfaces.

use super::{Interface, InterfaceKind};

pub(super) const DEFINITIONS: &[Interface] = &[
    Interface {
        package: "std_msgs",
        name: "Header",
        kind: InterfaceKind::Message,
        text: "\
# Standard metadata for higher-level stamped data types.
uint32 seq
time stamp
string frame_id
",
    },
    Interface {
        package: "geometry_msgs",
        name: "Point",
        kind: InterfaceKind::Message,
        text: "\
float64 x
float64 y
float64 z
",
    },
    Interface {
        package: "geometry_msgs",
        name: "Vector3",
        kind: InterfaceKind::Message,
        text: "\
float64 x
float64 y
float64 z
",
    },
    Interface {
        package: "geometry_msgs",
        name: "Quaternion",
        kind: InterfaceKind::Message,
        text: "\
float64 x
float64 y
float64 z
float64 w
",
    },
    Interface {
        package: "geometry_msgs",
        name: "Pose",
        kind: InterfaceKind::Message,
        text: "\
Point position
Quaternion orientation
",
    },
    Interface {
        package: "geometry_msgs",
        name: "Twist",
        kind: InterfaceKind::Message,
        text: "\
Vector3 linear
Vector3 angular
",
    },
];

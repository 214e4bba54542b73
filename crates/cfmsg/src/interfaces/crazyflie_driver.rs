// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `crazyflie_driver` messages and services.

use super::{Interface, InterfaceKind};

const PACKAGE: &str = "crazyflie_driver";

const fn msg(name: &'static str, text: &'static str) -> Interface {
    Interface {
        package: PACKAGE,
        name,
        kind: InterfaceKind::Message,
        text,
    }
}

const fn srv(name: &'static str, text: &'static str) -> Interface {
    Interface {
        package: PACKAGE,
        name,
        kind: InterfaceKind::Service,
        text,
    }
}

pub(super) const DEFINITIONS: &[Interface] = &[
    msg(
        "LogBlock",
        "\
string topic_name
int16 frequency
string[] variables
",
    ),
    msg(
        "Hover",
        "\
Header header
float32 vx
float32 vy
float32 yawrate
float32 zDistance
",
    ),
    msg(
        "TrajectoryPolynomialPiece",
        "\
float32[] poly_x
float32[] poly_y
float32[] poly_z
float32[] poly_yaw
duration duration
",
    ),
    msg(
        "FullState",
        "\
Header header
geometry_msgs/Pose pose
geometry_msgs/Twist twist
geometry_msgs/Vector3 acc
",
    ),
    msg(
        "GenericLogData",
        "\
Header header
float64[] values
",
    ),
    msg(
        "crtpPacket",
        "\
uint8 size
uint8 header
uint8[30] data
",
    ),
    msg(
        "Position",
        "\
Header header
float32 x
float32 y
float32 z
float32 yaw
",
    ),
    srv(
        "SetGroupMask",
        "\
uint8 groupMask
---
",
    ),
    srv(
        "UploadTrajectory",
        "\
uint8 trajectoryId
uint32 pieceOffset
TrajectoryPolynomialPiece[] pieces
---
",
    ),
    srv(
        "UpdateParams",
        "\
string[] params
---
",
    ),
    srv(
        "StartTrajectory",
        "\
uint8 groupMask
uint8 trajectoryId
float32 timescale
bool reversed
bool relative
---
",
    ),
    srv(
        "AddCrazyflie",
        "\
string uri
string tf_prefix
geometry_msgs/Point initial_position
float32 roll_trim
float32 pitch_trim
bool enable_logging
bool enable_parameters
LogBlock[] log_blocks
bool use_ros_time
bool enable_logging_imu
bool enable_logging_temperature
bool enable_logging_magnetic_field
bool enable_logging_pressure
bool enable_logging_battery
bool enable_logging_packets
---
",
    ),
    srv(
        "sendPacket",
        "\
crtpPacket packet
---
",
    ),
    srv(
        "Takeoff",
        "\
uint8 groupMask
float32 height
duration duration
---
",
    ),
    srv(
        "RemoveCrazyflie",
        "\
string uri
---
",
    ),
    srv(
        "UploadNN",
        "\
# Network weights, uploaded in chunks starting at offset.
uint8 groupMask
uint32 offset
uint8[] data
---
",
    ),
    srv(
        "Stop",
        "\
uint8 groupMask
---
",
    ),
    srv(
        "GoTo",
        "\
uint8 groupMask
bool relative
geometry_msgs/Point goal
float32 yaw # deg
duration duration
---
",
    ),
    srv(
        "Land",
        "\
uint8 groupMask
float32 height
duration duration
---
",
    ),
];

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic. Every driver is generic over embedded-hal 1.0 traits and small timer traits
//! so it runs unchanged against the host test doubles.
//!
//! ## Existing drivers
//!
//! - [`hbridge`] – brushed DC motor H-bridge, one PWM input and two direction pins
//! - [`hcsr04`] – HC-SR04 ultrasonic ranger driven by edge and timer interrupts
//! - [`touchscreen`] – 4-wire resistive touch panel acquisition, calibration and debounce

pub mod hbridge;
pub mod hcsr04;
pub mod touchscreen;

pub use hbridge::HBridge;
pub use hcsr04::{Echo, EchoRanger, EchoTimer, PulseTimer, RangerConfig, RangerState};
pub use touchscreen::{TouchEvent, TouchEventKind, TouchHandler, TouchPanel, TouchScreen};

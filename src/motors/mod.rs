// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! This module contains actuator-level wrappers that sit above the PWM channels.
//!
//! ## Modules
//!
//! - [`gait`] - Four leg servos driven by a command byte.

pub mod gait;

pub use gait::{QuadGait, ServoLeg};

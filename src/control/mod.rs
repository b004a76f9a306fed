// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module provides the building blocks of the motor position loop and the sensor
//! conditioning used by the range sensors.
//!
//! ## Modules
//!
//! - [`tracker`] - Encoder position, direction and RPM per velocity tick.
//! - [`pid`] - Integer P+I and floating-point P+I+D position controllers.
//! - [`position`] - Closed-loop shaft position controller driving an H-bridge.
//! - [`filter`] - Glitch rejection and ADC averaging for range readings.

pub mod filter;
pub mod pid;
pub mod position;
pub mod tracker;

pub use filter::{quantized_mean, ChangeFilter};
pub use pid::{ControlOutput, ControlState, Direction, Pid, PidConfig, Policy};
pub use position::{PositionController, PositionMode};
pub use tracker::{
    CounterSampler, EncoderConfig, EncoderState, EncoderTracker, QeiSample, WrapMode,
};

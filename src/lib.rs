// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Humper Firmware
//!
//! This crate contains the firmware components for the Humper robot, a four-legged servo walker
//! with an HC-SR04 range sensor, plus the encoder-driven DC motor position loop and resistive
//! touch panel support of the same board family. It targets an STM32F777 MCU; everything outside
//! [`hw`] is hardware-agnostic and tested on the host.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around LEDs, USART, timers, PWM and the encoder counter |
//! | [`drivers`] | Device-level drivers (H-bridge, HC-SR04, touch panel) |
//! | [`control`] | Encoder tracking, PID/PI control, the position loop and signal filters |
//! | [`motors`] | Leg servos and the four-leg gait |
//! | [`protocol`] | Command bytes, status frames and setpoint lines |
//! | [`robot`] | Humper coordinator tying commands, buttons and ranging together |
//! | [`shared`] | Interrupt-safe cells and output queues for interrupt handlers |
//! | [`config`] | Board and tuning constants |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod hw;
pub mod motors;
pub mod protocol;
pub mod robot;
pub mod shared;

#[cfg(test)]
mod testing;

pub use error::{ConfigError, DriveError, RangeError};
pub use robot::Humper;
pub use shared::{Outbox, Shared};

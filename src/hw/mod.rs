// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU-Level Wrappers
//!
//! [`led`] is plain embedded-hal and always available. Everything else talks to STM32F7
//! registers and is only built with the `firmware` feature.

pub mod led;

#[cfg(feature = "firmware")]
pub mod encoder;
#[cfg(feature = "firmware")]
pub mod exti;
#[cfg(feature = "firmware")]
pub mod pin;
#[cfg(feature = "firmware")]
pub mod pins;
#[cfg(feature = "firmware")]
pub mod pwm;
#[cfg(feature = "firmware")]
pub mod timer;
#[cfg(feature = "firmware")]
pub mod usart;

pub use led::{ActiveLevel, Indicator, Led, Signal};

#[cfg(feature = "firmware")]
pub use encoder::{Encoder, QeiEncoder};
#[cfg(feature = "firmware")]
pub use pin::{InPin, OutPin};
#[cfg(feature = "firmware")]
pub use pins::BoardPins;
#[cfg(feature = "firmware")]
pub use pwm::{PwmChannel, PwmTimer};
#[cfg(feature = "firmware")]
pub use timer::{EchoClock, PulseClock, TickTimer};
#[cfg(feature = "firmware")]
pub use usart::{Usart, UsartRx};

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial formats: leg commands and status frames on the command link, setpoint lines on
//! the debug console, and the readouts printed back on it.

pub mod messages;
pub mod parser;
pub mod report;

pub use messages::{Leg, LegCommand, StatusFrame};
pub use parser::SetpointParser;
pub use report::Report;

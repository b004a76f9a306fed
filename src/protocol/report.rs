// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Lines printed on the debug console.

use core::fmt;

use crate::drivers::hcsr04::Echo;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// A completed echo.
    Range { distance: u32, change: i8 },
    /// The echo timed out; any earlier distance is stale.
    NoReading,
    /// A setpoint line was accepted, in tenths of a degree.
    Setpoint(i32),
}

impl From<Echo> for Report {
    fn from(echo: Echo) -> Self {
        Self::Range {
            distance: echo.distance,
            change: echo.change,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { distance, change } => {
                write!(f, "range {} cm, change {}", distance, change)
            }
            Self::NoReading => f.write_str("range: no reading"),
            Self::Setpoint(tenths) => write!(f, "setpoint {}", tenths),
        }
    }
}

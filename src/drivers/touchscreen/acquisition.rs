// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Alternating X/Y acquisition over a single ADC channel.
//!
//! After every layer switch the panel needs one conversion to settle, so each axis takes a
//! discarded conversion followed by a kept one:
//!
//! | State  | On conversion complete                   | Next   |
//! | ------ | ---------------------------------------- | ------ |
//! | Init   | discard, drive X layer                   | SkipX  |
//! | SkipX  | discard, sense through Y                 | ReadX  |
//! | ReadX  | keep as X, drive Y layer                 | SkipY  |
//! | SkipY  | discard, sense through X                 | ReadY  |
//! | ReadY  | keep as Y, drive X layer, pair complete  | SkipX  |

use super::TouchPanel;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    #[default]
    Init,
    SkipX,
    ReadX,
    SkipY,
    ReadY,
}

#[derive(Debug, Default)]
pub struct Acquisition {
    state: AcquisitionState,
    x: u16,
    y: u16,
}

impl Acquisition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one finished conversion. Returns the raw `(x, y)` pair once both axes are in.
    pub fn step<P: TouchPanel>(&mut self, panel: &mut P) -> Option<(u16, u16)> {
        let code = panel.take_sample();

        let (next, pair) = match self.state {
            AcquisitionState::Init => {
                panel.drive_x_layer();
                (AcquisitionState::SkipX, None)
            }
            AcquisitionState::SkipX => {
                panel.sense_through_y();
                (AcquisitionState::ReadX, None)
            }
            AcquisitionState::ReadX => {
                self.x = code;
                panel.drive_y_layer();
                (AcquisitionState::SkipY, None)
            }
            AcquisitionState::SkipY => {
                panel.sense_through_x();
                (AcquisitionState::ReadY, None)
            }
            AcquisitionState::ReadY => {
                self.y = code;
                panel.drive_x_layer();
                (AcquisitionState::SkipX, Some((self.x, self.y)))
            }
        };

        self.state = next;
        pair
    }

    #[inline]
    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Last kept readings.
    #[inline]
    pub fn raw(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wire formats of the Humper command link.
//!
//! The host sends single command bytes whose low nibble selects a stance for each leg. The
//! robot answers with a fixed 6-byte status frame:
//!
//! | Byte | Content |
//! | ---- | ------- |
//! | 0 | previous command |
//! | 1 | current command |
//! | 2 | sensor change (signed) |
//! | 3 | terminate flag (`0x00` or `0xFF`) |
//! | 4 | `'\r'` |
//! | 5 | `'\n'` |

/// Terminate flag value once the stop button has been pressed.
pub const TERMINATE: u8 = 0xFF;

/// Trailer of every status frame.
pub const FRAME_END: [u8; 2] = *b"\r\n";

/// Length of a status frame on the wire.
pub const FRAME_LEN: usize = 6;

/// Bits of a command byte that carry leg stances.
pub const LEG_MASK: u8 = 0x0F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Leg {
    RightBack,
    RightFront,
    LeftFront,
    LeftBack,
}

impl Leg {
    pub const ALL: [Leg; 4] = [Leg::RightBack, Leg::RightFront, Leg::LeftFront, Leg::LeftBack];

    /// Command bit that selects this leg's stance.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Leg::RightBack => 1 << 3,
            Leg::RightFront => 1 << 2,
            Leg::LeftFront => 1 << 1,
            Leg::LeftBack => 1 << 0,
        }
    }
}

/// A command byte as received from the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LegCommand(u8);

impl LegCommand {
    #[inline]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Stance index (0 or 1) requested for `leg`.
    #[inline]
    pub const fn stance(self, leg: Leg) -> usize {
        (self.0 & leg.bit() != 0) as usize
    }

    /// The command with every leg flipped to its other stance. Upper bits are cleared.
    #[inline]
    pub const fn inverted(self) -> Self {
        Self(!self.0 & LEG_MASK)
    }
}

impl From<u8> for LegCommand {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

/// Robot status reported after every sensor update and on terminate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFrame {
    pub previous: LegCommand,
    pub current: LegCommand,
    pub change: i8,
    pub terminate: u8,
}

impl StatusFrame {
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [
            self.previous.raw(),
            self.current.raw(),
            self.change as u8,
            self.terminate,
            FRAME_END[0],
            FRAME_END[1],
        ]
    }
}

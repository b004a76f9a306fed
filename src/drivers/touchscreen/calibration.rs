// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Raw ADC reading to screen pixel conversion.
//!
//! A calibration is seven coefficients `m0..m6` applied as
//!
//! ```text
//! x = (rx * m0 + ry * m1 + m2) / m6
//! y = (rx * m3 + ry * m4 + m5) / m6
//! ```
//!
//! evaluated in 64-bit so the large offsets cannot overflow.

use crate::config;
use crate::error::ConfigError;

/// Display orientation the panel coefficients were measured for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
    PortraitFlip,
    LandscapeFlip,
}

/// Board wiring variant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Board {
    /// Touch lines wired straight to the MCU.
    #[default]
    Plain,
    /// SRAM/flash daughter board driving the negative touch lines.
    SramFlash,
}

impl Board {
    /// Lowest raw reading on both axes that counts as a press.
    pub fn touch_min(self) -> i16 {
        match self {
            Board::Plain => config::TOUCH_MIN,
            Board::SramFlash => config::TOUCH_MIN_SRAM_FLASH,
        }
    }
}

const PLAIN: [[i32; 7]; 4] = [
    [-320, -164_160, 24_146_560, 184_464, -768, -150_763_296, 179_224],
    [280_448, -3_200, -220_093_760, -3_096, -275_592, 866_602_824, 2_287_498],
    [-864, -79_200, 70_274_016, -85_088, 1_056, 80_992_576, 199_452],
    [-73_472, -2_944, 72_334_912, 1_248, 77_448, -26_340_816, 168_282],
];

const SRAM_FLASH: [[i32; 7]; 4] = [
    [-1_152, 94_848, -5_323_392, 107_136, 256, -5_322_624, 300_720],
    [107_776, 1_024, -7_694_016, -1_104, -92_904, 76_542_840, 296_274],
    [2_496, -94_368, 74_406_768, -104_000, -1_600, 100_059_200, 290_550],
    [-104_576, -384, 99_041_888, 24, 93_216, -6_681_312, 288_475],
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    m: [i32; 7],
}

impl Calibration {
    pub fn new(m: [i32; 7]) -> Result<Self, ConfigError> {
        if m[6] == 0 {
            return Err(ConfigError::InvalidCalibration);
        }
        Ok(Self { m })
    }

    /// Built-in coefficients for a board variant and orientation.
    pub fn for_board(board: Board, orientation: Orientation) -> Self {
        let sets = match board {
            Board::Plain => &PLAIN,
            Board::SramFlash => &SRAM_FLASH,
        };
        let idx = match orientation {
            Orientation::Portrait => 0,
            Orientation::Landscape => 1,
            Orientation::PortraitFlip => 2,
            Orientation::LandscapeFlip => 3,
        };
        Self { m: sets[idx] }
    }

    /// Convert a raw reading to pixels. Division truncates toward zero.
    pub fn to_screen(&self, rx: u16, ry: u16) -> (i32, i32) {
        let m = self.m.map(i64::from);
        let (rx, ry) = (i64::from(rx), i64::from(ry));
        let x = (rx * m[0] + ry * m[1] + m[2]) / m[6];
        let y = (rx * m[3] + ry * m[4] + m[5]) / m[6];
        (x as i32, y as i32)
    }

    #[inline]
    pub fn coefficients(&self) -> &[i32; 7] {
        &self.m
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::for_board(Board::default(), Orientation::default())
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sensor glitch rejection and ADC averaging for the range sensors.

use crate::config;

/// Reports how much a sensor reading moved since the previous one.
///
/// Positive changes mean the reading decreased (the obstacle came closer). Changes larger
/// than the bound are glitches and are reported as 0, but the new reading still becomes the
/// reference for the next update.
#[derive(Copy, Clone, Debug)]
pub struct ChangeFilter {
    previous: i32,
    bound: u8,
}

impl ChangeFilter {
    pub fn new(bound: u8) -> Self {
        Self { previous: 0, bound }
    }

    /// Feed a new reading and get the filtered change.
    pub fn update(&mut self, value: i32) -> i8 {
        let change = self.previous.wrapping_sub(value) as i8;
        self.previous = value;

        if change.unsigned_abs() > self.bound {
            0
        } else {
            change
        }
    }

    #[inline]
    pub fn previous(&self) -> i32 {
        self.previous
    }
}

impl Default for ChangeFilter {
    fn default() -> Self {
        Self::new(config::CHANGE_BOUND)
    }
}

/// Mean of eight ADC conversions, rounded, then reduced by 32 to drop the low-order noise.
pub fn quantized_mean(samples: &[u32; 8]) -> i32 {
    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    (((sum + 4) / 8) >> 5) as i32
}

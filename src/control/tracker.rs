// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature encoder position/velocity tracking.
//!
//! The tracker runs once per velocity-timer expiry. It takes the three quantities the
//! encoder hardware latches at that moment (counts seen during the interval, absolute
//! position, direction) and derives the shaft speed in RPM.
//!
//! Timers without velocity capture can feed the tracker through a [`CounterSampler`], which
//! differences the free-running count between ticks.

use fugit::HertzU32;

use crate::config;
use crate::error::ConfigError;

/// One hardware snapshot taken at a velocity tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QeiSample {
    /// Counts accumulated during the last tick interval.
    pub velocity: u32,
    /// Absolute position counter.
    pub position: u32,
    /// Count direction reported by the decoder: negative, zero or positive.
    pub direction: i8,
}

/// Position, velocity and speed derived at one velocity tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderState {
    pub position: u32,
    pub velocity: u32,
    /// -1, 0 or +1. Zero whenever the shaft did not move during the interval.
    pub direction: i8,
    pub rpm: u32,
}

/// How the distance from the current position to a goal is measured.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WrapMode {
    /// `goal - position` in 32-bit two's complement.
    Linear,
    /// Shortest way around a counter that wraps at `modulus`.
    Circular { modulus: u32 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EncoderConfig {
    pub counts_per_rev: u32,
    pub tick_rate: HertzU32,
    pub wrap: WrapMode,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            counts_per_rev: config::ENCODER_CPR,
            tick_rate: HertzU32::from_raw(config::VELOCITY_TICK_HZ),
            wrap: WrapMode::Linear,
        }
    }
}

impl EncoderConfig {
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counts_per_rev == 0 || self.tick_rate.raw() == 0 {
            return Err(ConfigError::InvalidEncoder);
        }
        if let WrapMode::Circular { modulus: 0 } = self.wrap {
            return Err(ConfigError::InvalidEncoder);
        }
        Ok(())
    }
}

/// Turns raw encoder snapshots into [`EncoderState`].
pub struct EncoderTracker {
    config: EncoderConfig,
    state: EncoderState,
}

impl EncoderTracker {
    pub fn new(config: EncoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: EncoderState::default(),
        })
    }

    /// Process the snapshot for one velocity tick.
    pub fn update(&mut self, sample: QeiSample) -> EncoderState {
        let direction = if sample.velocity == 0 {
            0
        } else {
            sample.direction.signum()
        };

        self.state = EncoderState {
            position: sample.position,
            velocity: sample.velocity,
            direction,
            rpm: rpm(
                sample.velocity,
                self.config.tick_rate.raw(),
                self.config.counts_per_rev,
            ),
        };
        self.state
    }

    #[inline]
    pub fn state(&self) -> EncoderState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Signed distance in ticks from the last tracked position to `goal`.
    pub fn error_to(&self, goal: u32) -> i32 {
        position_error(goal, self.state.position, self.config.wrap)
    }

    /// Ticks for an absolute shaft angle in whole degrees.
    pub fn ticks_for_deg(&self, deg: u16) -> u32 {
        (u64::from(deg) * u64::from(self.config.counts_per_rev) / 360) as u32
    }

    /// Ticks for an angle in tenths of a degree measured from `center`.
    pub fn ticks_around(&self, center: u32, tenths_deg: i32) -> u32 {
        let offset = i64::from(tenths_deg) * i64::from(self.config.counts_per_rev) / 3600;
        center.wrapping_add(offset as i32 as u32)
    }
}

/// `floor(velocity * tick_hz * 60 / counts_per_rev)`, saturated to `u32`.
pub fn rpm(velocity: u32, tick_hz: u32, counts_per_rev: u32) -> u32 {
    let rpm = u64::from(velocity) * u64::from(tick_hz) * 60 / u64::from(counts_per_rev);
    u32::try_from(rpm).unwrap_or(u32::MAX)
}

/// Signed error from `position` to `goal` under `wrap`.
pub fn position_error(goal: u32, position: u32, wrap: WrapMode) -> i32 {
    match wrap {
        WrapMode::Linear => goal.wrapping_sub(position) as i32,
        WrapMode::Circular { modulus } => {
            let m = i64::from(modulus);
            let d = (i64::from(goal) - i64::from(position)).rem_euclid(m);
            let d = if d > m / 2 { d - m } else { d };
            d as i32
        }
    }
}

/// Builds [`QeiSample`]s from a free-running up/down counter read once per tick.
pub struct CounterSampler {
    last: u32,
    mask: u32,
}

impl CounterSampler {
    /// Sampler for a 32-bit counter.
    pub fn wide(initial: u32) -> Self {
        Self {
            last: initial,
            mask: u32::MAX,
        }
    }

    /// Sampler for a 16-bit counter.
    pub fn narrow(initial: u16) -> Self {
        Self {
            last: u32::from(initial),
            mask: 0xFFFF,
        }
    }

    /// Difference the counter against the previous tick.
    pub fn sample(&mut self, raw: u32) -> QeiSample {
        let raw = raw & self.mask;
        let forward = raw.wrapping_sub(self.last) & self.mask;
        let half = self.mask / 2 + 1;

        let (velocity, direction) = if forward == 0 {
            (0, 0)
        } else if forward < half {
            (forward, 1)
        } else {
            ((self.mask - forward).wrapping_add(1) & self.mask, -1)
        };
        self.last = raw;

        QeiSample {
            velocity,
            position: raw,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> EncoderTracker {
        EncoderTracker::new(EncoderConfig::default()).unwrap()
    }

    #[test]
    fn rpm_is_zero_when_still() {
        let mut t = tracker();
        let s = t.update(QeiSample {
            velocity: 0,
            position: 77,
            direction: 1,
        });
        assert_eq!(s.rpm, 0);
        assert_eq!(s.direction, 0);
        assert_eq!(s.position, 77);
    }

    #[test]
    fn one_revolution_per_tick() {
        // V = C: the shaft turns once per tick, so rpm = F * 60.
        assert_eq!(rpm(3072, 4096, 3072), 4096 * 60);
        let mut t = tracker();
        let s = t.update(QeiSample {
            velocity: 3072,
            position: 0,
            direction: -1,
        });
        assert_eq!(s.rpm, 245_760);
        assert_eq!(s.direction, -1);
    }

    #[test]
    fn rpm_floors() {
        // 1 * 4096 * 60 / 3072 = 80 exactly, 2 * 100 * 60 / 7 = 1714.28...
        assert_eq!(rpm(1, 4096, 3072), 80);
        assert_eq!(rpm(2, 100, 7), 1714);
    }

    #[test]
    fn rpm_does_not_overflow_intermediate() {
        assert_eq!(rpm(u32::MAX, 4096, 3072), u32::MAX);
        assert_eq!(rpm(1_000_000, 4096, 3072), 80_000_000);
    }

    #[test]
    fn linear_error_wraps_like_the_counter() {
        assert_eq!(position_error(1000, 900, WrapMode::Linear), 100);
        assert_eq!(position_error(900, 1000, WrapMode::Linear), -100);
        assert_eq!(position_error(2, u32::MAX - 1, WrapMode::Linear), 4);
    }

    #[test]
    fn circular_error_takes_shortest_way() {
        let wrap = WrapMode::Circular { modulus: 3072 };
        assert_eq!(position_error(3029, 10, wrap), -53);
        assert_eq!(position_error(10, 3029, wrap), 53);
        assert_eq!(position_error(1000, 900, wrap), 100);
    }

    #[test]
    fn degree_conversions() {
        let t = tracker();
        assert_eq!(t.ticks_for_deg(355), 3029);
        assert_eq!(t.ticks_for_deg(360), 3072);
        assert_eq!(
            t.ticks_around(config::CENTER_POSITION, 900),
            config::CENTER_POSITION + 768
        );
        assert_eq!(
            t.ticks_around(config::CENTER_POSITION, -900),
            config::CENTER_POSITION - 768
        );
    }

    #[test]
    fn zero_counts_per_rev_is_rejected() {
        let cfg = EncoderConfig {
            counts_per_rev: 0,
            ..EncoderConfig::default()
        };
        assert_eq!(
            EncoderTracker::new(cfg).err(),
            Some(ConfigError::InvalidEncoder)
        );
    }

    #[test]
    fn sampler_tracks_both_directions_across_wrap() {
        let mut s = CounterSampler::narrow(0xFFF0);
        let a = s.sample(0x0010);
        assert_eq!((a.velocity, a.direction, a.position), (0x20, 1, 0x10));

        let b = s.sample(0x0008);
        assert_eq!((b.velocity, b.direction), (8, -1));

        let c = s.sample(0x0008);
        assert_eq!((c.velocity, c.direction), (0, 0));

        let mut w = CounterSampler::wide(5);
        let d = w.sample(u32::MAX - 4);
        assert_eq!((d.velocity, d.direction), (10, -1));
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Position-error PID controller producing a percent duty and a direction.
//!
//! Works in `no_std` and does not allocate memory.
//!
//! Two policies are available:
//!
//! - [`Policy::ShiftPi`]: integer P+I where each gain is a right shift. Runs without an FPU.
//! - [`Policy::FloatPid`]: floating-point P+I+D.
//!
//! Both share the same anti-windup rules. The integral only accumulates while the
//! proportional term alone is below [`PidConfig::p_saturation`], and a step that would push
//! the integral contribution past [`PidConfig::i_limit`] is rolled back. Errors inside the
//! deadband stop the motor and clear the integral.

use micromath::F32Ext;

use crate::config;
use crate::error::ConfigError;

/// Motor direction requested by the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
    Stop,
}

/// What the controller wants the H-bridge to do this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlOutput {
    pub direction: Direction,
    /// Percent duty in `0..=out_max`.
    pub duty: u8,
}

impl ControlOutput {
    pub const STOP: Self = Self {
        direction: Direction::Stop,
        duty: 0,
    };
}

/// Gain policy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Policy {
    /// `p = |e| >> kp_shift`, `i = |sum| >> ki_shift`.
    ShiftPi { kp_shift: u8, ki_shift: u8 },
    /// `p = e * kp`, `i = sum * ki`, `d = (e - e_prev) * kd`.
    FloatPid { kp: f32, ki: f32, kd: f32 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidConfig {
    pub policy: Policy,
    /// Errors with magnitude up to this many ticks are treated as on target.
    pub deadband: i32,
    /// Proportional magnitude at which integration is suspended.
    pub p_saturation: i32,
    /// Largest integral contribution.
    pub i_limit: i32,
    /// Largest duty, in percent.
    pub out_max: u8,
}

impl PidConfig {
    /// Integer P+I with the default shifts.
    pub fn shift_pi() -> Self {
        Self::with_policy(Policy::ShiftPi {
            kp_shift: config::PID_KP_SHIFT,
            ki_shift: config::PID_KI_SHIFT,
        })
    }

    /// Floating-point P+I+D with the default gains.
    pub fn float_pid() -> Self {
        Self::with_policy(Policy::FloatPid {
            kp: config::PID_KP,
            ki: config::PID_KI,
            kd: config::PID_KD,
        })
    }

    fn with_policy(policy: Policy) -> Self {
        Self {
            policy,
            deadband: config::PID_DEADBAND_TICKS,
            p_saturation: config::PID_P_SATURATION,
            i_limit: config::PID_I_LIMIT,
            out_max: config::PID_DUTY_MAX,
        }
    }

    pub fn with_deadband(mut self, ticks: i32) -> Self {
        self.deadband = ticks;
        self
    }

    /// Set the integral anti-windup thresholds.
    pub fn with_integral_limits(mut self, p_saturation: i32, i_limit: i32) -> Self {
        self.p_saturation = p_saturation;
        self.i_limit = i_limit;
        self
    }

    /// Set the output duty limit in percent.
    pub fn with_output_limit(mut self, out_max: u8) -> Self {
        self.out_max = out_max;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.policy {
            Policy::ShiftPi { kp_shift, ki_shift } => {
                if !(1..=31).contains(&kp_shift) || !(1..=31).contains(&ki_shift) {
                    return Err(ConfigError::ShiftOutOfRange);
                }
            }
            Policy::FloatPid { kp, ki, kd } => {
                let usable = |g: f32| g.is_finite() && g >= 0.0;
                if !usable(kp) || !usable(ki) || !usable(kd) || kp == 0.0 {
                    return Err(ConfigError::InvalidGain);
                }
            }
        }

        if self.deadband < 0 {
            return Err(ConfigError::NegativeDeadband);
        }
        if self.out_max == 0
            || self.out_max > 100
            || self.p_saturation <= 0
            || self.i_limit < 0
            || self.i_limit > i32::from(self.out_max)
        {
            return Err(ConfigError::InvalidLimits);
        }
        Ok(())
    }
}

impl Default for PidConfig {
    fn default() -> Self {
        Self::shift_pi()
    }
}

/// Controller memory between ticks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    pub desired: u32,
    pub error: i32,
    pub previous_error: i32,
    pub sum_error: i32,
    pub duty_old: u8,
    pub duty_new: u8,
}

pub struct Pid {
    config: PidConfig,
    state: ControlState,
}

impl Pid {
    pub fn new(config: PidConfig) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            warn!("pid config rejected: {}", e);
            return Err(e);
        }
        Ok(Self {
            config,
            state: ControlState::default(),
        })
    }

    /// Clear the integral and error history. The last applied duty is kept so the next
    /// tick still knows whether the PWM needs rewriting.
    pub fn reset(&mut self) {
        self.state = ControlState {
            duty_old: self.state.duty_old,
            duty_new: self.state.duty_new,
            ..ControlState::default()
        };
    }

    /// Run one tick against an absolute goal and position.
    ///
    /// The error is `desired - current` in 32-bit two's complement.
    pub fn update(&mut self, desired: u32, current: u32) -> ControlOutput {
        self.state.desired = desired;
        self.update_error(desired.wrapping_sub(current) as i32)
    }

    /// Run one tick on an already computed position error.
    pub fn update_error(&mut self, error: i32) -> ControlOutput {
        self.state.previous_error = self.state.error;
        self.state.error = error;
        self.state.duty_old = self.state.duty_new;

        let output = match self.config.policy {
            Policy::ShiftPi { kp_shift, ki_shift } => self.step_shift(error, kp_shift, ki_shift),
            Policy::FloatPid { kp, ki, kd } => self.step_float(error, kp, ki, kd),
        };

        self.state.duty_new = output.duty;
        output
    }

    fn within_deadband(&self, error: i32) -> bool {
        i64::from(error).abs() <= i64::from(self.config.deadband)
    }

    fn step_shift(&mut self, error: i32, kp_shift: u8, ki_shift: u8) -> ControlOutput {
        let p = error.unsigned_abs() >> kp_shift;
        let i_limit = self.config.i_limit as u32;

        let mut i = 0;
        if p < self.config.p_saturation as u32 {
            let sum = &mut self.state.sum_error;
            *sum = sum.saturating_add(error);
            i = sum.unsigned_abs() >> ki_shift;
            if i > i_limit {
                *sum = sum.saturating_sub(error);
                i = (sum.unsigned_abs() >> ki_shift).min(i_limit);
            }
        }

        if self.within_deadband(error) {
            self.state.sum_error = 0;
            return ControlOutput::STOP;
        }

        let direction = if error > 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        let duty = p.saturating_add(i).min(u32::from(self.config.out_max)) as u8;
        ControlOutput { direction, duty }
    }

    fn step_float(&mut self, error: i32, kp: f32, ki: f32, kd: f32) -> ControlOutput {
        let p = error as f32 * kp;
        let d = (error as f32 - self.state.previous_error as f32) * kd;
        let i_limit = self.config.i_limit as f32;

        let mut i = 0.0;
        if F32Ext::abs(p) < self.config.p_saturation as f32 {
            let sum = &mut self.state.sum_error;
            *sum = sum.saturating_add(error);
            i = *sum as f32 * ki;
            if i > i_limit {
                *sum = sum.saturating_sub(error);
                i = i_limit;
            } else if i < -i_limit {
                *sum = sum.saturating_sub(error);
                i = -i_limit;
            }
        }

        if self.within_deadband(error) {
            self.state.sum_error = 0;
            return ControlOutput::STOP;
        }

        // Float to int casts truncate toward zero and saturate. A command that truncates to
        // zero outside the deadband reports Stop with 0 duty and keeps the integral.
        let raw = (p + i + d) as i32;
        let direction = match raw {
            r if r > 0 => Direction::Forward,
            r if r < 0 => Direction::Reverse,
            _ => Direction::Stop,
        };
        let duty = raw.unsigned_abs().min(u32::from(self.config.out_max)) as u8;
        ControlOutput { direction, duty }
    }

    /// True when the last tick produced a different duty than the one before it.
    #[inline]
    pub fn duty_changed(&self) -> bool {
        self.state.duty_new != self.state.duty_old
    }

    #[inline]
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &PidConfig {
        &self.config
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types shared across the crate.
//!
//! Nothing in the control core is fatal. Saturation is clamped and noisy samples are
//! discarded locally, so these only cover bad configuration, a missing ultrasonic echo, and
//! embedded-hal trait failures.

use core::fmt;

/// A configuration value that would make a component misbehave.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A shift gain of 0 or above 31.
    ShiftOutOfRange,
    /// A floating-point gain that is negative, NaN or infinite, or a zero proportional gain.
    InvalidGain,
    /// A negative deadband.
    NegativeDeadband,
    /// Integral or saturation limits that do not fit inside the output range.
    InvalidLimits,
    /// An encoder with zero counts per revolution, zero tick rate or a zero wrap modulus.
    InvalidEncoder,
    /// A ranger with zero ticks per unit, zero timer rate, or an unusable timeout.
    InvalidRanger,
    /// A touch calibration with a zero divisor.
    InvalidCalibration,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::ShiftOutOfRange => "shift gain must be in 1..=31",
            ConfigError::InvalidGain => "gain must be finite and non-negative, kp non-zero",
            ConfigError::NegativeDeadband => "deadband must not be negative",
            ConfigError::InvalidLimits => "controller limits exceed the output range",
            ConfigError::InvalidEncoder => "encoder parameters must be non-zero",
            ConfigError::InvalidRanger => "ranger parameters must be non-zero and fit the timer",
            ConfigError::InvalidCalibration => "calibration divisor must be non-zero",
        };
        f.write_str(msg)
    }
}

/// Failure to command an actuator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveError {
    /// Writing the PWM duty cycle failed.
    Pwm,
    /// Writing a direction pin failed.
    Pin,
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::Pwm => f.write_str("PWM duty write failed"),
            DriveError::Pin => f.write_str("direction pin write failed"),
        }
    }
}

/// Failure of an ultrasonic ranging cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeError {
    /// No echo edge arrived within the configured timeout.
    Timeout,
    /// Driving the trigger pin or reading the echo pin failed.
    Pin,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Timeout => f.write_str("echo timed out"),
            RangeError::Pin => f.write_str("trigger or echo pin access failed"),
        }
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board and tuning constants for the Humper robot.
//!
//! The typed configuration structs in the driver and control modules build their `Default`
//! impls from these values.
//!
//! # Motor
//! Faulhaber 12 V coreless motor, 64:1 planetary gearbox, 12 PPR encoder decoded in
//! quadrature: 3072 counts per output revolution.
//!
//! # Ranging
//! HC-SR04 echo pulses are timed at the 80 MHz system clock. Sound covers 1 cm and back in
//! 58 µs, i.e. 4640 timer ticks per centimetre.

/// Encoder counts per output shaft revolution.
pub const ENCODER_CPR: u32 = 3072;

/// Velocity timer rate in Hz (2^12).
pub const VELOCITY_TICK_HZ: u32 = 4096;

/// Encoder count that corresponds to the shaft's zero angle when tracking around center.
pub const CENTER_POSITION: u32 = 1_073_741_823;

/// Shaft angle commanded at startup, in degrees.
pub const DEFAULT_TARGET_DEG: u16 = 355;

/// Proportional shift of the integer controller (error / 4).
pub const PID_KP_SHIFT: u8 = 2;

/// Integral shift of the integer controller (sum / 512).
pub const PID_KI_SHIFT: u8 = 9;

/// Gains of the floating-point controller.
pub const PID_KP: f32 = 0.25;
pub const PID_KI: f32 = 0.002;
pub const PID_KD: f32 = 0.015;

/// Errors within this many ticks hold the motor and clear the integral.
pub const PID_DEADBAND_TICKS: i32 = 5;

/// Proportional magnitude at which the integral stops accumulating.
pub const PID_P_SATURATION: i32 = 100;

/// Largest integral contribution, in percent duty.
pub const PID_I_LIMIT: i32 = 50;

/// Largest output duty, in percent.
pub const PID_DUTY_MAX: u8 = 100;

/// Motor H-bridge PWM frequency in Hz.
pub const MOTOR_PWM_HZ: u32 = 400;

/// Echo timer clock in Hz.
pub const ECHO_TIMER_HZ: u32 = 80_000_000;

/// Echo timer ticks per centimetre of range.
pub const ECHO_TICKS_PER_CM: u32 = 4640;

/// Length of the HC-SR04 trigger pulse in microseconds.
pub const TRIGGER_PULSE_US: u32 = 10;

/// The HC-SR04 holds echo high for about 38 ms when nothing is in range.
pub const ECHO_TIMEOUT_US: u32 = 38_000;

/// Echo durations are reduced by this shift before computing the reported change.
pub const ECHO_CHANGE_SHIFT: u8 = 12;

/// Sensor changes larger than this are treated as glitches and reported as 0.
pub const CHANGE_BOUND: u8 = 10;

/// Servo PWM frequency in Hz.
pub const SERVO_PWM_HZ: u32 = 50;

/// Time given to the servos to reach a new stance before ranging resumes.
pub const SERVO_SETTLE_MS: u32 = 400;

/// Leg servo stances in per-mille of the 20 ms servo period, `[stance 0, stance 1]`.
pub const RIGHT_FRONT_STANCES: [u16; 2] = [60, 90];
pub const RIGHT_BACK_STANCES: [u16; 2] = [100, 70];
pub const LEFT_BACK_STANCES: [u16; 2] = [70, 100];
pub const LEFT_FRONT_STANCES: [u16; 2] = [90, 60];

/// Debug/command link baud rate.
pub const UART_BAUD: u32 = 115_200;

/// Lowest raw touch reading that counts as a press.
pub const TOUCH_MIN: i16 = 150;

/// Touch minimum when the SRAM/flash daughter board drives the negative touch lines.
pub const TOUCH_MIN_SRAM_FLASH: i16 = 40;

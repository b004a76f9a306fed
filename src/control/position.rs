// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop shaft position controller.
//!
//! This controller owns the encoder tracker, the PID and the H-bridge, and is stepped from the
//! velocity-timer interrupt. Each tick runs the tracker first, then the PID on the fresh
//! position, then applies the result to the bridge.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! controller.set_target_deg(355);
//!
//! #[interrupt]
//! fn TIM7() {
//!     let sample = encoder.sample();
//!     CONTROLLER.with(|c| c.on_encoder_tick(sample));
//! }
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::control::pid::{ControlOutput, Pid};
use crate::control::tracker::{EncoderState, EncoderTracker, QeiSample};
use crate::drivers::HBridge;
use crate::error::DriveError;

/// Operating mode of the position controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PositionMode {
    /// Regular closed-loop control toward the target.
    PositionControl,

    /// Motor is manually disabled (coast). The tracker keeps running.
    Disabled,
}

pub struct PositionController<PWM, FWD, REV> {
    tracker: EncoderTracker,
    pid: Pid,
    bridge: HBridge<PWM, FWD, REV>,
    mode: PositionMode,

    /// Commanded position (encoder ticks).
    target: u32,
    /// Output of the last control step.
    last_output: ControlOutput,
}

impl<PWM, FWD, REV> PositionController<PWM, FWD, REV>
where
    PWM: SetDutyCycle,
    FWD: OutputPin,
    REV: OutputPin,
{
    /// Create a controller in position-control mode with a target of 0.
    pub fn new(tracker: EncoderTracker, pid: Pid, bridge: HBridge<PWM, FWD, REV>) -> Self {
        Self {
            tracker,
            pid,
            bridge,
            mode: PositionMode::PositionControl,
            target: 0,
            last_output: ControlOutput::STOP,
        }
    }

    /// Set a new target in encoder ticks.
    pub fn set_target_ticks(&mut self, ticks: u32) {
        self.target = ticks;
        self.pid.reset();
        debug!("position target {=u32}", ticks);
    }

    /// Set a new target as an absolute shaft angle in degrees.
    pub fn set_target_deg(&mut self, deg: u16) {
        let ticks = self.tracker.ticks_for_deg(deg);
        self.set_target_ticks(ticks);
    }

    /// Set a new target in tenths of a degree around `center`.
    pub fn set_target_tenths(&mut self, center: u32, tenths_deg: i32) {
        let ticks = self.tracker.ticks_around(center, tenths_deg);
        self.set_target_ticks(ticks);
    }

    /// Directly disable the motor (coast).
    pub fn disable(&mut self) -> Result<(), DriveError> {
        self.mode = PositionMode::Disabled;
        self.last_output = ControlOutput::STOP;
        self.bridge.coast()
    }

    /// Re-enable position control. The integral starts from zero.
    pub fn enable(&mut self) {
        self.mode = PositionMode::PositionControl;
        self.pid.reset();
    }

    /// Run one velocity tick.
    pub fn on_encoder_tick(&mut self, sample: QeiSample) -> Result<EncoderState, DriveError> {
        let state = self.tracker.update(sample);

        match self.mode {
            PositionMode::Disabled => {
                self.bridge.coast()?;
            }
            PositionMode::PositionControl => {
                let error = self.tracker.error_to(self.target);
                let output = self.pid.update_error(error);
                self.bridge.drive(output)?;
                self.last_output = output;
            }
        }

        Ok(state)
    }

    /// Returns true if the last tracked position is within the PID deadband of the target.
    pub fn on_target(&self) -> bool {
        let error = i64::from(self.tracker.error_to(self.target));
        error.abs() <= i64::from(self.pid.config().deadband)
    }

    #[inline]
    pub fn target(&self) -> u32 {
        self.target
    }

    #[inline]
    pub fn mode(&self) -> PositionMode {
        self.mode
    }

    #[inline]
    pub fn encoder(&self) -> EncoderState {
        self.tracker.state()
    }

    #[inline]
    pub fn last_output(&self) -> ControlOutput {
        self.last_output
    }

    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::pid::{Direction, PidConfig};
    use crate::control::tracker::EncoderConfig;
    use crate::testing::{MockPin, MockPwm};

    type Controller = PositionController<MockPwm, MockPin, MockPin>;

    fn controller() -> (Controller, MockPwm, MockPin, MockPin) {
        let (pwm, fwd, rev) = (MockPwm::new(), MockPin::new(), MockPin::new());
        let bridge = HBridge::new(pwm.clone(), fwd.clone(), rev.clone()).unwrap();
        let c = PositionController::new(
            EncoderTracker::new(EncoderConfig::default()).unwrap(),
            Pid::new(PidConfig::shift_pi()).unwrap(),
            bridge,
        );
        (c, pwm, fwd, rev)
    }

    fn at(position: u32) -> QeiSample {
        QeiSample {
            velocity: 0,
            position,
            direction: 0,
        }
    }

    #[test]
    fn tick_drives_bridge_from_fresh_position() {
        let (mut c, pwm, fwd, rev) = controller();
        c.set_target_ticks(1000);

        for _ in 0..3 {
            c.on_encoder_tick(at(900)).unwrap();
        }
        assert_eq!(pwm.percent(), 25);
        assert!(fwd.is_set() && !rev.is_set());
        assert_eq!(c.pid().state().sum_error, 300);
        // Coast at construction plus one write of 25.
        assert_eq!(pwm.writes(), 2);

        c.on_encoder_tick(at(1100)).unwrap();
        assert!(!fwd.is_set() && rev.is_set());
        assert_eq!(c.last_output().direction, Direction::Reverse);
    }

    #[test]
    fn deadband_reaches_target() {
        let (mut c, pwm, fwd, rev) = controller();
        c.set_target_deg(355);
        assert_eq!(c.target(), 3029);

        c.on_encoder_tick(at(3000)).unwrap();
        assert!(!c.on_target());

        c.on_encoder_tick(at(3026)).unwrap();
        assert!(c.on_target());
        assert_eq!(pwm.duty(), 0);
        assert!(!fwd.is_set() && !rev.is_set());
    }

    #[test]
    fn target_change_resets_integral() {
        let (mut c, _, _, _) = controller();
        c.set_target_ticks(1000);
        c.on_encoder_tick(at(900)).unwrap();
        assert_eq!(c.pid().state().sum_error, 100);

        c.set_target_tenths(0, 3600);
        assert_eq!(c.target(), 3072);
        assert_eq!(c.pid().state().sum_error, 0);
    }

    #[test]
    fn disabled_coasts_but_keeps_tracking() {
        let (mut c, pwm, fwd, _) = controller();
        c.set_target_ticks(1000);
        c.on_encoder_tick(at(0)).unwrap();
        assert_eq!(pwm.percent(), 100);

        c.disable().unwrap();
        let state = c
            .on_encoder_tick(QeiSample {
                velocity: 12,
                position: 12,
                direction: 1,
            })
            .unwrap();
        assert_eq!(c.mode(), PositionMode::Disabled);
        assert_eq!(state.position, 12);
        assert_eq!(c.encoder().rpm, 960);
        assert_eq!(pwm.duty(), 0);
        assert!(!fwd.is_set());

        c.enable();
        c.on_encoder_tick(at(12)).unwrap();
        assert_eq!(pwm.percent(), 100);
    }
}

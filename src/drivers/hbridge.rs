// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-pin H-bridge motor driver with a PWM enable.
//!
//! The bridge inputs select the polarity and the PWM channel sets the magnitude:
//!
//! | Direction | FWD | REV |
//! | --------- | --- | --- |
//! | Forward   | H   | L   |
//! | Reverse   | L   | H   |
//! | Stop      | L   | L   |
//!
//! Both inputs are never driven high at the same time. When reversing, the active pin is
//! released before the other one is raised.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::control::{ControlOutput, Direction};
use crate::error::DriveError;

pub struct HBridge<PWM, FWD, REV> {
    pwm: PWM,
    fwd: FWD,
    rev: REV,
    direction: Direction,
    /// Last duty written to the PWM channel. `None` until the first write.
    applied: Option<u8>,
}

impl<PWM, FWD, REV> HBridge<PWM, FWD, REV>
where
    PWM: SetDutyCycle,
    FWD: OutputPin,
    REV: OutputPin,
{
    /// Take ownership of the channel and pins and put the bridge in coast.
    pub fn new(pwm: PWM, fwd: FWD, rev: REV) -> Result<Self, DriveError> {
        let mut bridge = Self {
            pwm,
            fwd,
            rev,
            direction: Direction::Stop,
            applied: None,
        };
        bridge.coast()?;
        Ok(bridge)
    }

    /// Apply a controller output.
    ///
    /// The duty (percent, clamped to 100) is only written when it differs from the last one.
    pub fn drive(&mut self, output: ControlOutput) -> Result<(), DriveError> {
        self.set_direction(output.direction)?;
        self.set_duty(output.duty.min(100))
    }

    /// Release both inputs and zero the duty.
    pub fn coast(&mut self) -> Result<(), DriveError> {
        self.set_direction(Direction::Stop)?;
        self.set_duty(0)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), DriveError> {
        match direction {
            Direction::Forward => {
                self.rev.set_low().map_err(|_| DriveError::Pin)?;
                self.fwd.set_high().map_err(|_| DriveError::Pin)?;
            }
            Direction::Reverse => {
                self.fwd.set_low().map_err(|_| DriveError::Pin)?;
                self.rev.set_high().map_err(|_| DriveError::Pin)?;
            }
            Direction::Stop => {
                self.fwd.set_low().map_err(|_| DriveError::Pin)?;
                self.rev.set_low().map_err(|_| DriveError::Pin)?;
            }
        }
        self.direction = direction;
        Ok(())
    }

    fn set_duty(&mut self, percent: u8) -> Result<(), DriveError> {
        if self.applied == Some(percent) {
            return Ok(());
        }
        self.pwm
            .set_duty_cycle_percent(percent)
            .map_err(|_| DriveError::Pwm)?;
        self.applied = Some(percent);
        Ok(())
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Last duty written to the PWM channel, in percent.
    #[inline]
    pub fn duty(&self) -> u8 {
        self.applied.unwrap_or(0)
    }

    /// Tear down the driver and return its channel and pins.
    pub fn free(self) -> (PWM, FWD, REV) {
        (self.pwm, self.fwd, self.rev)
    }
}

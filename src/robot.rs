// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Humper robot coordinator.
//!
//! Ties the host command link to the leg gait. Keeps the last two commands, the terminate
//! flag and the latest range change, and assembles the status frame reported to the host.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::DriveError;
use crate::motors::QuadGait;
use crate::protocol::messages::TERMINATE;
use crate::protocol::{LegCommand, StatusFrame};

pub struct Humper<RF, RB, LF, LB> {
    gait: QuadGait<RF, RB, LF, LB>,
    /// `[previous, current]`
    commands: [LegCommand; 2],
    terminate: u8,
    change: i8,
}

impl<RF, RB, LF, LB> Humper<RF, RB, LF, LB>
where
    RF: SetDutyCycle,
    RB: SetDutyCycle,
    LF: SetDutyCycle,
    LB: SetDutyCycle,
{
    pub fn new(gait: QuadGait<RF, RB, LF, LB>) -> Self {
        Self {
            gait,
            commands: [LegCommand::default(); 2],
            terminate: 0,
            change: 0,
        }
    }

    /// Record each received command byte in order and drive the legs to the latest one.
    pub fn apply_commands(&mut self, bytes: &[u8]) -> Result<(), DriveError> {
        let Some(&last) = bytes.last() else {
            return Ok(());
        };
        for &b in bytes {
            self.push_command(LegCommand::new(b));
        }
        info!("humper: command {=u8:#x}", last);
        self.gait.apply(self.commands[1])
    }

    /// Flip every leg to its other stance.
    pub fn invert(&mut self) -> Result<LegCommand, DriveError> {
        let inverted = self.commands[1].inverted();
        self.push_command(inverted);
        info!("humper: invert to {=u8:#x}", inverted.raw());
        self.gait.apply(inverted)?;
        Ok(inverted)
    }

    /// Latch the terminate flag and return the frame announcing it.
    pub fn terminate(&mut self) -> StatusFrame {
        self.terminate = TERMINATE;
        info!("humper: terminate");
        self.status()
    }

    /// Store the latest range change and return the frame reporting it.
    pub fn record_change(&mut self, change: i8) -> StatusFrame {
        self.change = change;
        self.status()
    }

    pub fn status(&self) -> StatusFrame {
        StatusFrame {
            previous: self.commands[0],
            current: self.commands[1],
            change: self.change,
            terminate: self.terminate,
        }
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminate == TERMINATE
    }

    #[inline]
    pub fn gait(&mut self) -> &mut QuadGait<RF, RB, LF, LB> {
        &mut self.gait
    }

    fn push_command(&mut self, command: LegCommand) {
        self.commands = [self.commands[1], command];
    }
}

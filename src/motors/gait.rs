// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Four-legged servo gait.
//!
//! Each leg is a hobby servo on a 50 Hz PWM channel with two stances. A command byte picks
//! one stance per leg, see [`LegCommand`].

use embedded_hal::pwm::SetDutyCycle;

use crate::config;
use crate::error::DriveError;
use crate::protocol::{Leg, LegCommand};

/// Servo pulse widths are given in per-mille of the PWM period.
const PER_MILLE: u16 = 1000;

/// One leg servo and its two stance duties.
pub struct ServoLeg<P> {
    pwm: P,
    stances: [u16; 2],
    stance: Option<usize>,
}

impl<P: SetDutyCycle> ServoLeg<P> {
    /// `stances` are duties in per-mille of the servo period.
    pub fn new(pwm: P, stances: [u16; 2]) -> Self {
        Self {
            pwm,
            stances,
            stance: None,
        }
    }

    /// Move to stance 0 or 1.
    pub fn set_stance(&mut self, stance: usize) -> Result<(), DriveError> {
        let stance = stance.min(1);
        self.pwm
            .set_duty_cycle_fraction(self.stances[stance], PER_MILLE)
            .map_err(|_| DriveError::Pwm)?;
        self.stance = Some(stance);
        Ok(())
    }

    /// Last stance commanded, if any.
    #[inline]
    pub fn stance(&self) -> Option<usize> {
        self.stance
    }

    pub fn free(self) -> P {
        self.pwm
    }
}

pub struct QuadGait<RF, RB, LF, LB> {
    pub right_front: ServoLeg<RF>,
    pub right_back: ServoLeg<RB>,
    pub left_front: ServoLeg<LF>,
    pub left_back: ServoLeg<LB>,
}

impl<RF, RB, LF, LB> QuadGait<RF, RB, LF, LB>
where
    RF: SetDutyCycle,
    RB: SetDutyCycle,
    LF: SetDutyCycle,
    LB: SetDutyCycle,
{
    /// Gait with the stance duties of the Humper legs.
    pub fn new(right_front: RF, right_back: RB, left_front: LF, left_back: LB) -> Self {
        Self {
            right_front: ServoLeg::new(right_front, config::RIGHT_FRONT_STANCES),
            right_back: ServoLeg::new(right_back, config::RIGHT_BACK_STANCES),
            left_front: ServoLeg::new(left_front, config::LEFT_FRONT_STANCES),
            left_back: ServoLeg::new(left_back, config::LEFT_BACK_STANCES),
        }
    }

    /// Put every leg in the stance selected by its command bit.
    pub fn apply(&mut self, command: LegCommand) -> Result<(), DriveError> {
        for leg in Leg::ALL {
            self.set_leg(leg, command.stance(leg))?;
        }
        Ok(())
    }

    /// Put every leg in stance 1.
    pub fn home(&mut self) -> Result<(), DriveError> {
        self.apply(LegCommand::new(0x0F))
    }

    fn set_leg(&mut self, leg: Leg, stance: usize) -> Result<(), DriveError> {
        match leg {
            Leg::RightBack => self.right_back.set_stance(stance),
            Leg::RightFront => self.right_front.set_stance(stance),
            Leg::LeftFront => self.left_front.set_stance(stance),
            Leg::LeftBack => self.left_back.set_stance(stance),
        }
    }

    /// Current stances as a command byte, or `None` before the first command.
    pub fn stances(&self) -> Option<LegCommand> {
        let mut raw = 0;
        for (leg, stance) in [
            (Leg::RightBack, self.right_back.stance()),
            (Leg::RightFront, self.right_front.stance()),
            (Leg::LeftFront, self.left_front.stance()),
            (Leg::LeftBack, self.left_back.stance()),
        ] {
            if stance? == 1 {
                raw |= leg.bit();
            }
        }
        Some(LegCommand::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPwm;

    struct Rig {
        gait: QuadGait<MockPwm, MockPwm, MockPwm, MockPwm>,
        rf: MockPwm,
        rb: MockPwm,
        lf: MockPwm,
        lb: MockPwm,
    }

    fn rig() -> Rig {
        let (rf, rb, lf, lb) = (MockPwm::new(), MockPwm::new(), MockPwm::new(), MockPwm::new());
        Rig {
            gait: QuadGait::new(rf.clone(), rb.clone(), lf.clone(), lb.clone()),
            rf,
            rb,
            lf,
            lb,
        }
    }

    impl Rig {
        /// Duties in per-mille as `[rf, rb, lf, lb]`.
        fn duties(&self) -> [u16; 4] {
            [self.rf.duty(), self.rb.duty(), self.lf.duty(), self.lb.duty()]
        }
    }

    #[test]
    fn command_bits_select_stances() {
        let mut r = rig();
        assert_eq!(r.gait.stances(), None);

        r.gait.apply(LegCommand::new(0b0000)).unwrap();
        assert_eq!(r.duties(), [60, 100, 90, 70]);

        // bit3 right-back, bit2 right-front, bit1 left-front, bit0 left-back
        r.gait.apply(LegCommand::new(0b1000)).unwrap();
        assert_eq!(r.duties(), [60, 70, 90, 70]);
        r.gait.apply(LegCommand::new(0b0100)).unwrap();
        assert_eq!(r.duties(), [90, 100, 90, 70]);
        r.gait.apply(LegCommand::new(0b0010)).unwrap();
        assert_eq!(r.duties(), [60, 100, 60, 70]);
        r.gait.apply(LegCommand::new(0b0001)).unwrap();
        assert_eq!(r.duties(), [60, 100, 90, 100]);
        assert_eq!(r.gait.stances(), Some(LegCommand::new(0b0001)));
    }

    #[test]
    fn home_uses_stance_one() {
        let mut r = rig();
        r.gait.home().unwrap();
        assert_eq!(r.duties(), [90, 70, 60, 100]);
        assert_eq!(r.gait.stances(), Some(LegCommand::new(0x0F)));
    }

    #[test]
    fn upper_bits_are_ignored() {
        let mut r = rig();
        r.gait.apply(LegCommand::new(0xF0)).unwrap();
        assert_eq!(r.duties(), [60, 100, 90, 70]);
    }
}

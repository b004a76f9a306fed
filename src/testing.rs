// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side doubles for the embedded-hal traits and the driver collaborator traits.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

/// Output or input pin whose level is shared with the test through an `Rc`.
#[derive(Clone, Default)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.level.get()
    }

    /// Force the level seen by `InputPin` reads.
    pub fn drive(&self, high: bool) {
        self.level.set(high);
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

/// PWM channel with a 1000-step period that records every duty write.
#[derive(Clone, Default)]
pub struct MockPwm {
    duty: Rc<Cell<u16>>,
    writes: Rc<Cell<u32>>,
}

impl MockPwm {
    pub const MAX: u16 = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> u16 {
        self.duty.get()
    }

    pub fn percent(&self) -> u16 {
        self.duty.get() / 10
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty.set(duty);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Echo/pulse timer double. The test advances `now` by hand.
#[derive(Clone, Default)]
pub struct MockTimer {
    pub now: Rc<Cell<u32>>,
    start: Rc<Cell<u32>>,
    running: Rc<Cell<bool>>,
    pub pulses: Rc<Cell<u32>>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ticks: u32) {
        self.now.set(self.now.get().wrapping_add(ticks));
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl crate::drivers::hcsr04::EchoTimer for MockTimer {
    fn restart(&mut self) {
        self.start.set(self.now.get());
        self.running.set(true);
    }

    fn stop(&mut self) {
        self.running.set(false);
    }

    fn elapsed(&self) -> u32 {
        self.now.get().wrapping_sub(self.start.get())
    }
}

impl crate::drivers::hcsr04::PulseTimer for MockTimer {
    fn start_pulse(&mut self) {
        self.pulses.set(self.pulses.get() + 1);
    }
}

/// Steps recorded by [`MockPanel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PanelStep {
    Take(u16),
    DriveX,
    SenseY,
    DriveY,
    SenseX,
}

/// Touch panel double that hands out queued ADC codes and logs every reconfiguration.
#[derive(Clone, Default)]
pub struct MockPanel {
    pub queue: Rc<RefCell<Vec<u16>>>,
    pub log: Rc<RefCell<Vec<PanelStep>>>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, code: u16) {
        self.queue.borrow_mut().push(code);
    }
}

impl crate::drivers::touchscreen::TouchPanel for MockPanel {
    fn take_sample(&mut self) -> u16 {
        let mut queue = self.queue.borrow_mut();
        let code = if queue.is_empty() { 0 } else { queue.remove(0) };
        self.log.borrow_mut().push(PanelStep::Take(code));
        code
    }

    fn drive_x_layer(&mut self) {
        self.log.borrow_mut().push(PanelStep::DriveX);
    }

    fn sense_through_y(&mut self) {
        self.log.borrow_mut().push(PanelStep::SenseY);
    }

    fn drive_y_layer(&mut self) {
        self.log.borrow_mut().push(PanelStep::DriveY);
    }

    fn sense_through_x(&mut self) {
        self.log.borrow_mut().push(PanelStep::SenseX);
    }
}

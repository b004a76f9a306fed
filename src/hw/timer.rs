// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Timers used by the ranging and motor loops.
//!
//! - [`EchoClock`] (TIM5, 32-bit) free-runs at the timer kernel clock and times the echo pulse.
//! - [`PulseClock`] (TIM6) is a one-shot that ends the 10 µs trigger pulse.
//! - [`TickTimer`] (TIM7) raises the periodic velocity tick of the motor loop.
//!
//! Interrupt flags are cleared through the shared register block, since the timers themselves
//! are owned by drivers installed in [`Shared`](crate::shared::Shared) statics.

use fugit::{HertzU32, MicrosDurationU32};
use stm32f7xx_hal::pac;

use crate::drivers::hcsr04::{EchoTimer, PulseTimer};

pub struct EchoClock {
    tim: pac::TIM5,
}

impl EchoClock {
    /// Configure TIM5 to count at `timclk / rate`, full 32-bit range, stopped.
    pub fn tim5(tim: pac::TIM5, timclk: HertzU32, rate: HertzU32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim5en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc
            .write(|w| unsafe { w.bits(timclk.raw() / rate.raw() - 1) });
        tim.arr.write(|w| unsafe { w.bits(0xFFFF_FFFF) });
        tim.egr.write(|w| w.ug().set_bit());
        tim.cnt.write(|w| unsafe { w.bits(0) });

        Self { tim }
    }

    pub fn free(self) -> pac::TIM5 {
        self.tim
    }
}

impl EchoTimer for EchoClock {
    #[inline]
    fn restart(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    #[inline]
    fn stop(&mut self) {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
    }

    #[inline]
    fn elapsed(&self) -> u32 {
        self.tim.cnt.read().bits()
    }
}

pub struct PulseClock {
    tim: pac::TIM6,
}

impl PulseClock {
    /// Configure TIM6 as a one-shot firing its update interrupt `width` after each start.
    pub fn tim6(tim: pac::TIM6, timclk: HertzU32, width: MicrosDurationU32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim6en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        // 1 MHz count
        tim.psc
            .write(|w| unsafe { w.bits(timclk.raw() / 1_000_000 - 1) });
        tim.arr
            .write(|w| unsafe { w.bits(width.ticks().saturating_sub(1).max(1)) });
        // Only counter overflow raises the interrupt, not the UG below
        tim.cr1.modify(|_, w| w.opm().set_bit().urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.write(|w| unsafe { w.bits(0) });
        tim.dier.modify(|_, w| w.uie().set_bit());

        Self { tim }
    }

    /// Acknowledge the TIM6 update interrupt.
    #[inline]
    pub fn clear_interrupt() {
        let tim = unsafe { &*pac::TIM6::ptr() };
        tim.sr.write(|w| unsafe { w.bits(0) });
    }

    pub fn free(self) -> pac::TIM6 {
        self.tim
    }
}

impl PulseTimer for PulseClock {
    #[inline]
    fn start_pulse(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }
}

pub struct TickTimer {
    tim: pac::TIM7,
}

impl TickTimer {
    /// Configure TIM7 to raise its update interrupt at `freq` and start it.
    pub fn tim7(tim: pac::TIM7, timclk: HertzU32, freq: HertzU32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim7en().set_bit());

        let ticks = (timclk.raw() / freq.raw()).max(2);
        let psc = ticks / 0x1_0000;
        let arr = ticks / (psc + 1) - 1;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(arr) });
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.write(|w| unsafe { w.bits(0) });
        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Acknowledge the TIM7 update interrupt.
    #[inline]
    pub fn clear_interrupt() {
        let tim = unsafe { &*pac::TIM7::ptr() };
        tim.sr.write(|w| unsafe { w.bits(0) });
    }

    pub fn free(self) -> pac::TIM7 {
        self.tim
    }
}

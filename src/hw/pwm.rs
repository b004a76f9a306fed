// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Edge-aligned PWM on the 16-bit general-purpose timers.
//!
//! The timer counts at 1 MHz, so the period resolution is 1 µs. Each output channel is handed out
//! as a [`PwmChannel`] implementing embedded-hal 1.0 [`SetDutyCycle`]. Channel registers are
//! reached through the shared register block after [`PwmTimer::split`].

use core::convert::Infallible;
use core::marker::PhantomData;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use fugit::HertzU32;
use stm32f7xx_hal::pac;

const COUNT_HZ: u32 = 1_000_000;

pub struct PwmTimer<TIM> {
    tim: TIM,
    max_duty: u16,
}

/// One output channel (1..=4) of a [`PwmTimer`].
pub struct PwmChannel<TIM, const C: u8> {
    max_duty: u16,
    _tim: PhantomData<TIM>,
}

impl<TIM> PwmTimer<TIM> {
    /// Counter ticks per PWM period.
    #[inline]
    pub fn max_duty(&self) -> u16 {
        self.max_duty
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> TIM {
        self.tim
    }
}

macro_rules! pwm_timer {
    ($TIM:ident, $ctor:ident, $en:ident) => {
        impl PwmTimer<pac::$TIM> {
            /// Configure all four channels in PWM mode 1 at `freq`, outputs at 0% duty.
            ///
            /// `timclk` is the kernel clock of the timer's APB bus.
            pub fn $ctor(tim: pac::$TIM, timclk: HertzU32, freq: HertzU32) -> Self {
                let rcc = unsafe { &*pac::RCC::ptr() };
                rcc.apb1enr.modify(|_, w| w.$en().set_bit());

                let psc = timclk.raw() / COUNT_HZ - 1;
                let period = (COUNT_HZ / freq.raw()).clamp(2, 0xFFFF);

                // Disable counter while configuring
                tim.cr1.modify(|_, w| w.cen().clear_bit());

                tim.psc.write(|w| unsafe { w.bits(psc) });
                tim.arr.write(|w| unsafe { w.bits(period - 1) });

                // PWM mode 1 with preload on every channel
                tim.ccmr1_output().modify(|_, w| unsafe {
                    w.oc1m().bits(0b110).oc1pe().set_bit().oc2m().bits(0b110).oc2pe().set_bit()
                });
                tim.ccmr2_output().modify(|_, w| unsafe {
                    w.oc3m().bits(0b110).oc3pe().set_bit().oc4m().bits(0b110).oc4pe().set_bit()
                });

                tim.ccr1.write(|w| unsafe { w.bits(0) });
                tim.ccr2.write(|w| unsafe { w.bits(0) });
                tim.ccr3.write(|w| unsafe { w.bits(0) });
                tim.ccr4.write(|w| unsafe { w.bits(0) });

                tim.ccer.modify(|_, w| {
                    w.cc1e()
                        .set_bit()
                        .cc2e()
                        .set_bit()
                        .cc3e()
                        .set_bit()
                        .cc4e()
                        .set_bit()
                });

                // Load prescaler and preloads, then start
                tim.cr1.modify(|_, w| w.arpe().set_bit());
                tim.egr.write(|w| w.ug().set_bit());
                tim.cr1.modify(|_, w| w.cen().set_bit());

                Self {
                    tim,
                    max_duty: period as u16,
                }
            }

            pub fn split(
                self,
            ) -> (
                PwmChannel<pac::$TIM, 1>,
                PwmChannel<pac::$TIM, 2>,
                PwmChannel<pac::$TIM, 3>,
                PwmChannel<pac::$TIM, 4>,
            ) {
                let max_duty = self.max_duty;
                let ch = || PwmChannel {
                    max_duty,
                    _tim: PhantomData,
                };
                (ch(), ch(), ch(), ch())
            }
        }

        impl<const C: u8> ErrorType for PwmChannel<pac::$TIM, C> {
            type Error = Infallible;
        }

        impl<const C: u8> SetDutyCycle for PwmChannel<pac::$TIM, C> {
            #[inline]
            fn max_duty_cycle(&self) -> u16 {
                self.max_duty
            }

            fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
                let tim = unsafe { &*pac::$TIM::ptr() };
                let duty = u32::from(duty.min(self.max_duty));
                match C {
                    1 => tim.ccr1.write(|w| unsafe { w.bits(duty) }),
                    2 => tim.ccr2.write(|w| unsafe { w.bits(duty) }),
                    3 => tim.ccr3.write(|w| unsafe { w.bits(duty) }),
                    _ => tim.ccr4.write(|w| unsafe { w.bits(duty) }),
                }
                Ok(())
            }
        }
    };
}

pwm_timer!(TIM3, tim3, tim3en);
pwm_timer!(TIM4, tim4, tim4en);

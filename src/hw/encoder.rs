// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature encoder support via STM32F7 TIM2 in encoder mode.
//!
//! [`Encoder`] configures the counter. [`QeiEncoder`] reads it once per velocity tick and turns
//! the reading into a [`QeiSample`] for the position loop.

use stm32f7xx_hal::pac;

use crate::control::{CounterSampler, QeiSample};

pub struct Encoder<TIM> {
    tim: TIM,
}

impl<TIM> Encoder<TIM> {
    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> TIM {
        self.tim
    }
}

impl Encoder<pac::TIM2> {
    /// Configure TIM2 as a quadrature encoder with full 32-bit range, starting at `initial`.
    pub fn tim2(tim2: pac::TIM2, initial: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let tim = tim2;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // Auto-reload: max 32-bit
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Slave mode: encoder mode 3 (count on both TI1 and TI2)
        tim.smcr.modify(|_, w| w.sms().bits(0b011));

        // Configure CH1/CH2 as inputs from TI1/TI2
        tim.ccmr1_input().modify(|_, w| w.cc1s().ti1().cc2s().ti2());

        // Polarity and enable for both channels.
        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        tim.cnt.write(|w| w.bits(initial));

        // Enable the counter
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Read the raw 32-bit counter value.
    #[inline]
    pub fn raw(&self) -> u32 {
        self.tim.cnt.read().bits()
    }

    /// Overwrite the counter.
    #[inline]
    pub fn set(&mut self, count: u32) {
        self.tim.cnt.write(|w| w.bits(count));
    }
}

/// Encoder counter paired with the sampler that differences it per tick.
pub struct QeiEncoder {
    encoder: Encoder<pac::TIM2>,
    sampler: CounterSampler,
}

impl QeiEncoder {
    pub fn new(encoder: Encoder<pac::TIM2>) -> Self {
        let sampler = CounterSampler::wide(encoder.raw());
        Self { encoder, sampler }
    }

    /// Read the counter and return the movement since the previous call.
    #[inline]
    pub fn sample(&mut self) -> QeiSample {
        self.sampler.sample(self.encoder.raw())
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.encoder.raw()
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! embedded-hal 1.0 digital pin adapters for the STM32F7 GPIO types.
//!
//! The HAL pins only implement the 0.2 traits, while every driver in this crate takes 1.0
//! `OutputPin`/`InputPin`. These wrappers forward to the HAL's inherent pin methods and never fail.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stm32f7xx_hal::gpio::{gpiob, gpiod, Floating, Input, Output, PushPull};

/// Push-pull output usable as an embedded-hal 1.0 [`OutputPin`].
pub struct OutPin<P>(P);

/// Input usable as an embedded-hal 1.0 [`InputPin`].
pub struct InPin<P>(P);

impl<P> OutPin<P> {
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    pub fn free(self) -> P {
        self.0
    }
}

impl<P> InPin<P> {
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    pub fn free(self) -> P {
        self.0
    }
}

macro_rules! output_pins {
    ($($pin:ty),+ $(,)?) => {$(
        impl ErrorType for OutPin<$pin> {
            type Error = Infallible;
        }

        impl OutputPin for OutPin<$pin> {
            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                self.0.set_high();
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                self.0.set_low();
                Ok(())
            }
        }
    )+};
}

macro_rules! input_pins {
    ($($pin:ty),+ $(,)?) => {$(
        impl ErrorType for InPin<$pin> {
            type Error = Infallible;
        }

        impl InputPin for InPin<$pin> {
            #[inline]
            fn is_high(&mut self) -> Result<bool, Infallible> {
                Ok(self.0.is_high())
            }

            #[inline]
            fn is_low(&mut self) -> Result<bool, Infallible> {
                Ok(self.0.is_low())
            }
        }
    )+};
}

output_pins!(
    gpiob::PB0<Output<PushPull>>,
    gpiod::PD8<Output<PushPull>>,
    gpiod::PD9<Output<PushPull>>,
    gpiod::PD10<Output<PushPull>>,
    gpiod::PD13<Output<PushPull>>,
    gpiod::PD14<Output<PushPull>>,
);

input_pins!(gpiob::PB1<Input<Floating>>);

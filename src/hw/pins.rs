// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 Humper board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpioc, gpiod, Alternate, Floating, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub usart2: Usart2Pins,
    pub encoder: EncoderPins,
    pub motor: MotorPins,
    pub servos: ServoPins,
    pub ranger: RangerPins,
    pub buttons: ButtonPins,
}

pub struct LedPins {
    pub red: gpiod::PD8<Output<PushPull>>,
    pub blue: gpiod::PD9<Output<PushPull>>,
    pub green: gpiod::PD10<Output<PushPull>>,
}

/// Debug console
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Host command link
pub struct Usart2Pins {
    pub tx: gpiod::PD5<Alternate<7>>,
    pub rx: gpiod::PD6<Alternate<7>>,
}

/// TIM2 Quadrature Encoder Inputs
pub struct EncoderPins {
    pub tim2_ch1: gpioa::PA0<Alternate<1>>,
    pub tim2_ch2: gpioa::PA1<Alternate<1>>,
}

/// DC motor H-bridge
pub struct MotorPins {
    pub pwm: gpiod::PD12<Alternate<2>>, // TIM4_CH1
    pub fwd: gpiod::PD13<Output<PushPull>>,
    pub rev: gpiod::PD14<Output<PushPull>>,
}

/// Leg servos on TIM3 CH1..CH4
pub struct ServoPins {
    pub right_front: gpioc::PC6<Alternate<2>>,
    pub right_back: gpioc::PC7<Alternate<2>>,
    pub left_front: gpioc::PC8<Alternate<2>>,
    pub left_back: gpioc::PC9<Alternate<2>>,
}

/// HC-SR04 trigger and echo (EXTI1)
pub struct RangerPins {
    pub trigger: gpiob::PB0<Output<PushPull>>,
    pub echo: gpiob::PB1<Input<Floating>>,
}

/// SW1 (invert) and SW2 (terminate), active low (EXTI15_10)
pub struct ButtonPins {
    pub sw1: gpioc::PC13<Input<PullUp>>,
    pub sw2: gpioc::PC12<Input<PullUp>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpioc: pac::GPIOC, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output(),
                blue: gpiod.pd9.into_push_pull_output(),
                green: gpiod.pd10.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            usart2: Usart2Pins {
                tx: gpiod.pd5.into_alternate::<7>(),
                rx: gpiod.pd6.into_alternate::<7>(),
            },

            encoder: EncoderPins {
                tim2_ch1: gpioa.pa0.into_alternate::<1>(),
                tim2_ch2: gpioa.pa1.into_alternate::<1>(),
            },

            motor: MotorPins {
                pwm: gpiod.pd12.into_alternate::<2>(),
                fwd: gpiod.pd13.into_push_pull_output(),
                rev: gpiod.pd14.into_push_pull_output(),
            },

            servos: ServoPins {
                right_front: gpioc.pc6.into_alternate::<2>(),
                right_back: gpioc.pc7.into_alternate::<2>(),
                left_front: gpioc.pc8.into_alternate::<2>(),
                left_back: gpioc.pc9.into_alternate::<2>(),
            },

            ranger: RangerPins {
                trigger: gpiob.pb0.into_push_pull_output(),
                echo: gpiob.pb1.into_floating_input(),
            },

            buttons: ButtonPins {
                sw1: gpioc.pc13.into_pull_up_input(),
                sw2: gpioc.pc12.into_pull_up_input(),
            },
        }
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Status LEDs.
//!
//! [`Led`] hides the board's active level. [`Indicator`] groups the red, green and blue LEDs
//! and shows which robot event happened last.

use embedded_hal::digital::OutputPin;

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED abstraction that remembers its active level and last known state.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Create an LED wrapper, initializing it to OFF.
    pub fn new(mut pin: PIN, active: ActiveLevel) -> Self {
        match active {
            ActiveLevel::High => pin.set_low().ok(),
            ActiveLevel::Low => pin.set_high().ok(),
        };
        Self {
            pin,
            active,
            is_on: false,
        }
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high().ok(),
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low().ok(),
        };
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

impl<PIN: OutputPin> Led<PIN> {
    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }
    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }
}

/// Event shown on the RGB indicator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    Off,
    /// A command byte arrived (blue).
    Command,
    /// The legs were inverted (green).
    Invert,
    /// The run was terminated (red).
    Terminate,
}

/// Red, green and blue LEDs with exactly one lit per [`Signal`].
pub struct Indicator<R: OutputPin, G: OutputPin, B: OutputPin> {
    red: Led<R>,
    green: Led<G>,
    blue: Led<B>,
    signal: Signal,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Indicator<R, G, B> {
    pub fn new(red: Led<R>, green: Led<G>, blue: Led<B>) -> Self {
        let mut indicator = Self {
            red,
            green,
            blue,
            signal: Signal::Off,
        };
        indicator.show(Signal::Off);
        indicator
    }

    pub fn show(&mut self, signal: Signal) {
        self.red.set(signal == Signal::Terminate);
        self.green.set(signal == Signal::Invert);
        self.blue.set(signal == Signal::Command);
        self.signal = signal;
    }

    #[inline]
    pub fn signal(&self) -> Signal {
        self.signal
    }
}

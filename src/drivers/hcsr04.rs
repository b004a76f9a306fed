// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! HC-SR04 ultrasonic ranger driven entirely from interrupts.
//!
//! A ranging cycle moves through four states:
//!
//! ```text
//! Idle --poll_trigger--> Triggering --on_pulse_elapsed--> AwaitingEcho
//!   ^                                                          |
//!   |                                                  echo rising edge
//!   |                                                          v
//!   +-------------------- echo falling edge ----------------- Measuring
//! ```
//!
//! The echo line interrupts on both edges. The handler reads the live pin level to tell a
//! rising edge from a falling one, and any edge that does not fit the current state is
//! ignored, so a new measurement can never start while one is in flight.
//!
//! Without an object in range the sensor may never drop the echo line. [`EchoRanger::check_timeout`]
//! aborts such a cycle and reports that there is no reading.

use embedded_hal::digital::{InputPin, OutputPin};
use fugit::{HertzU32, MicrosDurationU32};

use crate::config;
use crate::control::ChangeFilter;
use crate::error::{ConfigError, RangeError};

/// Free-running counter used to time the echo pulse.
pub trait EchoTimer {
    /// Zero the count and start counting.
    fn restart(&mut self);
    fn stop(&mut self);
    /// Ticks since the last `restart`.
    fn elapsed(&self) -> u32;
}

/// One-shot timer that produces the trigger pulse width.
///
/// Its expiry must end up in [`EchoRanger::on_pulse_elapsed`].
pub trait PulseTimer {
    fn start_pulse(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangerConfig {
    /// Echo timer ticks per reported distance unit.
    pub ticks_per_unit: u32,
    pub timer_rate: HertzU32,
    /// Longest time a cycle may stay in flight.
    pub timeout: MicrosDurationU32,
    /// Echo ticks are shifted right by this much before computing the change.
    pub change_shift: u8,
    /// Largest change magnitude that is not a glitch.
    pub change_bound: u8,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            ticks_per_unit: config::ECHO_TICKS_PER_CM,
            timer_rate: HertzU32::from_raw(config::ECHO_TIMER_HZ),
            timeout: MicrosDurationU32::from_ticks(config::ECHO_TIMEOUT_US),
            change_shift: config::ECHO_CHANGE_SHIFT,
            change_bound: config::CHANGE_BOUND,
        }
    }
}

impl RangerConfig {
    pub fn with_timeout(mut self, timeout: MicrosDurationU32) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout expressed in echo timer ticks, if it fits in 32 bits.
    pub fn timeout_ticks(&self) -> Option<u32> {
        let ticks =
            u64::from(self.timeout.ticks()) * u64::from(self.timer_rate.raw()) / 1_000_000;
        u32::try_from(ticks).ok()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_unit == 0
            || self.timer_rate.raw() == 0
            || self.timeout.ticks() == 0
            || self.change_shift > 31
        {
            return Err(ConfigError::InvalidRanger);
        }
        match self.timeout_ticks() {
            Some(0) | None => Err(ConfigError::InvalidRanger),
            Some(_) => Ok(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangerState {
    Idle,
    /// Trigger line is high, waiting for the pulse timer.
    Triggering,
    /// Trigger pulse sent, waiting for the echo line to rise.
    AwaitingEcho,
    /// Echo line is high and being timed.
    Measuring,
}

/// A completed measurement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Echo {
    /// Echo pulse width in timer ticks.
    pub ticks: u32,
    /// Distance in [`RangerConfig::ticks_per_unit`] units, rounded down.
    pub distance: u32,
    /// Filtered change against the previous echo. Positive when the obstacle came closer.
    pub change: i8,
}

pub struct EchoRanger<TRIG, ECHO, T, P> {
    trigger: TRIG,
    echo: ECHO,
    timer: T,
    pulse: P,
    config: RangerConfig,
    timeout_ticks: u32,

    state: RangerState,
    trigger_pending: bool,
    /// `[previous, current]` echo widths.
    echo_ticks: [u32; 2],
    distance: Option<u32>,
    filter: ChangeFilter,
}

impl<TRIG, ECHO, T, P> EchoRanger<TRIG, ECHO, T, P>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    T: EchoTimer,
    P: PulseTimer,
{
    /// Create an idle ranger with the trigger line low and a cycle pending.
    pub fn new(
        mut trigger: TRIG,
        echo: ECHO,
        timer: T,
        pulse: P,
        config: RangerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let timeout_ticks = config.timeout_ticks().ok_or(ConfigError::InvalidRanger)?;
        trigger.set_low().ok();

        Ok(Self {
            trigger,
            echo,
            timer,
            pulse,
            config,
            timeout_ticks,
            state: RangerState::Idle,
            trigger_pending: true,
            echo_ticks: [0; 2],
            distance: None,
            filter: ChangeFilter::new(config.change_bound),
        })
    }

    /// Start a cycle if one is pending. Returns whether the trigger pulse was started.
    pub fn poll_trigger(&mut self) -> Result<bool, RangeError> {
        if !self.trigger_pending || self.state != RangerState::Idle {
            return Ok(false);
        }

        self.trigger.set_high().map_err(|_| RangeError::Pin)?;
        self.pulse.start_pulse();
        self.timer.restart();
        self.trigger_pending = false;
        self.state = RangerState::Triggering;
        trace!("ranger: trigger");
        Ok(true)
    }

    /// Trigger pulse width reached: release the trigger and wait for the echo.
    ///
    /// The trigger is released in every state; only a cycle still in `Triggering` moves on.
    pub fn on_pulse_elapsed(&mut self) -> Result<(), RangeError> {
        self.trigger.set_low().map_err(|_| RangeError::Pin)?;
        if self.state != RangerState::Triggering {
            return Ok(());
        }
        self.timer.restart();
        self.state = RangerState::AwaitingEcho;
        Ok(())
    }

    /// Handle an echo line edge. Returns the measurement when the echo pulse ends.
    pub fn on_echo_edge(&mut self) -> Result<Option<Echo>, RangeError> {
        let high = self.echo.is_high().map_err(|_| RangeError::Pin)?;

        match (self.state, high) {
            (RangerState::Triggering | RangerState::AwaitingEcho, true) => {
                if self.state == RangerState::Triggering {
                    self.trigger.set_low().map_err(|_| RangeError::Pin)?;
                }
                self.timer.restart();
                self.state = RangerState::Measuring;
                Ok(None)
            }
            (RangerState::Measuring, false) => {
                let ticks = self.timer.elapsed();
                self.timer.stop();
                Ok(Some(self.finish(ticks)))
            }
            _ => Ok(None),
        }
    }

    fn finish(&mut self, ticks: u32) -> Echo {
        self.echo_ticks = [self.echo_ticks[1], ticks];

        let distance = ticks / self.config.ticks_per_unit;
        let change = self
            .filter
            .update((ticks >> self.config.change_shift) as i32);

        self.distance = Some(distance);
        self.trigger_pending = true;
        self.state = RangerState::Idle;
        trace!("ranger: {=u32} ticks, distance {=u32}", ticks, distance);

        Echo {
            ticks,
            distance,
            change,
        }
    }

    /// Abort a cycle that has been in flight longer than the configured timeout.
    ///
    /// On timeout the distance is cleared, the ranger returns to idle with a cycle pending,
    /// and `Some(RangeError::Timeout)` is returned.
    pub fn check_timeout(&mut self) -> Option<RangeError> {
        if self.state == RangerState::Idle || self.timer.elapsed() <= self.timeout_ticks {
            return None;
        }

        warn!("ranger: echo timeout in {}", self.state);
        self.trigger.set_low().ok();
        self.timer.stop();
        self.distance = None;
        self.trigger_pending = true;
        self.state = RangerState::Idle;
        Some(RangeError::Timeout)
    }

    /// Allow the next [`poll_trigger`](Self::poll_trigger) to start a cycle.
    pub fn request(&mut self) {
        if self.state == RangerState::Idle {
            self.trigger_pending = true;
        }
    }

    /// Withhold the next cycle until [`request`](Self::request) is called.
    pub fn hold(&mut self) {
        self.trigger_pending = false;
    }

    /// Last measured distance, or `None` before the first echo and after a timeout.
    #[inline]
    pub fn distance(&self) -> Option<u32> {
        self.distance
    }

    #[inline]
    pub fn state(&self) -> RangerState {
        self.state
    }

    #[inline]
    pub fn trigger_pending(&self) -> bool {
        self.trigger_pending
    }

    #[inline]
    pub fn echo_ticks(&self) -> [u32; 2] {
        self.echo_ticks
    }

    #[inline]
    pub fn config(&self) -> &RangerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockPin, MockTimer};

    type Ranger = EchoRanger<MockPin, MockPin, MockTimer, MockTimer>;

    struct Rig {
        ranger: Ranger,
        trigger: MockPin,
        echo: MockPin,
        timer: MockTimer,
        pulse: MockTimer,
    }

    fn rig() -> Rig {
        let (trigger, echo) = (MockPin::new(), MockPin::new());
        let (timer, pulse) = (MockTimer::new(), MockTimer::new());
        let ranger = EchoRanger::new(
            trigger.clone(),
            echo.clone(),
            timer.clone(),
            pulse.clone(),
            RangerConfig::default(),
        )
        .unwrap();
        Rig {
            ranger,
            trigger,
            echo,
            timer,
            pulse,
        }
    }

    impl Rig {
        fn measure(&mut self, ticks: u32) -> Echo {
            assert!(self.ranger.poll_trigger().unwrap());
            self.timer.advance(800);
            self.ranger.on_pulse_elapsed().unwrap();
            self.timer.advance(1_000);

            self.echo.drive(true);
            assert_eq!(self.ranger.on_echo_edge().unwrap(), None);
            self.timer.advance(ticks);
            self.echo.drive(false);
            self.ranger.on_echo_edge().unwrap().unwrap()
        }
    }

    #[test]
    fn full_cycle_reports_distance() {
        let mut r = rig();
        assert_eq!(r.ranger.distance(), None);

        for d in [0, 1, 25, 400] {
            let echo = r.measure(4640 * d);
            assert_eq!(echo.distance, d);
            assert_eq!(echo.ticks, 4640 * d);
            assert_eq!(r.ranger.distance(), Some(d));
            assert_eq!(r.ranger.state(), RangerState::Idle);
            assert!(r.ranger.trigger_pending());
        }
        assert_eq!(r.ranger.echo_ticks(), [4640 * 25, 4640 * 400]);
        assert_eq!(r.pulse.pulses.get(), 4);
    }

    #[test]
    fn distance_rounds_down() {
        let mut r = rig();
        assert_eq!(r.measure(4640 * 3 + 4639).distance, 3);
    }

    #[test]
    fn trigger_pulse_drives_the_pin() {
        let mut r = rig();
        assert!(!r.trigger.is_set());
        r.ranger.poll_trigger().unwrap();
        assert!(r.trigger.is_set());
        assert_eq!(r.ranger.state(), RangerState::Triggering);
        r.ranger.on_pulse_elapsed().unwrap();
        assert!(!r.trigger.is_set());
        assert_eq!(r.ranger.state(), RangerState::AwaitingEcho);
        assert!(r.timer.is_running());
    }

    #[test]
    fn early_echo_releases_the_trigger() {
        let mut r = rig();
        assert!(r.ranger.poll_trigger().unwrap());

        r.echo.drive(true);
        assert_eq!(r.ranger.on_echo_edge().unwrap(), None);
        assert!(!r.trigger.is_set());
        assert_eq!(r.ranger.state(), RangerState::Measuring);

        r.ranger.on_pulse_elapsed().unwrap();
        assert_eq!(r.ranger.state(), RangerState::Measuring);

        r.timer.advance(4640 * 7);
        r.echo.drive(false);
        let echo = r.ranger.on_echo_edge().unwrap().unwrap();
        assert_eq!(echo.distance, 7);
        assert!(!r.trigger.is_set());

        assert_eq!(r.measure(4640 * 2).distance, 2);
        assert!(!r.trigger.is_set());
    }

    #[test]
    fn no_retrigger_while_in_flight() {
        let mut r = rig();
        assert!(r.ranger.poll_trigger().unwrap());
        assert!(!r.ranger.poll_trigger().unwrap());

        r.ranger.on_pulse_elapsed().unwrap();
        assert!(!r.ranger.poll_trigger().unwrap());

        r.echo.drive(true);
        r.ranger.on_echo_edge().unwrap();
        assert!(!r.ranger.poll_trigger().unwrap());
        r.ranger.request();
        assert!(!r.ranger.poll_trigger().unwrap());

        assert_eq!(r.pulse.pulses.get(), 1);
        assert_eq!(r.ranger.state(), RangerState::Measuring);
    }

    #[test]
    fn stray_edges_are_ignored() {
        let mut r = rig();
        // Falling edge while idle.
        r.echo.drive(false);
        assert_eq!(r.ranger.on_echo_edge().unwrap(), None);
        assert_eq!(r.ranger.state(), RangerState::Idle);

        // A second rising edge while measuring does not restart the timer.
        r.ranger.poll_trigger().unwrap();
        r.ranger.on_pulse_elapsed().unwrap();
        r.echo.drive(true);
        r.ranger.on_echo_edge().unwrap();
        r.timer.advance(4640 * 2);
        r.ranger.on_echo_edge().unwrap();
        r.timer.advance(4640 * 3);
        r.echo.drive(false);
        assert_eq!(r.ranger.on_echo_edge().unwrap().unwrap().distance, 5);

        // Pulse timer firing late does nothing once idle.
        r.ranger.on_pulse_elapsed().unwrap();
        assert_eq!(r.ranger.state(), RangerState::Idle);
    }

    #[test]
    fn change_is_filtered() {
        let mut r = rig();
        // 40960 >> 12 = 10
        r.measure(40_960);
        // 8192 >> 12 = 2, 10 - 2 = 8
        assert_eq!(r.measure(8_192).change, 8);
        // 2 - 13 = -11 is a glitch
        assert_eq!(r.measure(13 * 4096).change, 0);
        assert_eq!(r.measure(12 * 4096).change, 1);
    }

    #[test]
    fn timeout_aborts_and_clears_distance() {
        let mut r = rig();
        r.measure(4640 * 10);
        assert_eq!(r.ranger.distance(), Some(10));

        r.ranger.poll_trigger().unwrap();
        r.ranger.on_pulse_elapsed().unwrap();
        r.echo.drive(true);
        r.ranger.on_echo_edge().unwrap();

        let limit = r.ranger.config().timeout_ticks().unwrap();
        assert_eq!(limit, 3_040_000);
        r.timer.advance(limit);
        assert_eq!(r.ranger.check_timeout(), None);
        r.timer.advance(1);
        assert_eq!(r.ranger.check_timeout(), Some(RangeError::Timeout));

        assert_eq!(r.ranger.distance(), None);
        assert_eq!(r.ranger.state(), RangerState::Idle);
        assert!(r.ranger.trigger_pending());
        assert!(!r.timer.is_running());
        assert!(!r.trigger.is_set());

        // The late falling edge is ignored, a new cycle can start.
        r.echo.drive(false);
        assert_eq!(r.ranger.on_echo_edge().unwrap(), None);
        assert_eq!(r.measure(4640).distance, 1);
    }

    #[test]
    fn idle_never_times_out() {
        let mut r = rig();
        r.timer.advance(u32::MAX);
        assert_eq!(r.ranger.check_timeout(), None);
    }

    #[test]
    fn hold_withholds_next_cycle() {
        let mut r = rig();
        r.ranger.hold();
        assert!(!r.ranger.poll_trigger().unwrap());
        r.ranger.request();
        assert!(r.ranger.poll_trigger().unwrap());
    }

    #[test]
    fn rejects_bad_configuration() {
        let base = RangerConfig::default();
        let bad = [
            RangerConfig {
                ticks_per_unit: 0,
                ..base
            },
            RangerConfig {
                timer_rate: HertzU32::from_raw(0),
                ..base
            },
            base.with_timeout(MicrosDurationU32::from_ticks(0)),
            // 60 s at 80 MHz does not fit in 32 bits.
            base.with_timeout(MicrosDurationU32::from_ticks(60_000_000)),
        ];
        for cfg in bad {
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidRanger));
        }
        assert_eq!(base.validate(), Ok(()));
    }
}

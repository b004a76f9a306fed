// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pen up/down hysteresis and the sample delay line.
//!
//! `pen` counts consecutive pressed samples up from `0x00`. The third one latches the pen
//! down (`0x83`). From there consecutive released samples count down, and the third one
//! (`0x80`) latches the pen up again. A sample of the opposite kind partway through only
//! moves the counter back one step.
//!
//! Points are reported four samples late. The samples taken right after a press are the
//! least reliable, so the first four are buffered before `PenDown` is sent with the oldest
//! one. Every further sample sends `PenMove` with the oldest buffered point, and `PenUp`
//! reports the oldest point still in the buffer.

use super::{TouchEvent, TouchEventKind};

const PEN_UP: u8 = 0x00;
const PEN_DOWN_EDGE: u8 = 0x03;
const PEN_DOWN: u8 = 0x83;
const PEN_UP_EDGE: u8 = 0x80;

/// Index value at which the pre-fill is complete and `PenDown` goes out.
const PREFILL_DONE: i8 = -2;

#[derive(Debug)]
pub struct Debouncer {
    pen: u8,
    /// Next slot to report. Negative while the buffer is being pre-filled.
    index: i8,
    /// Four `(x, y)` pairs, flattened.
    samples: [i32; 8],
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            pen: PEN_UP,
            index: 0,
            samples: [0; 8],
        }
    }

    /// Feed one acquired pair. `pressed` is the raw-level press decision, `point` the
    /// calibrated position.
    pub fn update(&mut self, pressed: bool, point: (i32, i32)) -> Option<TouchEvent> {
        if pressed {
            self.pressed(point)
        } else {
            self.released()
        }
    }

    fn released(&mut self) -> Option<TouchEvent> {
        if self.pen == PEN_UP {
            return None;
        }
        self.pen -= 1;
        if self.pen != PEN_UP_EDGE {
            return None;
        }

        self.pen = PEN_UP;
        if self.index < 0 {
            debug!("touch: lifted before pen down was reported");
            return None;
        }
        Some(self.event_at(TouchEventKind::PenUp, self.index))
    }

    fn pressed(&mut self, (x, y): (i32, i32)) -> Option<TouchEvent> {
        if self.pen != PEN_DOWN {
            self.pen += 1;
            if self.pen == PEN_DOWN_EDGE {
                self.pen = PEN_DOWN;
                self.index = -8;
                self.store(0, x, y);
            }
            return None;
        }

        if self.index == PREFILL_DONE {
            let event = self.event_at(TouchEventKind::PenDown, 0);
            self.store(0, x, y);
            self.index = 2;
            Some(event)
        } else if self.index < 0 {
            self.store(self.index + 10, x, y);
            self.index += 2;
            None
        } else {
            let event = self.event_at(TouchEventKind::PenMove, self.index);
            self.store(self.index, x, y);
            self.index = (self.index + 2) & 7;
            Some(event)
        }
    }

    fn store(&mut self, slot: i8, x: i32, y: i32) {
        let slot = slot as usize;
        self.samples[slot] = x;
        self.samples[slot + 1] = y;
    }

    fn event_at(&self, kind: TouchEventKind, slot: i8) -> TouchEvent {
        let slot = slot as usize;
        TouchEvent {
            kind,
            x: self.samples[slot],
            y: self.samples[slot + 1],
        }
    }

    /// True once the pen-down latch is set.
    #[inline]
    pub fn is_down(&self) -> bool {
        self.pen & 0x80 != 0
    }

    /// Raw hysteresis counter.
    #[inline]
    pub fn pen_state(&self) -> u8 {
        self.pen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: i32) -> (i32, i32) {
        (n, n + 100)
    }

    fn ev(kind: TouchEventKind, n: i32) -> Option<TouchEvent> {
        Some(TouchEvent {
            kind,
            x: n,
            y: n + 100,
        })
    }

    #[test]
    fn three_presses_latch_pen_down() {
        let mut d = Debouncer::new();
        assert_eq!(d.update(true, p(1)), None);
        assert_eq!(d.pen_state(), 0x01);
        assert_eq!(d.update(true, p(2)), None);
        assert!(!d.is_down());
        assert_eq!(d.update(true, p(3)), None);
        assert_eq!(d.pen_state(), 0x83);
        assert!(d.is_down());
    }

    #[test]
    fn pen_down_is_reported_with_the_first_latched_sample() {
        let mut d = Debouncer::new();
        d.update(true, p(0));
        d.update(true, p(0));
        d.update(true, p(10));
        for n in [11, 12, 13] {
            assert_eq!(d.update(true, p(n)), None);
        }
        assert_eq!(d.update(true, p(14)), ev(TouchEventKind::PenDown, 10));
    }

    #[test]
    fn moves_are_delayed_by_four_samples() {
        let mut d = Debouncer::new();
        for n in [0, 0, 10, 11, 12, 13, 14] {
            d.update(true, p(n));
        }
        assert_eq!(d.update(true, p(15)), ev(TouchEventKind::PenMove, 11));
        assert_eq!(d.update(true, p(16)), ev(TouchEventKind::PenMove, 12));
        assert_eq!(d.update(true, p(17)), ev(TouchEventKind::PenMove, 13));
        assert_eq!(d.update(true, p(18)), ev(TouchEventKind::PenMove, 14));
        assert_eq!(d.update(true, p(19)), ev(TouchEventKind::PenMove, 15));
    }

    #[test]
    fn three_releases_latch_pen_up() {
        let mut d = Debouncer::new();
        for n in [0, 0, 10, 11, 12, 13, 14, 15] {
            d.update(true, p(n));
        }
        // Buffer now holds 14, 15, 12, 13 with 12 the oldest.
        assert_eq!(d.update(false, p(0)), None);
        assert_eq!(d.update(false, p(0)), None);
        assert_eq!(d.pen_state(), 0x81);
        assert_eq!(d.update(false, p(0)), ev(TouchEventKind::PenUp, 12));
        assert_eq!(d.pen_state(), 0x00);
        assert_eq!(d.update(false, p(0)), None);
    }

    #[test]
    fn short_glitches_do_not_change_the_latch() {
        let mut d = Debouncer::new();
        d.update(true, p(0));
        d.update(true, p(0));
        d.update(false, p(0));
        d.update(false, p(0));
        assert_eq!(d.pen_state(), 0x00);
        d.update(false, p(0));
        assert_eq!(d.pen_state(), 0x00);

        for n in [0, 0, 10, 11, 12, 13, 14] {
            d.update(true, p(n));
        }
        d.update(false, p(0));
        d.update(false, p(0));
        assert_eq!(d.pen_state(), 0x81);
        // A press climbs back to the latch without a new pen down.
        assert_eq!(d.update(true, p(50)), None);
        assert_eq!(d.update(true, p(51)), None);
        assert_eq!(d.pen_state(), 0x83);
        assert_eq!(d.update(true, p(52)), ev(TouchEventKind::PenMove, 11));
    }

    #[test]
    fn lift_during_prefill_reports_nothing() {
        let mut d = Debouncer::new();
        for n in [0, 0, 10, 11] {
            d.update(true, p(n));
        }
        assert_eq!(d.update(false, p(0)), None);
        assert_eq!(d.update(false, p(0)), None);
        assert_eq!(d.update(false, p(0)), None);
        assert!(!d.is_down());

        // The next press starts a fresh pre-fill.
        for n in [0, 0, 20, 21, 22, 23] {
            assert_eq!(d.update(true, p(n)), None);
        }
        assert_eq!(d.update(true, p(24)), ev(TouchEventKind::PenDown, 20));
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 4-wire resistive touchscreen driver.
//!
//! The panel is sampled by one ADC channel that is re-pointed at the X and Y layers in turn.
//! [`TouchScreen::on_adc_complete`] is called from the ADC interrupt. It advances the
//! acquisition cycle and, each time an X/Y pair completes, converts the pair to pixels and
//! runs the pen debouncer. Debounced events go to the registered [`TouchHandler`] and are
//! also returned to the caller.

pub mod acquisition;
pub mod calibration;
pub mod debounce;

pub use acquisition::{Acquisition, AcquisitionState};
pub use calibration::{Board, Calibration, Orientation};
pub use debounce::Debouncer;

/// Pin and ADC control for the four panel contacts.
pub trait TouchPanel {
    /// Read the finished conversion.
    fn take_sample(&mut self) -> u16;
    /// Power the X layer (X+ high, X- low) and float Y.
    fn drive_x_layer(&mut self);
    /// Point the ADC at a Y contact to read the X layer voltage.
    fn sense_through_y(&mut self);
    /// Power the Y layer (Y+ high, Y- low) and float X.
    fn drive_y_layer(&mut self);
    /// Point the ADC at an X contact to read the Y layer voltage.
    fn sense_through_x(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEventKind {
    PenDown,
    PenMove,
    PenUp,
}

/// A debounced pen event in screen pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    pub kind: TouchEventKind,
    pub x: i32,
    pub y: i32,
}

/// Receiver for touch events. Runs in interrupt context.
pub trait TouchHandler {
    fn on_touch_event(&mut self, event: TouchEvent);
}

impl<F: FnMut(TouchEvent)> TouchHandler for F {
    fn on_touch_event(&mut self, event: TouchEvent) {
        self(event)
    }
}

pub struct TouchScreen<P, H> {
    panel: P,
    acquisition: Acquisition,
    debouncer: Debouncer,
    calibration: Calibration,
    touch_min: i16,
    handler: Option<H>,
}

impl<P: TouchPanel, H: TouchHandler> TouchScreen<P, H> {
    pub fn new(panel: P, calibration: Calibration, touch_min: i16) -> Self {
        Self {
            panel,
            acquisition: Acquisition::new(),
            debouncer: Debouncer::new(),
            calibration,
            touch_min,
            handler: None,
        }
    }

    /// Driver using the built-in calibration and touch threshold of a board variant.
    pub fn for_board(panel: P, board: Board, orientation: Orientation) -> Self {
        Self::new(
            panel,
            Calibration::for_board(board, orientation),
            board.touch_min(),
        )
    }

    /// Register or clear the event handler. Returns the previous one.
    pub fn set_handler(&mut self, handler: Option<H>) -> Option<H> {
        core::mem::replace(&mut self.handler, handler)
    }

    /// Advance the acquisition by one finished conversion.
    pub fn on_adc_complete(&mut self) -> Option<TouchEvent> {
        let (rx, ry) = self.acquisition.step(&mut self.panel)?;

        let point = self.calibration.to_screen(rx, ry);
        let min = i32::from(self.touch_min);
        let pressed = i32::from(rx) >= min && i32::from(ry) >= min;

        let event = self.debouncer.update(pressed, point)?;
        match event.kind {
            TouchEventKind::PenDown => debug!("touch: down at {=i32},{=i32}", event.x, event.y),
            TouchEventKind::PenUp => debug!("touch: up at {=i32},{=i32}", event.x, event.y),
            TouchEventKind::PenMove => {}
        }

        if let Some(handler) = self.handler.as_mut() {
            handler.on_touch_event(event);
        }
        Some(event)
    }

    /// Last raw X/Y readings.
    #[inline]
    pub fn raw(&self) -> (u16, u16) {
        self.acquisition.raw()
    }

    #[inline]
    pub fn is_pen_down(&self) -> bool {
        self.debouncer.is_down()
    }

    #[inline]
    pub fn acquisition_state(&self) -> AcquisitionState {
        self.acquisition.state()
    }

    /// Tear down the driver and return the panel.
    pub fn free(self) -> P {
        self.panel
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::*;
    use crate::testing::MockPanel;

    type Log = Rc<RefCell<Vec<TouchEvent>>>;

    /// Queue the four conversions of one X/Y pair, settling codes first.
    fn queue_pair(panel: &MockPanel, x: u16, y: u16) {
        panel.push(0);
        panel.push(x);
        panel.push(0);
        panel.push(y);
    }

    fn screen() -> (TouchScreen<MockPanel, impl FnMut(TouchEvent)>, MockPanel, Log) {
        let panel = MockPanel::new();
        let log: Log = Rc::default();
        let sink = log.clone();
        let cal = Calibration::new([1, 0, 0, 0, 1, 0, 1]).unwrap();
        let mut ts = TouchScreen::new(panel.clone(), cal, 150);
        ts.set_handler(Some(move |e: TouchEvent| sink.borrow_mut().push(e)));

        // Init conversion.
        panel.push(0);
        ts.on_adc_complete();
        (ts, panel, log)
    }

    fn run_pair<H: TouchHandler>(
        ts: &mut TouchScreen<MockPanel, H>,
        panel: &MockPanel,
        x: u16,
        y: u16,
    ) -> Option<TouchEvent> {
        queue_pair(panel, x, y);
        let mut last = None;
        for _ in 0..4 {
            last = ts.on_adc_complete().or(last);
        }
        last
    }

    #[test]
    fn press_and_release_reach_the_handler() {
        let (mut ts, panel, log) = screen();

        for n in 0..7 {
            run_pair(&mut ts, &panel, 1000 + n, 2000 + n);
        }
        assert!(ts.is_pen_down());
        for _ in 0..3 {
            run_pair(&mut ts, &panel, 0, 0);
        }
        assert!(!ts.is_pen_down());

        let log = log.borrow();
        assert_eq!(
            *log,
            [
                TouchEvent {
                    kind: TouchEventKind::PenDown,
                    x: 1002,
                    y: 2002
                },
                TouchEvent {
                    kind: TouchEventKind::PenUp,
                    x: 1003,
                    y: 2003
                },
            ]
        );
    }

    #[test]
    fn both_axes_must_clear_the_threshold() {
        let (mut ts, panel, log) = screen();
        for _ in 0..8 {
            run_pair(&mut ts, &panel, 149, 3000);
            run_pair(&mut ts, &panel, 3000, 149);
        }
        assert!(!ts.is_pen_down());
        assert!(log.borrow().is_empty());

        for _ in 0..3 {
            run_pair(&mut ts, &panel, 150, 150);
        }
        assert!(ts.is_pen_down());
        assert_eq!(ts.raw(), (150, 150));
    }

    #[test]
    fn cleared_handler_still_returns_events() {
        let (mut ts, panel, log) = screen();
        assert!(ts.set_handler(None).is_some());

        let mut events = Vec::new();
        for n in 0..8 {
            if let Some(e) = run_pair(&mut ts, &panel, 500, 600 + n) {
                events.push(e.kind);
            }
        }
        assert_eq!(events, [TouchEventKind::PenDown, TouchEventKind::PenMove]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn uses_board_threshold() {
        let panel = MockPanel::new();
        let mut ts: TouchScreen<MockPanel, fn(TouchEvent)> =
            TouchScreen::for_board(panel.clone(), Board::SramFlash, Orientation::Landscape);
        panel.push(0);
        ts.on_adc_complete();
        for _ in 0..3 {
            run_pair(&mut ts, &panel, 40, 40);
        }
        assert!(ts.is_pen_down());
        assert_eq!(ts.acquisition_state(), AcquisitionState::SkipX);
    }
}

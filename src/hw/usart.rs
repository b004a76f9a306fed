// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! The debug console on USART1 takes setpoint lines and prints readouts; the command link on
//! USART2 receives leg command bytes and carries status frames back to the host. Reception is
//! interrupt driven: enable `Rxne` on the `Serial` before splitting it, then drain
//! [`UsartRx::read_byte`] from the handler. The [`Usart`] transmit half stays with the idle loop.
//!
//! Note: When using `writeln!`, be sure to include `\r` (CR) in the format string to ensure correct
//! line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

use crate::protocol::StatusFrame;

/// Transmit half. Writes block until each byte is in the data register, so keep it out of
/// interrupt context and out of critical sections.
pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

/// Receive half, drained from the RXNE interrupt.
pub struct UsartRx<U: Instance> {
    rx: Rx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn split<PINS: Pins<U>>(serial: Serial<U, PINS>) -> (Self, UsartRx<U>) {
        let (tx, rx) = serial.split();
        (Self { tx }, UsartRx { rx })
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Send a status frame to the host.
    pub fn write_frame(&mut self, frame: &StatusFrame) {
        for b in frame.to_bytes() {
            self.write_byte(b);
        }
    }
}

impl<U: Instance> UsartRx<U> {
    /// Next received byte, or `None` if the receive register is empty or reported an error.
    #[inline]
    pub fn read_byte(&mut self) -> Option<u8> {
        self.rx.read().ok()
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

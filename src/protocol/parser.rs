// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line parser for position setpoints typed on the debug console.
//!
//! A setpoint is a signed decimal number of tenths of a degree terminated by `'\r'`, for
//! example `-450\r` for -45.0°. Lines are read the way C's `strtol` reads them: leading
//! whitespace is skipped, an optional sign is accepted, and digits are consumed up to the
//! first non-digit. A line with no digits yields 0.

use heapless::Vec;

/// Longest accepted line, not counting the terminator.
pub const LINE_CAPACITY: usize = 8;

const TERMINATOR: u8 = b'\r';

enum State {
    Collecting,
    /// The line outgrew the buffer; drop everything up to the next terminator.
    Discarding,
}

pub struct SetpointParser {
    state: State,
    line: Vec<u8, LINE_CAPACITY>,
}

impl Default for SetpointParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SetpointParser {
    pub const fn new() -> Self {
        Self {
            state: State::Collecting,
            line: Vec::new(),
        }
    }

    /// Process a single incoming byte. Returns the setpoint when a line is terminated.
    pub fn push(&mut self, byte: u8) -> Option<i32> {
        match self.state {
            State::Collecting => {
                if byte == TERMINATOR {
                    let value = parse_decimal(&self.line);
                    self.line.clear();
                    return Some(value);
                }
                if self.line.push(byte).is_err() {
                    self.line.clear();
                    self.state = State::Discarding;
                }
            }
            State::Discarding => {
                if byte == TERMINATOR {
                    warn!("setpoint line too long, discarded");
                    self.state = State::Collecting;
                }
            }
        }
        None
    }

    /// Bytes collected so far on the current line.
    pub fn pending(&self) -> &[u8] {
        &self.line
    }
}

/// `strtol(s, NULL, 10)` on a byte string, saturating at the `i32` range.
pub fn parse_decimal(s: &[u8]) -> i32 {
    let mut rest = s;
    while let [b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r', tail @ ..] = rest {
        rest = tail;
    }

    let negative = match rest {
        [b'-', tail @ ..] => {
            rest = tail;
            true
        }
        [b'+', tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    for &b in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i32::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut SetpointParser, line: &[u8]) -> Option<i32> {
        let mut out = None;
        for &b in line {
            out = parser.push(b);
        }
        out
    }

    #[test]
    fn yields_on_carriage_return() {
        let mut p = SetpointParser::new();
        assert_eq!(p.push(b'9'), None);
        assert_eq!(p.push(b'0'), None);
        assert_eq!(p.pending(), b"90");
        assert_eq!(p.push(b'\r'), Some(90));
        assert!(p.pending().is_empty());
        assert_eq!(feed(&mut p, b"-450\r"), Some(-450));
    }

    #[test]
    fn reads_like_strtol() {
        assert_eq!(parse_decimal(b"  +12"), 12);
        assert_eq!(parse_decimal(b"\t-7x9"), -7);
        assert_eq!(parse_decimal(b"abc"), 0);
        assert_eq!(parse_decimal(b""), 0);
        assert_eq!(parse_decimal(b"-"), 0);
        assert_eq!(parse_decimal(b"- 5"), 0);
        assert_eq!(parse_decimal(b"99999999999"), i32::MAX);
        assert_eq!(parse_decimal(b"-99999999999"), i32::MIN);
    }

    #[test]
    fn empty_line_is_zero() {
        let mut p = SetpointParser::new();
        assert_eq!(p.push(b'\r'), Some(0));
    }

    #[test]
    fn full_buffer_is_accepted() {
        let mut p = SetpointParser::new();
        assert_eq!(feed(&mut p, b"-1234567\r"), Some(-1_234_567));
    }

    #[test]
    fn overlong_line_is_discarded() {
        let mut p = SetpointParser::new();
        assert_eq!(feed(&mut p, b"123456789\r"), None);
        assert!(p.pending().is_empty());
        assert_eq!(feed(&mut p, b"15\r"), Some(15));
    }
}

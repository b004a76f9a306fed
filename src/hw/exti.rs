// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! External interrupt line routing.
//!
//! Lines are configured through the shared SYSCFG and EXTI register blocks, so these are free
//! functions rather than owned peripherals.

use stm32f7xx_hal::pac;

/// GPIO port selector as encoded in `SYSCFG_EXTICRx`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

/// Route `port`'s pin `line` to EXTI line `line` and unmask it for `edge`.
pub fn listen(port: Port, line: u8, edge: Edge) {
    let rcc = unsafe { &*pac::RCC::ptr() };
    let syscfg = unsafe { &*pac::SYSCFG::ptr() };
    let exti = unsafe { &*pac::EXTI::ptr() };

    rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

    let shift = u32::from(line % 4) * 4;
    let select = |bits: u32| (bits & !(0xF << shift)) | ((port as u32) << shift);
    match line / 4 {
        0 => syscfg
            .exticr1
            .modify(|r, w| unsafe { w.bits(select(r.bits())) }),
        1 => syscfg
            .exticr2
            .modify(|r, w| unsafe { w.bits(select(r.bits())) }),
        2 => syscfg
            .exticr3
            .modify(|r, w| unsafe { w.bits(select(r.bits())) }),
        _ => syscfg
            .exticr4
            .modify(|r, w| unsafe { w.bits(select(r.bits())) }),
    }

    let mask = 1u32 << line;
    let rising = matches!(edge, Edge::Rising | Edge::Both);
    let falling = matches!(edge, Edge::Falling | Edge::Both);

    exti.rtsr.modify(|r, w| unsafe {
        w.bits(if rising { r.bits() | mask } else { r.bits() & !mask })
    });
    exti.ftsr.modify(|r, w| unsafe {
        w.bits(if falling { r.bits() | mask } else { r.bits() & !mask })
    });

    clear(line);
    exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });
}

/// Returns true if `line` has a pending interrupt.
#[inline]
pub fn is_pending(line: u8) -> bool {
    let exti = unsafe { &*pac::EXTI::ptr() };
    exti.pr.read().bits() & (1 << line) != 0
}

/// Clear the pending bit of `line` (write-one-to-clear).
#[inline]
pub fn clear(line: u8) {
    let exti = unsafe { &*pac::EXTI::ptr() };
    exti.pr.write(|w| unsafe { w.bits(1 << line) });
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-safe ownership of driver state.
//!
//! Every piece of state that an interrupt handler touches is owned by one [`Shared`] static.
//! `main` builds the driver, installs it once, and each handler then borrows it inside a
//! critical section:
//!
//! ```ignore
//! static RANGER: Shared<Ranger> = Shared::new();
//!
//! RANGER.install(ranger);
//!
//! #[interrupt]
//! fn EXTI2() {
//!     RANGER.with(|r| r.on_echo_edge());
//! }
//! ```
//!
//! Data that leaves interrupt context for slow work such as serial output goes through an
//! [`Outbox`] instead. The handler pushes under a short lock and the idle loop pops each item
//! and does the I/O with interrupts enabled.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// A value that is installed once and then accessed only with interrupts masked.
pub struct Shared<T> {
    inner: Mutex<RefCell<Option<T>>>,
}

impl<T> Shared<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Hand the value over to interrupt context. Replaces any previously installed value.
    pub fn install(&self, value: T) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).replace(value);
        });
    }

    /// Take the value back out, leaving the cell empty.
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Run `f` on the value inside a critical section.
    ///
    /// Returns `None` if nothing has been installed yet, which happens when an interrupt
    /// fires during startup.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded queue from interrupt handlers to the idle loop. When full, the oldest item is dropped.
pub struct Outbox<T, const N: usize> {
    inner: Mutex<RefCell<Deque<T, N>>>,
}

impl<T, const N: usize> Outbox<T, N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Queue `item`. Returns `false` if an older item had to be dropped to make room.
    pub fn push(&self, item: T) -> bool {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow_ref_mut(cs);
            let dropped = queue.is_full() && queue.pop_front().is_some();
            let _ = queue.push_back(item);
            !dropped
        })
    }

    pub fn pop(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const N: usize> Default for Outbox<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

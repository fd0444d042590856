//! # Shared slot
//!
//! On the target the interrupter lives in a `static` so that the interrupt handlers and the main loop can all reach
//! it. `Shared` is that static's type: an initially empty slot guarded by a critical section.
//!
//! ```
//! use midi_interrupter::shared::Shared;
//!
//! static COUNTER: Shared<u32> = Shared::new();
//!
//! // nothing installed yet
//! assert_eq!(COUNTER.with(|c| *c), None);
//!
//! COUNTER.install(41);
//! COUNTER.with(|c| *c += 1);
//! assert_eq!(COUNTER.with(|c| *c), Some(42));
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

/// A critical-section guarded slot is represented here
pub struct Shared<T> {
    inner: Mutex<RefCell<Option<T>>>,
}

impl<T> Shared<T> {
    /// `Shared::new()` is a new empty slot, usable in a `static`
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// `s.install(v)` puts `v` in the slot, and is whatever was there before
    pub fn install(&self, value: T) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(value))
    }

    /// `s.with(f)` runs `f` on the slot's contents inside a critical section, and is `f`'s result
    ///
    /// `None` if nothing has been installed yet. Calling `with` again from inside `f` on the same slot panics, the
    /// handlers using it must not be re-entered.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Mutex poison handling.
//!
//! The only shared state in this crate is the parse cache and the logger's
//! writer. Both are safe to keep using after a panic elsewhere: a stale cache
//! entry is still a valid colour, and a half-written log line is harmless.
//! So every lock goes through [`lock_recover`] instead of unwrapping.
//!
//! Tests should keep using `.lock().unwrap()` so poisoning fails them fast.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Recovery clears the poison flag, so later callers take the fast path.
/// Debug builds log a warning when recovery happens. The warning is emitted
/// with the lock released, since the installed logger may need this same
/// mutex (the `ColourLogger` writer, for one).
///
/// ```
/// use std::sync::Mutex;
/// use colour_rs::sync::lock_recover;
///
/// let mutex = Mutex::new(42);
/// assert_eq!(*lock_recover(&mutex), 42);
/// ```
#[inline]
pub fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            drop(poisoned);
            mutex.clear_poison();
            #[cfg(debug_assertions)]
            log::warn!("recovered poisoned mutex");
            mutex.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

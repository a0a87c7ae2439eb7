//! Re-entrancy guard.
//!
//! Resolving a path calls libc routines that may themselves be intercepted (on macOS
//! `realpath` and `getcwd` call `lstat`/`stat`). While an intercepted call is being
//! checked, the guard is held on that thread, and any nested intercepted call goes
//! straight to the original implementation: the outer call already performed the check.
//!
//! The flag is per thread, so one thread's internal calls are never attributed to another.
use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static HELD: Cell<bool> = const { Cell::new(false) };
}

/// Scoped ownership of this thread's guard. Released on drop, including unwinding and
/// early returns.
#[derive(Debug)]
#[must_use = "the guard is released as soon as it is dropped"]
pub struct ReentryGuard {
    // Tied to the thread whose flag it set.
    _not_send: PhantomData<*const ()>,
}

impl ReentryGuard {
    /// Take the guard, or `None` if an outer intercepted call on this thread holds it.
    pub fn acquire() -> Option<Self> {
        let was_held = HELD.try_with(|held| held.replace(true)).unwrap_or(false);
        if was_held {
            None
        } else {
            Some(Self {
                _not_send: PhantomData,
            })
        }
    }

    /// Whether an intercepted call is in progress on this thread.
    pub fn is_held() -> bool {
        HELD.try_with(Cell::get).unwrap_or(false)
    }
}

impl Drop for ReentryGuard {
    fn drop(&mut self) {
        let _ = HELD.try_with(|held| held.set(false));
    }
}

/// How `with_guard` entered its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Outermost intercepted call on this thread: run the checks.
    Checked,
    /// Nested inside another intercepted call: go straight to the original.
    Passthrough,
}

/// Run `body` with this thread's guard held, telling it whether it is the outermost call.
/// The guard is released when `body` returns or unwinds.
pub fn with_guard<T>(body: impl FnOnce(Entry) -> T) -> T {
    match ReentryGuard::acquire() {
        Some(_guard) => body(Entry::Checked),
        None => body(Entry::Passthrough),
    }
}

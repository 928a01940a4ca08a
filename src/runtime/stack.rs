//! Stack growth for nested calls.
//!
//! Each interpreted call costs several host frames, so deep recursion runs
//! out of a 2 MiB thread stack long before the configured call-depth cap.
//! Calls go through [`ensure_sufficient_stack`], which grows the stack on
//! demand and leaves the depth cap as the only user-visible limit.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

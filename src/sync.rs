//! # Synchronization Primitives
//!
//! The only shared mutable state is the global scheduler. On a single
//! hart a critical section just masks machine interrupts, which the trap
//! handler runs with anyway.

pub use critical_section::{CriticalSection, Mutex};

/// Execute a closure within a critical section (interrupts disabled).
///
/// # Usage
/// ```ignore
/// sync::critical_section(|cs| {
///     SCHEDULER.borrow_ref_mut(cs).replace(scheduler);
/// });
/// ```
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}

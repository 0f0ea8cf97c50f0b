//! # Timer Driver
//!
//! Programs the CLINT compare register relative to the free-running
//! `mtime` counter. A machine timer interrupt is raised once
//! `mtime >= mtimecmp`.

use crate::arch::Hart;

/// Current value of the free-running counter.
#[inline]
pub fn current_time<H: Hart + ?Sized>(hart: &H) -> u64 {
    hart.mtime()
}

/// Schedule the next timer interrupt `offset` ticks from now.
///
/// The 64-bit counter is assumed never to wrap during operation.
pub fn arm_timer<H: Hart + ?Sized>(hart: &mut H, offset: u64) {
    let deadline = current_time(hart).wrapping_add(offset);
    hart.set_mtimecmp(deadline);
}

//! # Interrupt Control
//!
//! Machine-mode global (`mstatus.MIE`) and timer (`mie.MTIE`) interrupt
//! enables. `enable_interrupts` and `disable_interrupts` are used as a
//! matched pair around anything that must not be preempted.

use crate::arch::Hart;
use crate::config::{MIE_MTIE, MSTATUS_MIE};

/// Enable machine interrupts and the timer source, and install the trap
/// vector.
pub fn enable_interrupts<H: Hart + ?Sized>(hart: &mut H) {
    let status = hart.mstatus() | MSTATUS_MIE;
    hart.set_mstatus(status);

    let enabled = hart.mie() | MIE_MTIE;
    hart.set_mie(enabled);

    let vector = hart.trap_entry();
    hart.set_mtvec(vector);
}

/// Clear the bits set by [`enable_interrupts`]. `mtvec` is left alone.
pub fn disable_interrupts<H: Hart + ?Sized>(hart: &mut H) {
    let status = hart.mstatus() & !MSTATUS_MIE;
    hart.set_mstatus(status);

    let enabled = hart.mie() & !MIE_MTIE;
    hart.set_mie(enabled);
}

//! # Trap Handler
//!
//! Runs on every machine-mode trap, with interrupts disabled for its whole
//! body. Machine timer interrupts drive the round-robin switch; every other
//! cause is fatal.
//!
//! ```text
//!   ┌──────────┐  first timer IRQ  ┌────────────┐
//!   │   Idle   │ ────────────────► │ Scheduling │ ◄──┐ timer IRQ
//!   └──────────┘                   └────────────┘ ───┘
//!        │                               │
//!        └──────── other cause ──────────┴──────► Halted (forever)
//! ```

use crate::arch::Hart;
use crate::config::{CAUSE_CODE_MASK, MACHINE_TIMER_CAUSE, STEADY_QUANTUM};
use crate::interrupt::{disable_interrupts, enable_interrupts};
use crate::scheduler::Scheduler;
use crate::task::RegisterFile;
use crate::timer::arm_timer;

/// Trap CSRs as captured by the trap vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapContext {
    /// `mepc`: address of the interrupted instruction.
    pub epc: usize,
    /// `mtval`
    pub tval: usize,
    /// `mcause`
    pub cause: usize,
    /// `mhartid`
    pub hart: usize,
    /// `mstatus`
    pub status: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapCause {
    MachineTimer,
    /// Anything else, carrying the masked cause code.
    Other(usize),
}

impl TrapCause {
    /// Decode the low 9 bits of `mcause`.
    pub fn decode(cause: usize) -> Self {
        match cause & CAUSE_CODE_MASK {
            MACHINE_TIMER_CAUSE => TrapCause::MachineTimer,
            code => TrapCause::Other(code),
        }
    }
}

/// Handle one trap and return the address to resume at.
///
/// For a timer interrupt `frame` is replaced with the next task's
/// registers. Any other cause prints the faulting address and halts the
/// hart; this function then never returns.
pub fn handle_trap<H: Hart + ?Sized, const N: usize>(
    sched: &mut Scheduler<N>,
    hart: &mut H,
    ctx: &TrapContext,
    frame: &mut RegisterFile,
) -> usize {
    disable_interrupts(hart);

    match TrapCause::decode(ctx.cause) {
        TrapCause::MachineTimer => {
            let from = sched.current_task();
            let bootstrap = !sched.is_initialized();
            let next_pc = sched.switch(ctx.epc, frame);

            if bootstrap {
                log::debug!("scheduling starts with task {}", sched.current_task());
            } else {
                log::trace!("task {} -> task {} @ {:#x}", from, sched.current_task(), next_pc);
            }

            arm_timer(hart, STEADY_QUANTUM);
            enable_interrupts(hart);
            next_pc
        }
        TrapCause::Other(_) => fatal(hart, ctx),
    }
}

/// Report an unrecoverable trap and stop.
pub fn fatal<H: Hart + ?Sized>(hart: &mut H, ctx: &TrapContext) -> ! {
    let code = ctx.cause & CAUSE_CODE_MASK;
    log::error!("{} <-", ctx.epc);
    log::error!(
        "fatal trap: cause={} code={} tval={:#x} hart={} mstatus={:#x}",
        ctx.cause,
        code,
        ctx.tval,
        ctx.hart,
        ctx.status
    );
    hart.halt()
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::sim::SimHart;
    use crate::config::{MIE_MTIE, MSTATUS_MIE};
    use crate::task::TaskEntry;

    extern "C" fn task_a() -> ! {
        loop {}
    }

    extern "C" fn task_b() -> ! {
        loop {}
    }

    const INTERRUPT: usize = 1 << 63;

    fn timer_ctx(epc: usize) -> TrapContext {
        TrapContext {
            epc,
            tval: 0,
            cause: INTERRUPT | MACHINE_TIMER_CAUSE,
            hart: 0,
            status: 0x1880,
        }
    }

    fn setup() -> (Scheduler<2>, SimHart) {
        let mut sched = Scheduler::new([task_a as TaskEntry, task_b]);
        sched.prime(0x8800_0000, &RegisterFile::zeroed()).unwrap();
        let mut hart = SimHart::new();
        crate::interrupt::enable_interrupts(&mut hart);
        (sched, hart)
    }

    #[test]
    fn test_decode_masks_cause() {
        assert_eq!(TrapCause::decode(INTERRUPT | 7), TrapCause::MachineTimer);
        assert_eq!(TrapCause::decode(7), TrapCause::MachineTimer);
        assert_eq!(TrapCause::decode(0x207), TrapCause::MachineTimer);
        assert_eq!(TrapCause::decode(INTERRUPT | 11), TrapCause::Other(11));
        assert_eq!(TrapCause::decode(2), TrapCause::Other(2));
    }

    #[test]
    fn test_timer_trap_rearms_and_reenables() {
        let (mut sched, mut hart) = setup();
        hart.mtime = 7_000;
        let mut frame = RegisterFile::zeroed();

        let pc = handle_trap(&mut sched, &mut hart, &timer_ctx(0x8000_0000), &mut frame);

        assert_eq!(pc, (task_a as TaskEntry) as usize);
        assert_eq!(hart.mtimecmp, 7_000 + STEADY_QUANTUM);
        assert_ne!(hart.mstatus & MSTATUS_MIE, 0);
        assert_ne!(hart.mie & MIE_MTIE, 0);
    }

    #[test]
    fn test_timer_sequence_alternates() {
        let (mut sched, mut hart) = setup();
        let mut frame = RegisterFile::zeroed();

        let mut pcs = [0usize; 5];
        let mut epc = 0x8000_0000;
        for pc in pcs.iter_mut() {
            hart.advance(STEADY_QUANTUM);
            *pc = handle_trap(&mut sched, &mut hart, &timer_ctx(epc), &mut frame);
            epc = *pc + 0x40;
        }

        assert_eq!(pcs[0], (task_a as TaskEntry) as usize);
        assert_eq!(pcs[1], (task_b as TaskEntry) as usize);
        assert_eq!(pcs[2], (task_a as TaskEntry) as usize + 0x40);
        assert_eq!(pcs[3], (task_b as TaskEntry) as usize + 0x40);
        assert_eq!(pcs[4], (task_a as TaskEntry) as usize + 0x80);
    }

    #[test]
    #[should_panic(expected = "hart halted")]
    fn test_exception_halts() {
        let (mut sched, mut hart) = setup();
        let mut frame = RegisterFile::zeroed();
        let ctx = TrapContext {
            epc: 0x8000_1234,
            tval: 0,
            cause: 2, // illegal instruction
            hart: 0,
            status: 0x1880,
        };

        handle_trap(&mut sched, &mut hart, &ctx, &mut frame);
    }

    #[test]
    #[should_panic(expected = "hart halted")]
    fn test_unknown_interrupt_halts_after_scheduling_started() {
        let (mut sched, mut hart) = setup();
        let mut frame = RegisterFile::zeroed();
        handle_trap(&mut sched, &mut hart, &timer_ctx(0), &mut frame);

        let ctx = TrapContext {
            cause: INTERRUPT | 11, // machine external
            ..timer_ctx(0x8000_2000)
        };
        handle_trap(&mut sched, &mut hart, &ctx, &mut frame);
    }

    #[test]
    fn test_fatal_trap_leaves_hart_disabled() {
        let (mut sched, mut hart) = setup();
        let mut frame = RegisterFile::zeroed();
        let ctx = TrapContext {
            cause: 5,
            ..timer_ctx(0x8000_3000)
        };

        let halted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            handle_trap(&mut sched, &mut hart, &ctx, &mut frame)
        }));

        assert!(halted.is_err());
        assert_eq!(hart.mstatus & MSTATUS_MIE, 0);
        assert_eq!(hart.mie & MIE_MTIE, 0);
        assert_eq!(hart.mtimecmp, u64::MAX);
        assert!(!sched.is_initialized());
    }
}

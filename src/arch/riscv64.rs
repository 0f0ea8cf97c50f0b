//! # RISC-V Machine-Mode Port
//!
//! Real CSR and CLINT access for QEMU `virt`, plus the trap vector.
//!
//! ## Trap Vector
//!
//! `mscratch` always holds the address of the trap frame (a
//! `RegisterFile`). On any trap `m_trap_vector`:
//!
//! 1. swaps `t6` with `mscratch` and stores x1–x31 into the frame
//!    (register `i` at byte offset `8 * i`)
//! 2. switches `sp` to `frame.trap_stack`
//! 3. calls `handle_trap(mepc, mtval, mcause, mhartid, mstatus, frame)`
//! 4. writes the returned address to `mepc`, reloads x1–x31 from the
//!    (possibly replaced) frame and `mret`s
//!
//! Floating-point registers are not touched by the vector.

use core::arch::{asm, global_asm};

use riscv::register::{mhartid, mie, mstatus};

use super::Hart;
use crate::config::{CLINT_BASE, CLINT_MTIMECMP_OFFSET, CLINT_MTIME_OFFSET};
use crate::mmio::Mmio;
use crate::task::TRAP_STACK_OFFSET;

extern "C" {
    fn m_trap_vector();
}

global_asm!(
    ".section .text.m_trap_vector, \"ax\", @progbits",
    ".align 4",
    ".global m_trap_vector",
    "m_trap_vector:",
    "    csrrw t6, mscratch, t6",
    "    sd x1, 8(t6)",
    "    sd x2, 16(t6)",
    "    sd x3, 24(t6)",
    "    sd x4, 32(t6)",
    "    sd x5, 40(t6)",
    "    sd x6, 48(t6)",
    "    sd x7, 56(t6)",
    "    sd x8, 64(t6)",
    "    sd x9, 72(t6)",
    "    sd x10, 80(t6)",
    "    sd x11, 88(t6)",
    "    sd x12, 96(t6)",
    "    sd x13, 104(t6)",
    "    sd x14, 112(t6)",
    "    sd x15, 120(t6)",
    "    sd x16, 128(t6)",
    "    sd x17, 136(t6)",
    "    sd x18, 144(t6)",
    "    sd x19, 152(t6)",
    "    sd x20, 160(t6)",
    "    sd x21, 168(t6)",
    "    sd x22, 176(t6)",
    "    sd x23, 184(t6)",
    "    sd x24, 192(t6)",
    "    sd x25, 200(t6)",
    "    sd x26, 208(t6)",
    "    sd x27, 216(t6)",
    "    sd x28, 224(t6)",
    "    sd x29, 232(t6)",
    "    sd x30, 240(t6)",
    "    mv t5, t6",
    "    csrr t6, mscratch",
    "    sd t6, 248(t5)",
    "    csrw mscratch, t5",
    "    ld sp, {trap_stack}(t5)",
    "    csrr a0, mepc",
    "    csrr a1, mtval",
    "    csrr a2, mcause",
    "    csrr a3, mhartid",
    "    csrr a4, mstatus",
    "    mv a5, t5",
    "    call handle_trap",
    "    csrw mepc, a0",
    "    csrr t6, mscratch",
    "    ld x1, 8(t6)",
    "    ld x2, 16(t6)",
    "    ld x3, 24(t6)",
    "    ld x4, 32(t6)",
    "    ld x5, 40(t6)",
    "    ld x6, 48(t6)",
    "    ld x7, 56(t6)",
    "    ld x8, 64(t6)",
    "    ld x9, 72(t6)",
    "    ld x10, 80(t6)",
    "    ld x11, 88(t6)",
    "    ld x12, 96(t6)",
    "    ld x13, 104(t6)",
    "    ld x14, 112(t6)",
    "    ld x15, 120(t6)",
    "    ld x16, 128(t6)",
    "    ld x17, 136(t6)",
    "    ld x18, 144(t6)",
    "    ld x19, 152(t6)",
    "    ld x20, 160(t6)",
    "    ld x21, 168(t6)",
    "    ld x22, 176(t6)",
    "    ld x23, 184(t6)",
    "    ld x24, 192(t6)",
    "    ld x25, 200(t6)",
    "    ld x26, 208(t6)",
    "    ld x27, 216(t6)",
    "    ld x28, 224(t6)",
    "    ld x29, 232(t6)",
    "    ld x30, 240(t6)",
    "    ld t6, 248(t6)",
    "    mret",
    trap_stack = const TRAP_STACK_OFFSET,
);

/// The hart this firmware runs on.
pub struct MachineHart {
    mtime: Mmio<u64>,
    mtimecmp: Mmio<u64>,
}

impl MachineHart {
    /// # Safety
    /// Only code running in machine mode on the QEMU `virt` board may
    /// create a `MachineHart`; handles must not be used concurrently.
    pub const unsafe fn new() -> Self {
        Self {
            mtime: Mmio::new(CLINT_BASE + CLINT_MTIME_OFFSET),
            mtimecmp: Mmio::new(CLINT_BASE + CLINT_MTIMECMP_OFFSET),
        }
    }
}

impl Hart for MachineHart {
    fn hart_id(&self) -> usize {
        mhartid::read()
    }

    fn global_pointer(&self) -> usize {
        let gp: usize;
        unsafe { asm!("mv {}, gp", out(reg) gp) };
        gp
    }

    fn mstatus(&self) -> usize {
        mstatus::read().bits()
    }

    fn set_mstatus(&mut self, value: usize) {
        unsafe { asm!("csrw mstatus, {}", in(reg) value) }
    }

    fn mie(&self) -> usize {
        mie::read().bits()
    }

    fn set_mie(&mut self, value: usize) {
        unsafe { asm!("csrw mie, {}", in(reg) value) }
    }

    fn set_mtvec(&mut self, value: usize) {
        unsafe { asm!("csrw mtvec, {}", in(reg) value) }
    }

    fn set_mscratch(&mut self, value: usize) {
        unsafe { asm!("csrw mscratch, {}", in(reg) value) }
    }

    fn mvendorid(&self) -> usize {
        let bits: usize;
        unsafe { asm!("csrr {}, mvendorid", out(reg) bits) };
        bits
    }

    fn marchid(&self) -> usize {
        let bits: usize;
        unsafe { asm!("csrr {}, marchid", out(reg) bits) };
        bits
    }

    fn mtime(&self) -> u64 {
        self.mtime.read()
    }

    fn set_mtimecmp(&mut self, deadline: u64) {
        self.mtimecmp.write(deadline);
    }

    fn trap_entry(&self) -> usize {
        m_trap_vector as unsafe extern "C" fn() as usize
    }

    fn halt(&mut self) -> ! {
        loop {
            core::hint::spin_loop();
        }
    }
}

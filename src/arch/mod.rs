//! # Architecture Abstraction Layer
//!
//! The hardware boundary of the kernel. Everything the scheduler needs from
//! the hart goes through the [`Hart`] trait: one named operation per
//! control/status register plus the CLINT timer registers.
//!
//! - `riscv64`: the real machine-mode port (QEMU `virt`)
//! - `sim`: an in-memory stand-in used by the host unit tests

#[cfg(target_arch = "riscv64")]
pub mod riscv64;

#[cfg(test)]
pub mod sim;

/// Hardware access for a single RISC-V hart running in machine mode.
pub trait Hart {
    /// `mhartid` of the executing hart.
    fn hart_id(&self) -> usize;

    /// Current `gp`, shared by all code linked into the image.
    fn global_pointer(&self) -> usize;

    /// Machine status register.
    fn mstatus(&self) -> usize;
    fn set_mstatus(&mut self, value: usize);

    /// Machine interrupt-enable register.
    fn mie(&self) -> usize;
    fn set_mie(&mut self, value: usize);

    /// Machine trap-vector base address register.
    fn set_mtvec(&mut self, value: usize);

    /// Machine scratch register; holds the trap frame address.
    fn set_mscratch(&mut self, value: usize);

    /// Vendor ID (read-only, diagnostics only).
    fn mvendorid(&self) -> usize;

    /// Architecture ID (read-only, diagnostics only).
    fn marchid(&self) -> usize;

    /// CLINT free-running counter.
    fn mtime(&self) -> u64;

    /// CLINT compare register; a timer interrupt is raised once
    /// `mtime >= mtimecmp`.
    fn set_mtimecmp(&mut self, deadline: u64);

    /// Address installed into `mtvec` when interrupts are enabled.
    fn trap_entry(&self) -> usize;

    /// Stop the hart for good.
    fn halt(&mut self) -> !;
}

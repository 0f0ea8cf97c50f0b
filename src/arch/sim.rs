//! Simulated hart for host tests.
//!
//! CSRs and CLINT registers are plain fields. `halt` panics so tests can
//! observe that control never comes back (`#[should_panic]`).
//! `mtimecmp_at_enable` records the deadline in force each time `MIE` is
//! switched on, so tests can check the timer was armed first.

use super::Hart;
use crate::config::{MIE_MTIE, MSTATUS_MIE};

/// Fake trap vector address reported by [`SimHart::trap_entry`].
pub const SIM_TRAP_ENTRY: usize = 0x8000_0100;

#[derive(Debug, Default)]
pub struct SimHart {
    pub hart_id: usize,
    pub gp: usize,
    pub mstatus: usize,
    pub mie: usize,
    pub mtvec: usize,
    pub mscratch: usize,
    pub mvendorid: usize,
    pub marchid: usize,
    pub mtime: u64,
    pub mtimecmp: u64,
    pub mtimecmp_at_enable: Vec<u64>,
}

impl SimHart {
    pub fn new() -> Self {
        Self {
            mtimecmp: u64::MAX,
            ..Self::default()
        }
    }

    /// Let the free-running counter advance by `ticks`.
    pub fn advance(&mut self, ticks: u64) {
        self.mtime = self.mtime.wrapping_add(ticks);
    }

    /// Whether a machine timer interrupt would be taken right now.
    pub fn timer_interrupt_pending(&self) -> bool {
        self.mstatus & MSTATUS_MIE != 0 && self.mie & MIE_MTIE != 0 && self.mtime >= self.mtimecmp
    }
}

impl Hart for SimHart {
    fn hart_id(&self) -> usize {
        self.hart_id
    }

    fn global_pointer(&self) -> usize {
        self.gp
    }

    fn mstatus(&self) -> usize {
        self.mstatus
    }

    fn set_mstatus(&mut self, value: usize) {
        if self.mstatus & MSTATUS_MIE == 0 && value & MSTATUS_MIE != 0 {
            self.mtimecmp_at_enable.push(self.mtimecmp);
        }
        self.mstatus = value;
    }

    fn mie(&self) -> usize {
        self.mie
    }

    fn set_mie(&mut self, value: usize) {
        self.mie = value;
    }

    fn set_mtvec(&mut self, value: usize) {
        self.mtvec = value;
    }

    fn set_mscratch(&mut self, value: usize) {
        self.mscratch = value;
    }

    fn mvendorid(&self) -> usize {
        self.mvendorid
    }

    fn marchid(&self) -> usize {
        self.marchid
    }

    fn mtime(&self) -> u64 {
        self.mtime
    }

    fn set_mtimecmp(&mut self, deadline: u64) {
        self.mtimecmp = deadline;
    }

    fn trap_entry(&self) -> usize {
        SIM_TRAP_ENTRY
    }

    fn halt(&mut self) -> ! {
        panic!("hart halted");
    }
}

//! # Task Model
//!
//! A task is a resume address plus a full register snapshot. Tasks are
//! stored inline in the scheduler's fixed-size table; nothing here
//! allocates.

use core::mem::{offset_of, size_of};

use crate::config::{STACK_ALIGN, STACK_RESERVE_BYTES, STACK_SIZE_BYTES};
use crate::error::KernelError;

/// Index of the stack pointer (`x2`) in [`RegisterFile::registers`].
pub const SP: usize = 2;

/// Index of the global pointer (`x3`).
pub const GP: usize = 3;

/// Byte offset of [`RegisterFile::trap_stack`]; the trap vector loads `sp`
/// from here.
pub const TRAP_STACK_OFFSET: usize = 520;

/// Task entry point. Tasks never return.
pub type TaskEntry = extern "C" fn() -> !;

// ---------------------------------------------------------------------------
// Task state
// ---------------------------------------------------------------------------

/// State tag of a task.
///
/// Set when the task is created and never read by the round-robin
/// scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Off,
    Running,
}

// ---------------------------------------------------------------------------
// Register file
// ---------------------------------------------------------------------------

/// Snapshot of a hart's architectural state.
///
/// The layout is shared with the trap vector, which reads and writes
/// general-purpose register `i` at byte offset `8 * i`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    /// `x0`–`x31`. Opaque to the scheduler except [`SP`].
    pub registers: [usize; 32],
    /// `f0`–`f31`.
    pub fregisters: [usize; 32],
    /// Address-translation control.
    pub satp: usize,
    /// Top of the stack the trap vector runs the handler on.
    pub trap_stack: usize,
    pub hart_id: usize,
}

const _: () = assert!(size_of::<usize>() == 8);
const _: () = assert!(offset_of!(RegisterFile, registers) == 0);
const _: () = assert!(offset_of!(RegisterFile, trap_stack) == TRAP_STACK_OFFSET);
const _: () = assert!(size_of::<RegisterFile>() == 67 * 8);

impl RegisterFile {
    pub const fn zeroed() -> Self {
        Self {
            registers: [0; 32],
            fregisters: [0; 32],
            satp: 0,
            trap_stack: 0,
            hart_id: 0,
        }
    }

    #[inline]
    pub fn sp(&self) -> usize {
        self.registers[SP]
    }

    #[inline]
    pub fn set_sp(&mut self, sp: usize) {
        self.registers[SP] = sp;
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::zeroed()
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A schedulable unit.
#[derive(Clone, Copy)]
pub struct Task {
    /// Where the task resumes. Starts out as the entry point.
    pub pc: usize,
    pub register_file: RegisterFile,
    /// Entry point, only used for the first activation.
    pub start: TaskEntry,
    pub state: TaskState,
}

impl Task {
    pub fn new(start: TaskEntry) -> Self {
        let mut task = Self {
            pc: 0,
            register_file: RegisterFile::zeroed(),
            start,
            state: TaskState::Off,
        };
        task.init();
        task
    }

    /// Point the resume address at the entry function.
    pub fn init(&mut self) {
        self.pc = self.start as usize;
    }
}

impl core::fmt::Debug for Task {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Task")
            .field("pc", &format_args!("{:#x}", self.pc))
            .field("sp", &format_args!("{:#x}", self.register_file.sp()))
            .field("state", &self.state)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Stack layout
// ---------------------------------------------------------------------------

/// Initial stack pointer of task `index`, carved below `stack_top`.
///
/// Task `i` gets `stack_top - (i + 1) * STACK_SIZE_BYTES - STACK_RESERVE_BYTES`,
/// rounded down to `STACK_ALIGN`.
pub fn initial_stack_pointer(stack_top: usize, index: usize) -> Result<usize, KernelError> {
    let below = index
        .checked_add(1)
        .and_then(|slots| slots.checked_mul(STACK_SIZE_BYTES))
        .and_then(|size| size.checked_add(STACK_RESERVE_BYTES))
        .ok_or(KernelError::StackUnderflow { task: index })?;

    let sp = stack_top
        .checked_sub(below)
        .ok_or(KernelError::StackUnderflow { task: index })?;

    Ok(sp & !(STACK_ALIGN - 1))
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn idle() -> ! {
        loop {}
    }

    #[test]
    fn test_new_task_starts_at_entry() {
        let task = Task::new(idle);
        assert_eq!(task.pc, (idle as TaskEntry) as usize);
        assert_eq!(task.state, TaskState::Off);
        assert_eq!(task.register_file, RegisterFile::zeroed());
    }

    #[test]
    fn test_stack_pointer_slot() {
        let mut regs = RegisterFile::zeroed();
        regs.set_sp(0x8000_1000);
        assert_eq!(regs.registers[2], 0x8000_1000);
        assert_eq!(regs.sp(), 0x8000_1000);
    }

    #[test]
    fn test_stacks_descend_from_top() {
        let top = 0x8800_0000;
        let sp0 = initial_stack_pointer(top, 0).unwrap();
        let sp1 = initial_stack_pointer(top, 1).unwrap();

        // 0x8800_0000 - 1000 - 10_000_000, aligned down
        assert_eq!(sp0, 0x8767_6590);
        assert_eq!(sp0 % STACK_ALIGN, 0);
        assert_eq!(sp1 % STACK_ALIGN, 0);
        assert!(sp1 < sp0);
        assert!(sp0 - sp1 >= STACK_SIZE_BYTES - STACK_ALIGN);
    }

    #[test]
    fn test_stack_underflow_is_reported() {
        let err = initial_stack_pointer(STACK_RESERVE_BYTES, 0).unwrap_err();
        assert_eq!(err, KernelError::StackUnderflow { task: 0 });

        let err = initial_stack_pointer(usize::MAX, usize::MAX).unwrap_err();
        assert_eq!(err, KernelError::StackUnderflow { task: usize::MAX });
    }
}

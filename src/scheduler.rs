//! # Scheduler
//!
//! Strict round-robin over a fixed task table.
//!
//! ## Scheduling Algorithm
//!
//! At each machine timer interrupt:
//! 1. **Bootstrap**: the very first interrupt interrupted boot code, not a
//!    task, so nothing is saved; the current task is simply launched.
//! 2. **Save**: afterwards, the interrupted registers and `mepc` go into the
//!    current task's slot.
//! 3. **Advance**: `current_task = (current_task + 1) % N`.
//! 4. **Restore**: the trap frame is overwritten with the selected task's
//!    registers and its `pc` becomes the resume address.
//!
//! Every task runs exactly once per `N` interrupts. There are no
//! priorities, no blocking and no skipping.

use crate::config::NUM_TASKS;
use crate::error::KernelError;
use crate::task::{initial_stack_pointer, RegisterFile, Task, TaskEntry};

// ---------------------------------------------------------------------------
// Scheduler struct
// ---------------------------------------------------------------------------

/// Task table, cursor and bootstrap flag.
///
/// A single instance lives in `kernel` and is handed to the trap handler by
/// exclusive reference.
#[derive(Debug)]
pub struct Scheduler<const N: usize = NUM_TASKS> {
    /// Position order is scheduling order.
    tasks: [Task; N],

    /// Index of the task owning the hart. Always `< N`.
    current_task: usize,

    /// Set once the first timer interrupt has been serviced.
    initialized: bool,
}

impl<const N: usize> Scheduler<N> {
    /// Build the table from `entries`; task `i` starts at `entries[i]`.
    pub fn new(entries: [TaskEntry; N]) -> Self {
        const { assert!(N > 0, "the task table must not be empty") };

        Self {
            tasks: entries.map(Task::new),
            current_task: 0,
            initialized: false,
        }
    }

    /// Give every task a copy of `base` with its own stack pointer.
    ///
    /// `base` carries what all tasks share (trap stack, hart ID, global
    /// pointer). Must run at boot, before interrupts are enabled.
    pub fn prime(&mut self, stack_top: usize, base: &RegisterFile) -> Result<(), KernelError> {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            let sp = initial_stack_pointer(stack_top, index)?;
            task.register_file = *base;
            task.register_file.set_sp(sp);
            task.init();
        }
        Ok(())
    }

    #[inline]
    pub fn current_task(&self) -> usize {
        self.current_task
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn tasks(&self) -> &[Task; N] {
        &self.tasks
    }

    /// The task that owns the hart.
    pub fn current(&self) -> &Task {
        &self.tasks[self.current_task]
    }

    /// Move the cursor to the next slot.
    fn advance(&mut self) {
        self.current_task = (self.current_task + 1) % N;
    }

    /// Timer-interrupt context switch.
    ///
    /// `epc` and `frame` describe the interrupted context. On return
    /// `frame` holds the registers of the task to resume, and the result is
    /// the address to resume it at.
    pub fn switch(&mut self, epc: usize, frame: &mut RegisterFile) -> usize {
        if self.initialized {
            let outgoing = &mut self.tasks[self.current_task];
            outgoing.register_file = *frame;
            outgoing.pc = epc;
            self.advance();
        } else {
            self.initialized = true;
        }

        let incoming = &self.tasks[self.current_task];
        *frame = incoming.register_file;
        incoming.pc
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

//! # rvtick — round-robin preemptive kernel core for RISC-V
//!
//! A minimal machine-mode kernel for a single-hart RV64 machine (QEMU
//! `virt`). Each CLINT timer interrupt saves the running task's registers,
//! picks the next task by strict round robin, restores its registers and
//! re-arms the timer.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                 Application Tasks (main.rs)             │
//! ├────────────────────────────────────────────────────────┤
//! │        Kernel (kernel.rs): start() · handle_trap()      │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │ Trap Handler │   Scheduler        │  Logging/Console  │
//! │ trap.rs      │   scheduler.rs     │  logging.rs       │
//! │ ─ decode     │   ─ switch()       │  console.rs       │
//! │ ─ fatal      │   ─ prime()        │                   │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │   Task Model (task.rs): RegisterFile · Task · stacks    │
//! ├────────────────────────────────────────────────────────┤
//! │  Timer (timer.rs) · Interrupt Control (interrupt.rs)    │
//! ├────────────────────────────────────────────────────────┤
//! │  Hart trait (arch/) · MMIO handles (mmio.rs)            │
//! │  riscv64: CSRs, CLINT, m_trap_vector · sim: host tests  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Memory Model
//!
//! - **No heap**: all state is statically allocated
//! - **Fixed-size task table**: `[Task; NUM_TASKS]`
//! - **Task stacks** are carved below the boot stack top at boot
//! - **Shared state**: one `Scheduler`, reached through a
//!   `critical_section::Mutex` and only mutated with interrupts off

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod config;
pub mod console;
pub mod error;
pub mod interrupt;
pub mod kernel;
pub mod logging;
pub mod mmio;
pub mod scheduler;
pub mod sync;
pub mod task;
pub mod timer;
pub mod trap;

//! # rvtick Configuration
//!
//! Compile-time constants for the QEMU `virt` board and the scheduler.
//! All limits are fixed at compile time; nothing is allocated.

use log::LevelFilter;

/// Number of tasks in the task table. The table is created once at boot
/// and never resized.
pub const NUM_TASKS: usize = 2;

/// Physical address of the UART transmit holding register.
pub const UART_BASE: usize = 0x1000_0000;

/// Base address of the CLINT (core-local interruptor).
pub const CLINT_BASE: usize = 0x0200_0000;

/// Offset of the free-running `mtime` counter from `CLINT_BASE`.
pub const CLINT_MTIME_OFFSET: usize = 0xbff8;

/// Offset of hart 0's `mtimecmp` compare register from `CLINT_BASE`.
pub const CLINT_MTIMECMP_OFFSET: usize = 0x4000;

/// Ticks until the first (bootstrap) timer interrupt.
pub const INITIAL_QUANTUM: u64 = 1_000_000;

/// Ticks a task runs before it is preempted, once scheduling has started.
/// Deliberately different from `INITIAL_QUANTUM`.
pub const STEADY_QUANTUM: u64 = 100_000;

/// Per-task stack size in bytes.
pub const STACK_SIZE_BYTES: usize = 1000;

/// Distance kept between the boot stack top and the first task stack.
pub const STACK_RESERVE_BYTES: usize = 10_000_000;

/// Stack pointers are rounded down to this alignment (RISC-V psABI).
pub const STACK_ALIGN: usize = 16;

/// Size of the dedicated stack the trap vector switches to.
pub const TRAP_STACK_BYTES: usize = 4096;

/// `mcause` is masked to its low 9 bits before decoding.
pub const CAUSE_CODE_MASK: usize = 0x1ff;

/// Machine timer interrupt cause code.
pub const MACHINE_TIMER_CAUSE: usize = 7;

/// `mstatus.MIE`: machine-mode global interrupt enable.
pub const MSTATUS_MIE: usize = 1 << 3;

/// `mie.MTIE`: machine timer interrupt enable.
pub const MIE_MTIE: usize = 1 << 7;

/// Maximum level the console logger emits.
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

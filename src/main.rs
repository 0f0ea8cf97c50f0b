//! # rvtick Demo Firmware
//!
//! Two tasks that never yield; the timer interrupt alternates between them.
//! Build with `cargo run --release --target riscv64gc-unknown-none-elf` to
//! boot under QEMU.

#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(target_arch = "riscv64")]
use panic_halt as _;
#[cfg(target_arch = "riscv64")]
use riscv_rt::entry;

#[cfg(target_arch = "riscv64")]
use rvtick::{console, kernel, task::TaskEntry};

/// Busy-work between two reports, so each task prints a few lines per
/// quantum.
#[cfg(target_arch = "riscv64")]
const SPIN: u32 = 20_000;

#[cfg(target_arch = "riscv64")]
fn report(name: &str, round: u64) {
    console::puts(name);
    console::put_dec(round);
    console::puts("\n");
    for _ in 0..SPIN {
        core::hint::spin_loop();
    }
}

// Task stacks are small, so tasks print through the raw console rather
// than through `core::fmt`.
#[cfg(target_arch = "riscv64")]
extern "C" fn run_a() -> ! {
    let mut round: u64 = 0;
    loop {
        report("A ", round);
        round = round.wrapping_add(1);
    }
}

#[cfg(target_arch = "riscv64")]
extern "C" fn run_b() -> ! {
    let mut round: u64 = 0;
    loop {
        report("B ", round);
        round = round.wrapping_add(1);
    }
}

#[cfg(target_arch = "riscv64")]
#[entry]
fn main() -> ! {
    kernel::start([run_a as TaskEntry, run_b])
}

/// The firmware only exists for `riscv64`; host builds are for unit tests.
#[cfg(not(target_arch = "riscv64"))]
fn main() {}

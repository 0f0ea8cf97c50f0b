//! # Kernel
//!
//! Global instances, the startup sequence and the `extern "C"` trap entry
//! point called by `m_trap_vector`.
//!
//! ## Startup Sequence
//!
//! ```text
//! _start (riscv-rt)
//!   └─► main()
//!         └─► kernel::start()           ← does not return
//!               ├─► logging::init()
//!               └─► boot()
//!                     ├─► Scheduler::new() + prime()   ← task stacks
//!                     ├─► boot diagnostics
//!                     ├─► mscratch = &TRAP_FRAME
//!                     ├─► install scheduler
//!                     ├─► arm_timer(INITIAL_QUANTUM)
//!                     └─► enable_interrupts()
//!               idle loop (first timer IRQ launches task 0)
//! ```

#[cfg(target_arch = "riscv64")]
use core::cell::RefCell;
use core::ptr::addr_of;
#[cfg(target_arch = "riscv64")]
use core::ptr::addr_of_mut;

use crate::arch::Hart;
use crate::config::INITIAL_QUANTUM;
use crate::error::KernelError;
use crate::interrupt::enable_interrupts;
use crate::scheduler::Scheduler;
use crate::task::{RegisterFile, TaskEntry, GP};
use crate::timer::{arm_timer, current_time};

#[cfg(target_arch = "riscv64")]
use crate::arch::riscv64::MachineHart;
#[cfg(target_arch = "riscv64")]
use crate::config::{NUM_TASKS, TRAP_STACK_BYTES};
#[cfg(target_arch = "riscv64")]
use crate::logging;
#[cfg(target_arch = "riscv64")]
use crate::sync::{self, Mutex};
#[cfg(target_arch = "riscv64")]
use crate::trap::{self, TrapContext};

// ---------------------------------------------------------------------------
// Global state
// ---------------------------------------------------------------------------

/// The scheduler, installed once by `start()` and then only touched by the
/// trap handler.
#[cfg(target_arch = "riscv64")]
static SCHEDULER: Mutex<RefCell<Option<Scheduler>>> = Mutex::new(RefCell::new(None));

/// Register save area of the trap vector; `mscratch` points here.
#[cfg(target_arch = "riscv64")]
static mut TRAP_FRAME: RegisterFile = RegisterFile::zeroed();

#[cfg(target_arch = "riscv64")]
#[repr(C, align(16))]
struct TrapStack([u8; TRAP_STACK_BYTES]);

/// Stack the trap handler runs on.
#[cfg(target_arch = "riscv64")]
static mut TRAP_STACK: TrapStack = TrapStack([0; TRAP_STACK_BYTES]);

#[cfg(target_arch = "riscv64")]
extern "C" {
    /// Top of the boot stack, provided by riscv-rt's `link.x`.
    static _stack_start: u8;
}

// ---------------------------------------------------------------------------
// Kernel API
// ---------------------------------------------------------------------------

/// Boot the kernel with one task per entry. **Does not return.**
///
/// After this call the hart idles until the first timer interrupt, which
/// launches `entries[0]`; from then on tasks are preempted every
/// `STEADY_QUANTUM` ticks.
#[cfg(target_arch = "riscv64")]
pub fn start(entries: [TaskEntry; NUM_TASKS]) -> ! {
    // SAFETY: machine mode on QEMU virt; this is the only handle outside
    // trap context, and traps are not enabled until `boot` is done.
    let mut hart = unsafe { MachineHart::new() };

    let stack_top = unsafe { addr_of!(_stack_start) as usize };
    let trap_stack_top = unsafe { addr_of_mut!(TRAP_STACK) } as usize + TRAP_STACK_BYTES;
    // SAFETY: interrupts are still off, nothing else references the frame.
    let frame = unsafe { &mut *addr_of_mut!(TRAP_FRAME) };

    let booted = logging::init().and_then(|()| {
        boot(&mut hart, entries, stack_top, trap_stack_top, frame, |scheduler| {
            sync::critical_section(|cs| {
                SCHEDULER.borrow_ref_mut(cs).replace(scheduler);
            })
        })
    });

    if let Err(err) = booted {
        log::error!("boot failed: {}", err);
        hart.halt();
    }

    loop {
        core::hint::spin_loop();
    }
}

/// Build and prime the task table, seed `frame`, hand the scheduler to
/// `install`, then arm the first quantum and enable interrupts.
///
/// `install` runs before the timer is armed, so the first interrupt always
/// finds a scheduler. On error nothing has been armed or enabled.
pub fn boot<H, F, const N: usize>(
    hart: &mut H,
    entries: [TaskEntry; N],
    stack_top: usize,
    trap_stack_top: usize,
    frame: &mut RegisterFile,
    install: F,
) -> Result<(), KernelError>
where
    H: Hart + ?Sized,
    F: FnOnce(Scheduler<N>),
{
    let mut base = RegisterFile::zeroed();
    base.registers[GP] = hart.global_pointer();
    base.trap_stack = trap_stack_top;
    base.hart_id = hart.hart_id();

    let mut scheduler = Scheduler::new(entries);
    scheduler.prime(stack_top, &base)?;

    for (index, task) in scheduler.tasks().iter().enumerate() {
        log::info!("task {} stack: {}", index, task.register_file.sp());
    }
    log::info!("mvendorid: {}", hart.mvendorid());
    log::info!("marchid: {}", hart.marchid());
    log::info!("mstatus: {}", hart.mstatus());
    log::info!("time: {}", current_time(hart));
    let marker = 0u8;
    log::info!("stack address: {}", addr_of!(marker) as usize);

    *frame = base;
    hart.set_mscratch(frame as *mut RegisterFile as usize);

    install(scheduler);

    arm_timer(hart, INITIAL_QUANTUM);
    enable_interrupts(hart);
    Ok(())
}

// ---------------------------------------------------------------------------
// Trap entry
// ---------------------------------------------------------------------------

/// Called by `m_trap_vector` with the trap CSRs and the saved registers.
/// Returns the address the vector `mret`s to.
#[cfg(target_arch = "riscv64")]
#[no_mangle]
pub extern "C" fn handle_trap(
    epc: usize,
    tval: usize,
    cause: usize,
    hart_id: usize,
    status: usize,
    registers: *mut RegisterFile,
) -> usize {
    let ctx = TrapContext {
        epc,
        tval,
        cause,
        hart: hart_id,
        status,
    };

    // SAFETY: trap context, interrupts are masked by hardware.
    let mut hart = unsafe { MachineHart::new() };
    // SAFETY: `registers` is TRAP_FRAME, owned by the vector for the
    // duration of this call.
    let frame = unsafe { &mut *registers };

    sync::critical_section(|cs| match SCHEDULER.borrow_ref_mut(cs).as_mut() {
        Some(scheduler) => trap::handle_trap(scheduler, &mut hart, &ctx, frame),
        None => trap::fatal(&mut hart, &ctx),
    })
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

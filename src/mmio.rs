//! # Memory-Mapped Registers
//!
//! Typed handles on fixed physical addresses. Every `read`/`write` is one
//! volatile access: the compiler may not cache, merge, elide or reorder it
//! relative to other volatile accesses.

use core::marker::PhantomData;

/// A device register of type `T` at a fixed address.
pub struct Mmio<T> {
    addr: usize,
    _reg: PhantomData<*mut T>,
}

impl<T: Copy> Mmio<T> {
    /// Create a handle on the register at `addr`.
    ///
    /// # Safety
    /// `addr` must be a valid, suitably aligned device register (or memory)
    /// location of type `T` for as long as the handle is used.
    pub const unsafe fn new(addr: usize) -> Self {
        Self { addr, _reg: PhantomData }
    }

    #[inline]
    pub fn read(&self) -> T {
        // SAFETY: guaranteed by the contract of `new`.
        unsafe { core::ptr::read_volatile(self.addr as *const T) }
    }

    #[inline]
    pub fn write(&self, value: T) {
        // SAFETY: guaranteed by the contract of `new`.
        unsafe { core::ptr::write_volatile(self.addr as *mut T, value) }
    }
}

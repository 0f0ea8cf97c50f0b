//! # Console
//!
//! Fire-and-forget output on the UART transmit register: one byte per
//! write, no status polling, no flow control.

use core::fmt;

use crate::config::UART_BASE;
use crate::mmio::Mmio;

// SAFETY: UART_BASE is the QEMU `virt` 16550 transmit holding register.
const UART_THR: Mmio<u8> = unsafe { Mmio::new(UART_BASE) };

#[inline]
pub fn putc(byte: u8) {
    UART_THR.write(byte);
}

pub fn puts(s: &str) {
    for byte in s.bytes() {
        putc(byte);
    }
}

/// Print `value` in decimal.
pub fn put_dec(value: u64) {
    let mut buf = [0u8; 20];
    for &digit in format_dec(value, &mut buf) {
        putc(digit);
    }
}

/// Render `value` as ASCII decimal digits at the end of `buf`.
pub fn format_dec(mut value: u64, buf: &mut [u8; 20]) -> &[u8] {
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[i..]
}

/// `core::fmt` adapter over the UART.
pub struct Console;

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        puts(s);
        Ok(())
    }
}

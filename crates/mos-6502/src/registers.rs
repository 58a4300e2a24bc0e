//! Programmer-visible registers.

use crate::flags::{I, U};
use crate::Status;

/// Stack page base. S is an offset into page 1.
pub const STACK_BASE: u16 = 0x0100;

/// The register file: A, X, Y, S, PC and P.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Stack pointer. Points at the next free slot in page 1.
    pub s: u8,
    pub pc: u16,
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Registers as they stand after a completed reset sequence from a
    /// cold start: S = $FD, I set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status(U | I),
        }
    }

    /// Registers at power-on, before the reset sequence has run. The reset
    /// sequence's three suppressed pushes bring S to $FD.
    #[must_use]
    pub const fn power_on() -> Self {
        Self {
            s: 0x00,
            ..Self::new()
        }
    }

    /// Address for a push, then decrement S. Wraps within page 1.
    pub fn push(&mut self) -> u16 {
        let addr = STACK_BASE | u16::from(self.s);
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Increment S, then the address for a pull. Wraps within page 1.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        STACK_BASE | u16::from(self.s)
    }

    /// Current stack address without moving S.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        STACK_BASE | (self.s as u16)
    }
}

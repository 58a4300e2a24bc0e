//! Processor status register (P).

/// Carry.
pub const C: u8 = 0x01;

/// Zero.
pub const Z: u8 = 0x02;

/// Interrupt disable. While set, IRQ is masked; NMI is not.
pub const I: u8 = 0x04;

/// Decimal. Stored and pushed, but the 2A03 has no BCD adder so it has no
/// effect on ADC/SBC.
pub const D: u8 = 0x08;

/// Break. Exists only in the pushed copy of P: set by BRK/PHP, clear for
/// IRQ/NMI.
pub const B: u8 = 0x10;

/// Unused. Always reads as 1.
pub const U: u8 = 0x20;

/// Overflow.
pub const V: u8 = 0x40;

/// Negative.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Status after a pull (PLP/RTI): B is not a real flag, U always reads 1.
    #[must_use]
    pub const fn from_pulled(value: u8) -> Self {
        Self((value | U) & !B)
    }

    /// The byte written to the stack. `brk` selects the software form.
    #[must_use]
    pub const fn pushed(self, brk: bool) -> u8 {
        if brk {
            self.0 | U | B
        } else {
            (self.0 | U) & !B
        }
    }

    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Z from `value == 0`, N from bit 7.
    pub fn update_nz(&mut self, value: u8) {
        self.set_if(N, value & 0x80 != 0);
        self.set_if(Z, value == 0);
    }
}

//! Flat 64 KiB memory with shadowed sub-ranges.
//!
//! A shadow redirects every read and write inside its address range to a
//! handler object. Devices with memory-mapped registers (the PPU port,
//! mirrored RAM, ROM that ignores writes) are attached this way. Shadows
//! are checked in registration order before the backing array, so the
//! first registered range that contains an address wins.

use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::rc::Rc;

use thiserror::Error;

use crate::Bus;

const SIZE: usize = 0x1_0000;

/// Handler for a shadowed address range.
pub trait Shadow {
    /// Read a byte. `address` is the full bus address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte. `address` is the full bus address.
    fn write(&mut self, address: u16, value: u8);
}

impl<T: Shadow> Shadow for Rc<RefCell<T>> {
    fn read(&mut self, address: u16) -> u8 {
        self.borrow_mut().read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.borrow_mut().write(address, value);
    }
}

/// Errors raised while configuring memory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("image of {len} bytes at ${address:04X} runs past the end of memory")]
    LoadOverrun { address: u16, len: usize },
    #[error("shadow range ${start:04X}-${end:04X} is empty")]
    EmptyRange { start: u16, end: u16 },
}

struct ShadowRange {
    range: RangeInclusive<u16>,
    handler: Box<dyn Shadow>,
}

/// The CPU-visible address space.
pub struct Memory {
    bytes: Vec<u8>,
    shadows: Vec<ShadowRange>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// 64 KiB of zeroed memory with no shadows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![0; SIZE],
            shadows: Vec::new(),
        }
    }

    /// Redirect `range` to `handler`.
    ///
    /// Ranges may overlap; earlier registrations take priority.
    pub fn shadow(
        &mut self,
        range: RangeInclusive<u16>,
        handler: Box<dyn Shadow>,
    ) -> Result<(), MemoryError> {
        if range.is_empty() {
            return Err(MemoryError::EmptyRange {
                start: *range.start(),
                end: *range.end(),
            });
        }
        log::debug!(
            "shadowing ${:04X}-${:04X} (priority {})",
            range.start(),
            range.end(),
            self.shadows.len()
        );
        self.shadows.push(ShadowRange { range, handler });
        Ok(())
    }

    /// Copy `data` into the backing array at `address`, bypassing shadows.
    pub fn load(&mut self, address: u16, data: &[u8]) -> Result<(), MemoryError> {
        let start = usize::from(address);
        let end = start + data.len();
        if end > SIZE {
            return Err(MemoryError::LoadOverrun {
                address,
                len: data.len(),
            });
        }
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Read the backing array without side effects.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.bytes[usize::from(address)]
    }

    /// Write the backing array, bypassing shadows.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.bytes[usize::from(address)] = value;
    }

    fn handler_for(&mut self, address: u16) -> Option<&mut Box<dyn Shadow>> {
        self.shadows
            .iter_mut()
            .find(|s| s.range.contains(&address))
            .map(|s| &mut s.handler)
    }
}

impl Bus for Memory {
    fn read(&mut self, address: u16) -> u8 {
        match self.handler_for(address) {
            Some(handler) => handler.read(address),
            None => self.bytes[usize::from(address)],
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match self.handler_for(address) {
            Some(handler) => handler.write(address, value),
            None => self.bytes[usize::from(address)] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the last write and answers reads with the low address byte.
    struct Probe {
        last_write: Rc<RefCell<Option<(u16, u8)>>>,
    }

    impl Shadow for Probe {
        fn read(&mut self, address: u16) -> u8 {
            address as u8
        }

        fn write(&mut self, address: u16, value: u8) {
            *self.last_write.borrow_mut() = Some((address, value));
        }
    }

    struct Constant(u8);

    impl Shadow for Constant {
        fn read(&mut self, _address: u16) -> u8 {
            self.0
        }

        fn write(&mut self, _address: u16, _value: u8) {}
    }

    #[test]
    fn unshadowed_access_hits_array() {
        let mut mem = Memory::new();
        mem.write(0x1234, 0xAB);
        assert_eq!(mem.read(0x1234), 0xAB);
        assert_eq!(mem.peek(0x1234), 0xAB);
    }

    #[test]
    fn shadow_intercepts_reads_and_writes() {
        let log = Rc::new(RefCell::new(None));
        let mut mem = Memory::new();
        mem.shadow(
            0x2000..=0x3FFF,
            Box::new(Probe {
                last_write: Rc::clone(&log),
            }),
        )
        .unwrap();

        mem.poke(0x2002, 0x99);
        assert_eq!(mem.read(0x2002), 0x02);
        mem.write(0x3FFF, 0x55);
        assert_eq!(*log.borrow(), Some((0x3FFF, 0x55)));
        // The backing byte is untouched.
        assert_eq!(mem.peek(0x3FFF), 0x00);
        // Just outside the range is plain memory.
        mem.write(0x4000, 0x11);
        assert_eq!(mem.read(0x4000), 0x11);
    }

    #[test]
    fn earlier_shadow_has_priority() {
        let mut mem = Memory::new();
        mem.shadow(0x8000..=0x80FF, Box::new(Constant(1))).unwrap();
        mem.shadow(0x8000..=0xFFFF, Box::new(Constant(2))).unwrap();
        assert_eq!(mem.read(0x8010), 1);
        assert_eq!(mem.read(0x8100), 2);
    }

    #[test]
    fn shared_handler_through_rc() {
        let shared = Rc::new(RefCell::new(Constant(7)));
        let mut mem = Memory::new();
        mem.shadow(0x6000..=0x6000, Box::new(Rc::clone(&shared))).unwrap();
        assert_eq!(mem.read(0x6000), 7);
        shared.borrow_mut().0 = 8;
        assert_eq!(mem.read(0x6000), 8);
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn empty_range_is_rejected() {
        let mut mem = Memory::new();
        let err = mem.shadow(0x3000..=0x2000, Box::new(Constant(0)));
        assert_eq!(
            err,
            Err(MemoryError::EmptyRange {
                start: 0x3000,
                end: 0x2000
            })
        );
    }

    #[test]
    fn load_rejects_overrun() {
        let mut mem = Memory::new();
        assert!(mem.load(0xFFFE, &[1, 2]).is_ok());
        assert_eq!(
            mem.load(0xFFFF, &[1, 2]),
            Err(MemoryError::LoadOverrun {
                address: 0xFFFF,
                len: 2
            })
        );
    }
}

//! The NES CPU memory map, built from `emu_core::Memory` shadows.
//!
//! | range         | handler                               |
//! |---------------|---------------------------------------|
//! | `$0000-$1FFF` | 2 KiB work RAM, mirrored four times    |
//! | `$2000-$3FFF` | PPU registers, mirrored every 8 bytes |
//! | `$4000-$401F` | APU and I/O (not emulated)             |
//! | `$4020-$7FFF` | backing array (NROM PRG-RAM area)      |
//! | `$8000-$FFFF` | PRG-ROM                                |

use std::cell::RefCell;
use std::rc::Rc;

use emu_core::{Memory, MemoryError, Shadow};
use ricoh_ppu_2c02::Ppu;

pub(crate) const RAM_SIZE: usize = 0x0800;

/// Internal 2 KiB RAM.
pub(crate) struct WorkRam([u8; RAM_SIZE]);

impl WorkRam {
    pub fn new() -> Self {
        Self([0; RAM_SIZE])
    }

    pub fn peek(&self, address: u16) -> u8 {
        self.0[usize::from(address) & (RAM_SIZE - 1)]
    }
}

impl Shadow for WorkRam {
    fn read(&mut self, address: u16) -> u8 {
        self.peek(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.0[usize::from(address) & (RAM_SIZE - 1)] = value;
    }
}

/// APU, OAM DMA and controller ports. Reads float to the high address
/// byte. Each register is reported at `warn` the first time it is used.
struct IoStub {
    reported: [bool; 0x20],
}

impl IoStub {
    fn new() -> Self {
        Self {
            reported: [false; 0x20],
        }
    }

    /// True the first time `address` is touched.
    fn first_use(&mut self, address: u16) -> bool {
        let seen = &mut self.reported[usize::from(address) & 0x1F];
        !std::mem::replace(seen, true)
    }
}

impl Shadow for IoStub {
    fn read(&mut self, address: u16) -> u8 {
        if self.first_use(address) {
            log::warn!("read from unemulated I/O ${address:04X}, returning open bus");
        }
        (address >> 8) as u8
    }

    fn write(&mut self, address: u16, value: u8) {
        if self.first_use(address) {
            log::warn!("write ${value:02X} to unemulated I/O ${address:04X} ignored");
        }
    }
}

/// Cartridge PRG-ROM. A 16 KiB image repeats at `$C000`.
pub(crate) struct PrgRom(Vec<u8>);

impl PrgRom {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn peek(&self, address: u16) -> u8 {
        self.0[usize::from(address - 0x8000) % self.0.len()]
    }
}

impl Shadow for PrgRom {
    fn read(&mut self, address: u16) -> u8 {
        self.peek(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        log::warn!("write ${value:02X} to PRG-ROM ${address:04X} ignored");
    }
}

/// Shared handles to the devices behind the shadows, for side-effect-free peeks.
pub(crate) struct Devices {
    pub ram: Rc<RefCell<WorkRam>>,
    pub prg: Rc<RefCell<PrgRom>>,
}

/// Attach RAM, the PPU port, the I/O stub and PRG-ROM to `memory`.
pub(crate) fn map(
    memory: &mut Memory,
    ppu: &Rc<RefCell<Ppu>>,
    prg_rom: Vec<u8>,
) -> Result<Devices, MemoryError> {
    let ram = Rc::new(RefCell::new(WorkRam::new()));
    let prg = Rc::new(RefCell::new(PrgRom::new(prg_rom)));

    memory.shadow(0x0000..=0x1FFF, Box::new(Rc::clone(&ram)))?;
    memory.shadow(0x2000..=0x3FFF, Box::new(Rc::clone(ppu)))?;
    memory.shadow(0x4000..=0x401F, Box::new(IoStub::new()))?;
    memory.shadow(0x8000..=0xFFFF, Box::new(Rc::clone(&prg)))?;

    Ok(Devices { ram, prg })
}

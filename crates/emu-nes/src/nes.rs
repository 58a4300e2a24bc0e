//! Top-level NES system.
//!
//! The driver ticks the CPU once, then the PPU three times, copying the
//! PPU's NMI output onto the CPU's NMI line after every dot. The CPU
//! samples that line at the end of each of its cycles, so a vblank that
//! starts mid-cycle is seen on the following one.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use emu_core::{Cpu, Memory, MemoryError, Observable, Tickable, Value};
use mos_6502::{Mos6502, decode, disassemble};
use ricoh_ppu_2c02::{FB_HEIGHT, FB_WIDTH, NTSC_PALETTE, Ppu, PpuError, VIDEO_MEMORY_SIZE};
use thiserror::Error;

use crate::bus::{self, PrgRom, WorkRam};
use crate::cartridge::{CHR_BANK, Cartridge, CartridgeError};
use crate::config::{NesConfig, NesRegion};

/// Failure to assemble a console from a configuration.
#[derive(Debug, Error)]
pub enum NesError {
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),
    #[error(transparent)]
    Ppu(#[from] PpuError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// NES system.
pub struct Nes {
    cpu: Mos6502,
    memory: Memory,
    ppu: Rc<RefCell<Ppu>>,
    ram: Rc<RefCell<WorkRam>>,
    prg: Rc<RefCell<PrgRom>>,
    region: NesRegion,
    /// Crystal ticks elapsed.
    master_clock: u64,
    /// Frames completed by `run_frame`.
    frame_count: u64,
}

impl Nes {
    /// Build a powered-on console from an iNES image.
    ///
    /// The CPU starts in its reset sequence; the first seven ticks load PC
    /// from the reset vector.
    pub fn new(config: &NesConfig) -> Result<Self, NesError> {
        let cartridge = Cartridge::from_ines(&config.rom_data)?;
        Self::from_cartridge(cartridge, config.region)
    }

    /// Build a powered-on console from an already parsed cartridge.
    pub fn from_cartridge(cartridge: Cartridge, region: NesRegion) -> Result<Self, NesError> {
        cartridge.validate()?;

        let mut vram = vec![0; VIDEO_MEMORY_SIZE];
        vram[..CHR_BANK].copy_from_slice(&cartridge.chr);
        let mut ppu = Ppu::new(vram, &NTSC_PALETTE)?;
        ppu.set_mirroring(cartridge.mirroring);
        ppu.set_pattern_writable(cartridge.chr_is_ram);
        let ppu = Rc::new(RefCell::new(ppu));

        let mut memory = Memory::new();
        let devices = bus::map(&mut memory, &ppu, cartridge.prg_rom)?;

        Ok(Self {
            cpu: Mos6502::power_on(),
            memory,
            ppu,
            ram: devices.ram,
            prg: devices.prg,
            region,
            master_clock: 0,
            frame_count: 0,
        })
    }

    /// Run until the PPU finishes the current frame.
    ///
    /// Returns the number of crystal ticks executed.
    pub fn run_frame(&mut self) -> u64 {
        let start_clock = self.master_clock;
        let frame = self.ppu.borrow().frame();
        while self.ppu.borrow().frame() == frame {
            self.tick();
        }
        self.frame_count += 1;
        log::trace!("frame {} done at CPU cycle {}", self.frame_count, self.cpu.cycles());
        self.master_clock - start_clock
    }

    /// Run CPU cycles until the next instruction boundary.
    pub fn step_instruction(&mut self) {
        self.tick();
        while !self.cpu.is_instruction_complete() && !self.cpu.is_halted() {
            self.tick();
        }
    }

    /// Read the CPU address space without side effects.
    ///
    /// PPU and I/O registers are not read through; their addresses report
    /// the backing array.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.ram.borrow().peek(address),
            0x8000..=0xFFFF => self.prg.borrow().peek(address),
            _ => self.memory.peek(address),
        }
    }

    /// One `nestest`-format line for the instruction about to execute:
    ///
    /// `C000  4C F5 C5  JMP $C5F5    ...    A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7`
    #[must_use]
    pub fn trace_line(&self) -> String {
        let regs = &self.cpu.regs;
        let pc = regs.pc;
        let length = decode(self.peek(pc)).bytes;
        let bytes: Vec<u8> = (0..u16::from(length))
            .map(|i| self.peek(pc.wrapping_add(i)))
            .collect();
        let hex = bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        let text = disassemble(&bytes, pc);
        // Undocumented opcodes put their `*` in the column before the mnemonic.
        let text = if text.starts_with('*') {
            text
        } else {
            format!(" {text}")
        };
        let ppu = self.ppu.borrow();
        format!(
            "{pc:04X}  {hex:<8} {text:<33}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
            regs.a,
            regs.x,
            regs.y,
            regs.p.0,
            regs.s,
            ppu.scanline(),
            ppu.dot(),
            self.cpu.cycles()
        )
    }

    /// The last rendered picture (ARGB32, 256x240).
    #[must_use]
    pub fn framebuffer(&self) -> Ref<'_, [u32]> {
        Ref::map(self.ppu.borrow(), Ppu::framebuffer)
    }

    #[must_use]
    pub fn framebuffer_width(&self) -> u32 {
        FB_WIDTH
    }

    #[must_use]
    pub fn framebuffer_height(&self) -> u32 {
        FB_HEIGHT
    }

    #[must_use]
    pub fn region(&self) -> NesRegion {
        self.region
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn ppu(&self) -> Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    /// The CPU address space, with all device shadows attached.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Crystal ticks elapsed.
    #[must_use]
    pub fn master_clock(&self) -> u64 {
        self.master_clock
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Schedule a CPU reset. The PPU keeps running.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }
}

impl Tickable for Nes {
    /// One CPU cycle and the three PPU dots that share it.
    fn tick(&mut self) {
        self.cpu.tick(&mut self.memory);

        for _ in 0..self.region.dots_per_cpu_cycle() {
            let mut ppu = self.ppu.borrow_mut();
            ppu.tick();
            self.cpu.set_nmi_line(ppu.nmi_asserted());
        }

        self.master_clock += self.region.cpu_divider();
    }
}

impl Observable for Nes {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("ppu.") {
            self.ppu.borrow().query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let address = if let Some(hex) = rest
                .strip_prefix("0x")
                .or_else(|| rest.strip_prefix("0X"))
                .or_else(|| rest.strip_prefix('$'))
            {
                u16::from_str_radix(hex, 16).ok()
            } else {
                rest.parse().ok()
            };
            address.map(|a| Value::U8(self.peek(a)))
        } else {
            match path {
                "master_clock" => Some(self.master_clock.into()),
                "frame_count" => Some(self.frame_count.into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "ppu.<2c02_paths>",
            "memory.<address>",
            "master_clock",
            "frame_count",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::Bus;
    use ricoh_ppu_2c02::Mirroring;

    /// 32K PRG: `program` at $8000, every vector pointing at `vector`.
    fn cartridge(program: &[u8], vector: u16) -> Cartridge {
        let mut prg = vec![0xEA; 0x8000];
        prg[..program.len()].copy_from_slice(program);
        for offset in [0x7FFA, 0x7FFC, 0x7FFE] {
            prg[offset..offset + 2].copy_from_slice(&vector.to_le_bytes());
        }
        Cartridge {
            prg_rom: prg,
            chr: vec![0; CHR_BANK],
            chr_is_ram: true,
            mirroring: Mirroring::Vertical,
        }
    }

    fn make_nes(program: &[u8]) -> Nes {
        Nes::from_cartridge(cartridge(program, 0x8000), NesRegion::Ntsc).expect("valid console")
    }

    #[test]
    fn reset_takes_seven_cycles_and_loads_vector() {
        let mut nes = make_nes(&[]);
        for _ in 0..7 {
            nes.tick();
        }
        assert!(nes.cpu().is_instruction_complete());
        assert_eq!(nes.cpu().regs.pc, 0x8000);
        assert_eq!(nes.cpu().regs.s, 0xFD);
        assert_eq!(nes.master_clock(), 7 * 12);
    }

    #[test]
    fn three_dots_per_cpu_cycle() {
        let mut nes = make_nes(&[]);
        for _ in 0..7 {
            nes.tick();
        }
        assert_eq!(nes.ppu().dot(), 21);
        assert_eq!(nes.ppu().scanline(), 0);
    }

    #[test]
    fn run_frame_returns_tick_count() {
        let mut nes = make_nes(&[]);
        let ticks = nes.run_frame();
        // 341 x 262 dots = 29,780.67 CPU cycles; the frame ends inside the last one.
        assert_eq!(ticks, 29_781 * 12);
        assert_eq!(nes.frame_count(), 1);
    }

    #[test]
    fn chr_and_mirroring_reach_the_ppu() {
        let mut cart = cartridge(&[], 0x8000);
        cart.chr[0x0123] = 0x77;
        let nes = Nes::from_cartridge(cart, NesRegion::Ntsc).expect("valid console");
        assert_eq!(nes.ppu().peek_vram(0x0123), 0x77);
        assert_eq!(nes.ppu().mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn chr_rom_is_read_only_through_ppudata() {
        let mut cart = cartridge(&[], 0x8000);
        cart.chr_is_ram = false;
        cart.chr[0x10] = 0xAA;
        let mut nes = Nes::from_cartridge(cart, NesRegion::Ntsc).expect("valid console");
        assert!(!nes.ppu().pattern_writable());

        for (address, value) in [(0x2006, 0x00), (0x2006, 0x10), (0x2007, 0x55)] {
            nes.memory_mut().write(address, value);
        }
        assert_eq!(nes.ppu().peek_vram(0x0010), 0xAA);
    }

    #[test]
    fn chr_ram_accepts_ppudata_writes() {
        let mut nes = make_nes(&[]);
        assert!(nes.ppu().pattern_writable());
        for (address, value) in [(0x2006, 0x00), (0x2006, 0x10), (0x2007, 0x55)] {
            nes.memory_mut().write(address, value);
        }
        assert_eq!(nes.ppu().peek_vram(0x0010), 0x55);
    }

    #[test]
    fn malformed_cartridges_are_errors() {
        let mut cart = cartridge(&[], 0x8000);
        cart.chr = vec![0; 16];
        assert!(matches!(
            Nes::from_cartridge(cart, NesRegion::Ntsc),
            Err(NesError::Cartridge(CartridgeError::ChrLength(16)))
        ));

        let mut cart = cartridge(&[], 0x8000);
        cart.prg_rom.clear();
        assert!(matches!(
            Nes::from_cartridge(cart, NesRegion::Ntsc),
            Err(NesError::Cartridge(CartridgeError::PrgLength(0)))
        ));
    }

    #[test]
    fn program_writes_ram_through_the_mirror() {
        // LDA #$42; STA $0805; JMP $8005
        let mut nes = make_nes(&[0xA9, 0x42, 0x8D, 0x05, 0x08, 0x4C, 0x05, 0x80]);
        for _ in 0..20 {
            nes.tick();
        }
        assert_eq!(nes.peek(0x0005), 0x42);
        assert_eq!(nes.query("memory.$1805"), Some(Value::U8(0x42)));
        assert_eq!(nes.query("memory.0x0005"), Some(Value::U8(0x42)));
        assert_eq!(nes.query("memory.5"), Some(Value::U8(0x42)));
    }

    #[test]
    fn vblank_nmi_reaches_the_cpu() {
        // $8000: LDA #$80; STA $2000; JMP $8005
        // $8010: INC $10; RTI
        let mut program = vec![0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80];
        program.resize(0x10, 0xEA);
        program.extend_from_slice(&[0xE6, 0x10, 0x40]);
        let mut cart = cartridge(&program, 0x8000);
        cart.prg_rom[0x7FFA..0x7FFC].copy_from_slice(&0x8010u16.to_le_bytes());
        let mut nes = Nes::from_cartridge(cart, NesRegion::Ntsc).expect("valid console");

        for _ in 0..3 {
            nes.run_frame();
        }
        assert_eq!(nes.peek(0x0010), 3, "one NMI per vblank");
    }

    #[test]
    fn trace_line_matches_nestest_layout() {
        let mut nes = make_nes(&[0x4C, 0xF5, 0xC5]);
        for _ in 0..7 {
            nes.tick();
        }
        assert_eq!(
            nes.trace_line(),
            "8000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7"
        );
    }

    #[test]
    fn trace_line_marks_undocumented_opcodes() {
        let mut nes = make_nes(&[0x04, 0xA9]);
        for _ in 0..7 {
            nes.tick();
        }
        let line = nes.trace_line();
        assert!(line.starts_with("8000  04 A9    *NOP $A9"), "{line}");
        assert_eq!(line.find("A:"), Some(48));
    }

    #[test]
    fn step_instruction_stops_on_boundaries() {
        let mut nes = make_nes(&[0xA9, 0x01, 0xAA]);
        nes.step_instruction();
        assert_eq!(nes.cpu().regs.pc, 0x8000, "reset sequence");
        nes.step_instruction();
        assert_eq!(nes.cpu().regs.pc, 0x8002);
        assert_eq!(nes.cpu().cycles(), 9);
    }

    #[test]
    fn ppu_registers_are_reachable_from_the_bus() {
        let mut nes = make_nes(&[]);
        nes.memory_mut().write(0x2006, 0x21);
        nes.memory_mut().write(0x2006, 0x00);
        nes.memory_mut().write(0x2007, 0x99);
        assert_eq!(nes.ppu().peek_vram(0x2100), 0x99);
        assert_eq!(nes.query("ppu.v"), Some(Value::U16(0x2101)));
    }

    #[test]
    fn unknown_paths_are_none() {
        let nes = make_nes(&[]);
        assert_eq!(nes.query("cpu.bogus"), None);
        assert_eq!(nes.query("memory.zz"), None);
        assert_eq!(nes.query("frame_count"), Some(Value::U64(0)));
    }
}

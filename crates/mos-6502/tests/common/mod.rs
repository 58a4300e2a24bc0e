//! Helpers shared by the CPU integration tests.

#![allow(dead_code)]

use emu_core::{Bus, Cpu, Memory};
use mos_6502::Mos6502;

/// Where test programs are loaded.
pub const ORIGIN: u16 = 0x0200;

/// One bus cycle as seen from outside the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(u16, u8),
    Write(u16, u8),
}

/// Memory that records every access.
pub struct TraceBus {
    pub mem: Memory,
    pub log: Vec<Access>,
}

impl TraceBus {
    pub fn new() -> Self {
        Self {
            mem: Memory::new(),
            log: Vec::new(),
        }
    }
}

impl Bus for TraceBus {
    fn read(&mut self, address: u16) -> u8 {
        let value = self.mem.read(address);
        self.log.push(Access::Read(address, value));
        value
    }

    fn write(&mut self, address: u16, value: u8) {
        self.log.push(Access::Write(address, value));
        self.mem.write(address, value);
    }
}

/// Load `program` at [`ORIGIN`] and point PC at it.
pub fn setup_program(mem: &mut Memory, program: &[u8]) -> Mos6502 {
    mem.load(ORIGIN, program).unwrap();
    let mut cpu = Mos6502::new();
    cpu.regs.pc = ORIGIN;
    cpu
}

/// Run one instruction to completion; returns the cycles it took.
pub fn run_instruction<B: Bus>(cpu: &mut Mos6502, bus: &mut B) -> u32 {
    cpu.tick(bus);
    let mut cycles = 1;
    while !cpu.is_instruction_complete() {
        cpu.tick(bus);
        cycles += 1;
        assert!(cycles <= 16, "instruction did not complete");
    }
    cycles
}

//! Kevin Horton's `nestest` in automation mode, compared line by line
//! against the reference log: PC, instruction bytes, registers, PPU
//! position and CPU cycle count.
//!
//! The ROM and log live in `test-roms/nestest.nes` and
//! `test-roms/nestest.log` at the workspace root.

use std::fs;
use std::path::Path;

use emu_nes::{Nes, NesConfig};

/// Columns compared: the address and raw bytes, then everything from `A:`.
fn columns(line: &str) -> Option<(&str, &str)> {
    let registers = line.find("A:")?;
    Some((line.get(..14)?.trim_end(), &line[registers..]))
}

#[test]
#[ignore = "requires test-roms/nestest.nes and nestest.log; run with --ignored"]
fn matches_reference_log() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-roms");
    let (Ok(rom), Ok(log)) = (
        fs::read(dir.join("nestest.nes")),
        fs::read_to_string(dir.join("nestest.log")),
    ) else {
        eprintln!("nestest files not found in {}", dir.display());
        return;
    };

    let mut nes = Nes::new(&NesConfig::new(rom)).expect("nestest is NROM");
    nes.step_instruction();
    // Automation mode starts at $C000 instead of the reset vector.
    nes.cpu_mut().regs.pc = 0xC000;

    for (number, expected) in log.lines().enumerate() {
        let actual = nes.trace_line();
        let (Some(want), Some(got)) = (columns(expected), columns(&actual)) else {
            panic!("line {}: malformed trace", number + 1);
        };
        assert_eq!(
            got,
            want,
            "line {}\nexpected: {expected}\n     got: {actual}",
            number + 1
        );
        nes.step_instruction();
    }

    assert_eq!(nes.peek(0x0002), 0, "documented opcode failure code");
    assert_eq!(nes.peek(0x0003), 0, "undocumented opcode failure code");
}

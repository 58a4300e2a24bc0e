//! One-line disassembler driven by the decode table.

use crate::{AddressingMode, decode};

/// Format the instruction whose bytes start at `bytes[0]`, located at `pc`.
///
/// Undocumented opcodes are prefixed with `*`, the convention of the
/// widely used `nestest` trace. Missing operand bytes read as zero.
#[must_use]
pub fn disassemble(bytes: &[u8], pc: u16) -> String {
    let byte = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let instr = decode(byte(0));
    let lo = byte(1);
    let word = u16::from_le_bytes([lo, byte(2)]);

    let operand = match instr.mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${lo:02X}"),
        AddressingMode::ZeroPage => format!("${lo:02X}"),
        AddressingMode::ZeroPageX => format!("${lo:02X},X"),
        AddressingMode::ZeroPageY => format!("${lo:02X},Y"),
        AddressingMode::Absolute => format!("${word:04X}"),
        AddressingMode::AbsoluteX => format!("${word:04X},X"),
        AddressingMode::AbsoluteY => format!("${word:04X},Y"),
        AddressingMode::Indirect => format!("(${word:04X})"),
        AddressingMode::IndexedIndirect => format!("(${lo:02X},X)"),
        AddressingMode::IndirectIndexed => format!("(${lo:02X}),Y"),
        AddressingMode::Relative => {
            let target = pc.wrapping_add(2).wrapping_add_signed(i16::from(lo as i8));
            format!("${target:04X}")
        }
    };

    let prefix = if instr.documented { "" } else { "*" };
    let mnemonic = instr.operation.mnemonic();
    if operand.is_empty() {
        format!("{prefix}{mnemonic}")
    } else {
        format!("{prefix}{mnemonic} {operand}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_mode() {
        assert_eq!(disassemble(&[0xA9, 0x10], 0), "LDA #$10");
        assert_eq!(disassemble(&[0xBD, 0x34, 0x12], 0), "LDA $1234,X");
        assert_eq!(disassemble(&[0x6C, 0xFC, 0xFF], 0), "JMP ($FFFC)");
        assert_eq!(disassemble(&[0xB1, 0x80], 0), "LDA ($80),Y");
        assert_eq!(disassemble(&[0x0A], 0), "ASL A");
        assert_eq!(disassemble(&[0x60], 0), "RTS");
    }

    #[test]
    fn branch_target_is_relative_to_next_instruction() {
        assert_eq!(disassemble(&[0xD0, 0xFE], 0xC000), "BNE $C000");
        assert_eq!(disassemble(&[0xF0, 0x10], 0xC000), "BEQ $C012");
    }

    #[test]
    fn undocumented_opcodes_are_starred() {
        assert_eq!(disassemble(&[0xA7, 0x00], 0), "*LAX $00");
        assert_eq!(disassemble(&[0xEB, 0x01], 0), "*SBC #$01");
        assert_eq!(disassemble(&[0x1A], 0), "*NOP");
        assert_eq!(disassemble(&[0xEA], 0), "NOP");
    }
}

//! Opcode decode table.
//!
//! Every one of the 256 opcodes has exactly one `Instruction` descriptor.
//! The descriptor names the operation, the addressing mode and the bus
//! access pattern; the cycle sequence is the template for (mode, access)
//! and the operation only decides what happens in its work cycle.

/// What an instruction computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Undocumented.
    /// ASL then ORA.
    Slo,
    /// ROL then AND.
    Rla,
    /// LSR then EOR.
    Sre,
    /// ROR then ADC.
    Rra,
    /// Store A & X.
    Sax,
    /// Load A and X.
    Lax,
    /// DEC then CMP.
    Dcp,
    /// INC then SBC.
    Isc,
    /// AND, then C = N.
    Anc,
    /// AND then LSR A.
    Alr,
    /// AND then ROR A with odd flag rules.
    Arr,
    /// A = (A | magic) & X & imm. Unstable on hardware.
    Ane,
    /// A = X = (A | magic) & imm. Unstable on hardware.
    Lxa,
    /// X = (A & X) - imm, carry as for CMP.
    Sbx,
    /// Alias of SBC immediate.
    Usbc,
    /// A = X = S = mem & S.
    Las,
    /// Store A & X & (H + 1).
    Sha,
    /// Store X & (H + 1).
    Shx,
    /// Store Y & (H + 1).
    Shy,
    /// S = A & X, then store S & (H + 1).
    Tas,
    /// Locks the CPU.
    Jam,
}

impl Operation {
    /// Split a composite read-modify-write operation into the modify step
    /// and the register step that consumes its result.
    #[must_use]
    pub const fn pipeline(self) -> (Operation, Option<Operation>) {
        match self {
            Operation::Slo => (Operation::Asl, Some(Operation::Ora)),
            Operation::Rla => (Operation::Rol, Some(Operation::And)),
            Operation::Sre => (Operation::Lsr, Some(Operation::Eor)),
            Operation::Rra => (Operation::Ror, Some(Operation::Adc)),
            Operation::Dcp => (Operation::Dec, Some(Operation::Cmp)),
            Operation::Isc => (Operation::Inc, Some(Operation::Sbc)),
            other => (other, None),
        }
    }

    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Operation::Adc => "ADC",
            Operation::And => "AND",
            Operation::Asl => "ASL",
            Operation::Bcc => "BCC",
            Operation::Bcs => "BCS",
            Operation::Beq => "BEQ",
            Operation::Bit => "BIT",
            Operation::Bmi => "BMI",
            Operation::Bne => "BNE",
            Operation::Bpl => "BPL",
            Operation::Brk => "BRK",
            Operation::Bvc => "BVC",
            Operation::Bvs => "BVS",
            Operation::Clc => "CLC",
            Operation::Cld => "CLD",
            Operation::Cli => "CLI",
            Operation::Clv => "CLV",
            Operation::Cmp => "CMP",
            Operation::Cpx => "CPX",
            Operation::Cpy => "CPY",
            Operation::Dec => "DEC",
            Operation::Dex => "DEX",
            Operation::Dey => "DEY",
            Operation::Eor => "EOR",
            Operation::Inc => "INC",
            Operation::Inx => "INX",
            Operation::Iny => "INY",
            Operation::Jmp => "JMP",
            Operation::Jsr => "JSR",
            Operation::Lda => "LDA",
            Operation::Ldx => "LDX",
            Operation::Ldy => "LDY",
            Operation::Lsr => "LSR",
            Operation::Nop => "NOP",
            Operation::Ora => "ORA",
            Operation::Pha => "PHA",
            Operation::Php => "PHP",
            Operation::Pla => "PLA",
            Operation::Plp => "PLP",
            Operation::Rol => "ROL",
            Operation::Ror => "ROR",
            Operation::Rti => "RTI",
            Operation::Rts => "RTS",
            Operation::Sbc | Operation::Usbc => "SBC",
            Operation::Sec => "SEC",
            Operation::Sed => "SED",
            Operation::Sei => "SEI",
            Operation::Sta => "STA",
            Operation::Stx => "STX",
            Operation::Sty => "STY",
            Operation::Tax => "TAX",
            Operation::Tay => "TAY",
            Operation::Tsx => "TSX",
            Operation::Txa => "TXA",
            Operation::Txs => "TXS",
            Operation::Tya => "TYA",
            Operation::Slo => "SLO",
            Operation::Rla => "RLA",
            Operation::Sre => "SRE",
            Operation::Rra => "RRA",
            Operation::Sax => "SAX",
            Operation::Lax => "LAX",
            Operation::Dcp => "DCP",
            Operation::Isc => "ISB",
            Operation::Anc => "ANC",
            Operation::Alr => "ALR",
            Operation::Arr => "ARR",
            Operation::Ane => "ANE",
            Operation::Lxa => "LXA",
            Operation::Sbx => "SBX",
            Operation::Las => "LAS",
            Operation::Sha => "SHA",
            Operation::Shx => "SHX",
            Operation::Shy => "SHY",
            Operation::Tas => "TAS",
            Operation::Jam => "JAM",
        }
    }

    const fn is_undocumented(self) -> bool {
        matches!(
            self,
            Operation::Slo
                | Operation::Rla
                | Operation::Sre
                | Operation::Rra
                | Operation::Sax
                | Operation::Lax
                | Operation::Dcp
                | Operation::Isc
                | Operation::Anc
                | Operation::Alr
                | Operation::Arr
                | Operation::Ane
                | Operation::Lxa
                | Operation::Sbx
                | Operation::Usbc
                | Operation::Las
                | Operation::Sha
                | Operation::Shx
                | Operation::Shy
                | Operation::Tas
                | Operation::Jam
        )
    }
}

/// How the operand address is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// `JMP ($nnnn)`, with the page-wrap bug.
    Indirect,
    /// `($nn,X)`
    IndexedIndirect,
    /// `($nn),Y`
    IndirectIndexed,
    Relative,
}

impl AddressingMode {
    /// Instruction length in bytes, opcode included.
    #[must_use]
    pub const fn bytes(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
            _ => 2,
        }
    }
}

/// The shape of an instruction's bus traffic.
///
/// Together with the addressing mode this selects the cycle template.
/// The irregular control-flow instructions each have their own pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Internal operation on registers only.
    Internal,
    Read,
    Write,
    ReadModifyWrite,
    /// Read-modify-write whose result then feeds a register operation.
    ReadModifyWriteRegister,
    Push,
    Pull,
    Jump,
    Branch,
    /// BRK, and the hardware interrupt/reset sequences that share its shape.
    Break,
    /// JSR
    Call,
    /// RTS
    Return,
    /// RTI
    ReturnInterrupt,
    Halt,
}

/// Immutable per-opcode descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub operation: Operation,
    pub mode: AddressingMode,
    pub access: Access,
    /// Length in bytes.
    pub bytes: u8,
    /// Cycles with no page crossing and branches not taken.
    pub cycles: u8,
    /// One extra cycle when indexing crosses a page.
    pub page_penalty: bool,
    /// One extra cycle when taken, another when the target is on a
    /// different page.
    pub branch: bool,
    pub documented: bool,
}

/// Descriptor for `opcode`.
#[must_use]
pub fn decode(opcode: u8) -> &'static Instruction {
    &TABLE[usize::from(opcode)]
}

/// All 256 descriptors, indexed by opcode.
pub static TABLE: [Instruction; 256] = build_table();

const fn build_table() -> [Instruction; 256] {
    let mut table = [Instruction {
        opcode: 0,
        operation: Operation::Jam,
        mode: AddressingMode::Implied,
        access: Access::Halt,
        bytes: 1,
        cycles: 0,
        page_penalty: false,
        branch: false,
        documented: false,
    }; 256];

    let mut i = 0;
    while i < 256 {
        let (operation, mode, access, cycles) = ENTRIES[i];
        let opcode = i as u8;
        let page_penalty = matches!(access, Access::Read)
            && matches!(
                mode,
                AddressingMode::AbsoluteX
                    | AddressingMode::AbsoluteY
                    | AddressingMode::IndirectIndexed
            );
        let documented = !operation.is_undocumented()
            && !(matches!(operation, Operation::Nop) && opcode != 0xEA);
        table[i] = Instruction {
            opcode,
            operation,
            mode,
            access,
            bytes: mode.bytes(),
            cycles,
            page_penalty,
            branch: matches!(access, Access::Branch),
            documented,
        };
        i += 1;
    }
    table
}

use Access as A;
use AddressingMode as M;
use Operation as O;

#[rustfmt::skip]
const ENTRIES: [(Operation, AddressingMode, Access, u8); 256] = [
    // 0x00
    (O::Brk, M::Implied, A::Break, 7),
    (O::Ora, M::IndexedIndirect, A::Read, 6),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Slo, M::IndexedIndirect, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPage, A::Read, 3),
    (O::Ora, M::ZeroPage, A::Read, 3),
    (O::Asl, M::ZeroPage, A::ReadModifyWrite, 5),
    (O::Slo, M::ZeroPage, A::ReadModifyWriteRegister, 5),
    (O::Php, M::Implied, A::Push, 3),
    (O::Ora, M::Immediate, A::Read, 2),
    (O::Asl, M::Accumulator, A::Internal, 2),
    (O::Anc, M::Immediate, A::Read, 2),
    (O::Nop, M::Absolute, A::Read, 4),
    (O::Ora, M::Absolute, A::Read, 4),
    (O::Asl, M::Absolute, A::ReadModifyWrite, 6),
    (O::Slo, M::Absolute, A::ReadModifyWriteRegister, 6),
    // 0x10
    (O::Bpl, M::Relative, A::Branch, 2),
    (O::Ora, M::IndirectIndexed, A::Read, 5),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Slo, M::IndirectIndexed, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPageX, A::Read, 4),
    (O::Ora, M::ZeroPageX, A::Read, 4),
    (O::Asl, M::ZeroPageX, A::ReadModifyWrite, 6),
    (O::Slo, M::ZeroPageX, A::ReadModifyWriteRegister, 6),
    (O::Clc, M::Implied, A::Internal, 2),
    (O::Ora, M::AbsoluteY, A::Read, 4),
    (O::Nop, M::Implied, A::Internal, 2),
    (O::Slo, M::AbsoluteY, A::ReadModifyWriteRegister, 7),
    (O::Nop, M::AbsoluteX, A::Read, 4),
    (O::Ora, M::AbsoluteX, A::Read, 4),
    (O::Asl, M::AbsoluteX, A::ReadModifyWrite, 7),
    (O::Slo, M::AbsoluteX, A::ReadModifyWriteRegister, 7),
    // 0x20
    (O::Jsr, M::Absolute, A::Call, 6),
    (O::And, M::IndexedIndirect, A::Read, 6),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Rla, M::IndexedIndirect, A::ReadModifyWriteRegister, 8),
    (O::Bit, M::ZeroPage, A::Read, 3),
    (O::And, M::ZeroPage, A::Read, 3),
    (O::Rol, M::ZeroPage, A::ReadModifyWrite, 5),
    (O::Rla, M::ZeroPage, A::ReadModifyWriteRegister, 5),
    (O::Plp, M::Implied, A::Pull, 4),
    (O::And, M::Immediate, A::Read, 2),
    (O::Rol, M::Accumulator, A::Internal, 2),
    (O::Anc, M::Immediate, A::Read, 2),
    (O::Bit, M::Absolute, A::Read, 4),
    (O::And, M::Absolute, A::Read, 4),
    (O::Rol, M::Absolute, A::ReadModifyWrite, 6),
    (O::Rla, M::Absolute, A::ReadModifyWriteRegister, 6),
    // 0x30
    (O::Bmi, M::Relative, A::Branch, 2),
    (O::And, M::IndirectIndexed, A::Read, 5),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Rla, M::IndirectIndexed, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPageX, A::Read, 4),
    (O::And, M::ZeroPageX, A::Read, 4),
    (O::Rol, M::ZeroPageX, A::ReadModifyWrite, 6),
    (O::Rla, M::ZeroPageX, A::ReadModifyWriteRegister, 6),
    (O::Sec, M::Implied, A::Internal, 2),
    (O::And, M::AbsoluteY, A::Read, 4),
    (O::Nop, M::Implied, A::Internal, 2),
    (O::Rla, M::AbsoluteY, A::ReadModifyWriteRegister, 7),
    (O::Nop, M::AbsoluteX, A::Read, 4),
    (O::And, M::AbsoluteX, A::Read, 4),
    (O::Rol, M::AbsoluteX, A::ReadModifyWrite, 7),
    (O::Rla, M::AbsoluteX, A::ReadModifyWriteRegister, 7),
    // 0x40
    (O::Rti, M::Implied, A::ReturnInterrupt, 6),
    (O::Eor, M::IndexedIndirect, A::Read, 6),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Sre, M::IndexedIndirect, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPage, A::Read, 3),
    (O::Eor, M::ZeroPage, A::Read, 3),
    (O::Lsr, M::ZeroPage, A::ReadModifyWrite, 5),
    (O::Sre, M::ZeroPage, A::ReadModifyWriteRegister, 5),
    (O::Pha, M::Implied, A::Push, 3),
    (O::Eor, M::Immediate, A::Read, 2),
    (O::Lsr, M::Accumulator, A::Internal, 2),
    (O::Alr, M::Immediate, A::Read, 2),
    (O::Jmp, M::Absolute, A::Jump, 3),
    (O::Eor, M::Absolute, A::Read, 4),
    (O::Lsr, M::Absolute, A::ReadModifyWrite, 6),
    (O::Sre, M::Absolute, A::ReadModifyWriteRegister, 6),
    // 0x50
    (O::Bvc, M::Relative, A::Branch, 2),
    (O::Eor, M::IndirectIndexed, A::Read, 5),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Sre, M::IndirectIndexed, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPageX, A::Read, 4),
    (O::Eor, M::ZeroPageX, A::Read, 4),
    (O::Lsr, M::ZeroPageX, A::ReadModifyWrite, 6),
    (O::Sre, M::ZeroPageX, A::ReadModifyWriteRegister, 6),
    (O::Cli, M::Implied, A::Internal, 2),
    (O::Eor, M::AbsoluteY, A::Read, 4),
    (O::Nop, M::Implied, A::Internal, 2),
    (O::Sre, M::AbsoluteY, A::ReadModifyWriteRegister, 7),
    (O::Nop, M::AbsoluteX, A::Read, 4),
    (O::Eor, M::AbsoluteX, A::Read, 4),
    (O::Lsr, M::AbsoluteX, A::ReadModifyWrite, 7),
    (O::Sre, M::AbsoluteX, A::ReadModifyWriteRegister, 7),
    // 0x60
    (O::Rts, M::Implied, A::Return, 6),
    (O::Adc, M::IndexedIndirect, A::Read, 6),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Rra, M::IndexedIndirect, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPage, A::Read, 3),
    (O::Adc, M::ZeroPage, A::Read, 3),
    (O::Ror, M::ZeroPage, A::ReadModifyWrite, 5),
    (O::Rra, M::ZeroPage, A::ReadModifyWriteRegister, 5),
    (O::Pla, M::Implied, A::Pull, 4),
    (O::Adc, M::Immediate, A::Read, 2),
    (O::Ror, M::Accumulator, A::Internal, 2),
    (O::Arr, M::Immediate, A::Read, 2),
    (O::Jmp, M::Indirect, A::Jump, 5),
    (O::Adc, M::Absolute, A::Read, 4),
    (O::Ror, M::Absolute, A::ReadModifyWrite, 6),
    (O::Rra, M::Absolute, A::ReadModifyWriteRegister, 6),
    // 0x70
    (O::Bvs, M::Relative, A::Branch, 2),
    (O::Adc, M::IndirectIndexed, A::Read, 5),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Rra, M::IndirectIndexed, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPageX, A::Read, 4),
    (O::Adc, M::ZeroPageX, A::Read, 4),
    (O::Ror, M::ZeroPageX, A::ReadModifyWrite, 6),
    (O::Rra, M::ZeroPageX, A::ReadModifyWriteRegister, 6),
    (O::Sei, M::Implied, A::Internal, 2),
    (O::Adc, M::AbsoluteY, A::Read, 4),
    (O::Nop, M::Implied, A::Internal, 2),
    (O::Rra, M::AbsoluteY, A::ReadModifyWriteRegister, 7),
    (O::Nop, M::AbsoluteX, A::Read, 4),
    (O::Adc, M::AbsoluteX, A::Read, 4),
    (O::Ror, M::AbsoluteX, A::ReadModifyWrite, 7),
    (O::Rra, M::AbsoluteX, A::ReadModifyWriteRegister, 7),
    // 0x80
    (O::Nop, M::Immediate, A::Read, 2),
    (O::Sta, M::IndexedIndirect, A::Write, 6),
    (O::Nop, M::Immediate, A::Read, 2),
    (O::Sax, M::IndexedIndirect, A::Write, 6),
    (O::Sty, M::ZeroPage, A::Write, 3),
    (O::Sta, M::ZeroPage, A::Write, 3),
    (O::Stx, M::ZeroPage, A::Write, 3),
    (O::Sax, M::ZeroPage, A::Write, 3),
    (O::Dey, M::Implied, A::Internal, 2),
    (O::Nop, M::Immediate, A::Read, 2),
    (O::Txa, M::Implied, A::Internal, 2),
    (O::Ane, M::Immediate, A::Read, 2),
    (O::Sty, M::Absolute, A::Write, 4),
    (O::Sta, M::Absolute, A::Write, 4),
    (O::Stx, M::Absolute, A::Write, 4),
    (O::Sax, M::Absolute, A::Write, 4),
    // 0x90
    (O::Bcc, M::Relative, A::Branch, 2),
    (O::Sta, M::IndirectIndexed, A::Write, 6),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Sha, M::IndirectIndexed, A::Write, 6),
    (O::Sty, M::ZeroPageX, A::Write, 4),
    (O::Sta, M::ZeroPageX, A::Write, 4),
    (O::Stx, M::ZeroPageY, A::Write, 4),
    (O::Sax, M::ZeroPageY, A::Write, 4),
    (O::Tya, M::Implied, A::Internal, 2),
    (O::Sta, M::AbsoluteY, A::Write, 5),
    (O::Txs, M::Implied, A::Internal, 2),
    (O::Tas, M::AbsoluteY, A::Write, 5),
    (O::Shy, M::AbsoluteX, A::Write, 5),
    (O::Sta, M::AbsoluteX, A::Write, 5),
    (O::Shx, M::AbsoluteY, A::Write, 5),
    (O::Sha, M::AbsoluteY, A::Write, 5),
    // 0xA0
    (O::Ldy, M::Immediate, A::Read, 2),
    (O::Lda, M::IndexedIndirect, A::Read, 6),
    (O::Ldx, M::Immediate, A::Read, 2),
    (O::Lax, M::IndexedIndirect, A::Read, 6),
    (O::Ldy, M::ZeroPage, A::Read, 3),
    (O::Lda, M::ZeroPage, A::Read, 3),
    (O::Ldx, M::ZeroPage, A::Read, 3),
    (O::Lax, M::ZeroPage, A::Read, 3),
    (O::Tay, M::Implied, A::Internal, 2),
    (O::Lda, M::Immediate, A::Read, 2),
    (O::Tax, M::Implied, A::Internal, 2),
    (O::Lxa, M::Immediate, A::Read, 2),
    (O::Ldy, M::Absolute, A::Read, 4),
    (O::Lda, M::Absolute, A::Read, 4),
    (O::Ldx, M::Absolute, A::Read, 4),
    (O::Lax, M::Absolute, A::Read, 4),
    // 0xB0
    (O::Bcs, M::Relative, A::Branch, 2),
    (O::Lda, M::IndirectIndexed, A::Read, 5),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Lax, M::IndirectIndexed, A::Read, 5),
    (O::Ldy, M::ZeroPageX, A::Read, 4),
    (O::Lda, M::ZeroPageX, A::Read, 4),
    (O::Ldx, M::ZeroPageY, A::Read, 4),
    (O::Lax, M::ZeroPageY, A::Read, 4),
    (O::Clv, M::Implied, A::Internal, 2),
    (O::Lda, M::AbsoluteY, A::Read, 4),
    (O::Tsx, M::Implied, A::Internal, 2),
    (O::Las, M::AbsoluteY, A::Read, 4),
    (O::Ldy, M::AbsoluteX, A::Read, 4),
    (O::Lda, M::AbsoluteX, A::Read, 4),
    (O::Ldx, M::AbsoluteY, A::Read, 4),
    (O::Lax, M::AbsoluteY, A::Read, 4),
    // 0xC0
    (O::Cpy, M::Immediate, A::Read, 2),
    (O::Cmp, M::IndexedIndirect, A::Read, 6),
    (O::Nop, M::Immediate, A::Read, 2),
    (O::Dcp, M::IndexedIndirect, A::ReadModifyWriteRegister, 8),
    (O::Cpy, M::ZeroPage, A::Read, 3),
    (O::Cmp, M::ZeroPage, A::Read, 3),
    (O::Dec, M::ZeroPage, A::ReadModifyWrite, 5),
    (O::Dcp, M::ZeroPage, A::ReadModifyWriteRegister, 5),
    (O::Iny, M::Implied, A::Internal, 2),
    (O::Cmp, M::Immediate, A::Read, 2),
    (O::Dex, M::Implied, A::Internal, 2),
    (O::Sbx, M::Immediate, A::Read, 2),
    (O::Cpy, M::Absolute, A::Read, 4),
    (O::Cmp, M::Absolute, A::Read, 4),
    (O::Dec, M::Absolute, A::ReadModifyWrite, 6),
    (O::Dcp, M::Absolute, A::ReadModifyWriteRegister, 6),
    // 0xD0
    (O::Bne, M::Relative, A::Branch, 2),
    (O::Cmp, M::IndirectIndexed, A::Read, 5),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Dcp, M::IndirectIndexed, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPageX, A::Read, 4),
    (O::Cmp, M::ZeroPageX, A::Read, 4),
    (O::Dec, M::ZeroPageX, A::ReadModifyWrite, 6),
    (O::Dcp, M::ZeroPageX, A::ReadModifyWriteRegister, 6),
    (O::Cld, M::Implied, A::Internal, 2),
    (O::Cmp, M::AbsoluteY, A::Read, 4),
    (O::Nop, M::Implied, A::Internal, 2),
    (O::Dcp, M::AbsoluteY, A::ReadModifyWriteRegister, 7),
    (O::Nop, M::AbsoluteX, A::Read, 4),
    (O::Cmp, M::AbsoluteX, A::Read, 4),
    (O::Dec, M::AbsoluteX, A::ReadModifyWrite, 7),
    (O::Dcp, M::AbsoluteX, A::ReadModifyWriteRegister, 7),
    // 0xE0
    (O::Cpx, M::Immediate, A::Read, 2),
    (O::Sbc, M::IndexedIndirect, A::Read, 6),
    (O::Nop, M::Immediate, A::Read, 2),
    (O::Isc, M::IndexedIndirect, A::ReadModifyWriteRegister, 8),
    (O::Cpx, M::ZeroPage, A::Read, 3),
    (O::Sbc, M::ZeroPage, A::Read, 3),
    (O::Inc, M::ZeroPage, A::ReadModifyWrite, 5),
    (O::Isc, M::ZeroPage, A::ReadModifyWriteRegister, 5),
    (O::Inx, M::Implied, A::Internal, 2),
    (O::Sbc, M::Immediate, A::Read, 2),
    (O::Nop, M::Implied, A::Internal, 2),
    (O::Usbc, M::Immediate, A::Read, 2),
    (O::Cpx, M::Absolute, A::Read, 4),
    (O::Sbc, M::Absolute, A::Read, 4),
    (O::Inc, M::Absolute, A::ReadModifyWrite, 6),
    (O::Isc, M::Absolute, A::ReadModifyWriteRegister, 6),
    // 0xF0
    (O::Beq, M::Relative, A::Branch, 2),
    (O::Sbc, M::IndirectIndexed, A::Read, 5),
    (O::Jam, M::Implied, A::Halt, 0),
    (O::Isc, M::IndirectIndexed, A::ReadModifyWriteRegister, 8),
    (O::Nop, M::ZeroPageX, A::Read, 4),
    (O::Sbc, M::ZeroPageX, A::Read, 4),
    (O::Inc, M::ZeroPageX, A::ReadModifyWrite, 6),
    (O::Isc, M::ZeroPageX, A::ReadModifyWriteRegister, 6),
    (O::Sed, M::Implied, A::Internal, 2),
    (O::Sbc, M::AbsoluteY, A::Read, 4),
    (O::Nop, M::Implied, A::Internal, 2),
    (O::Isc, M::AbsoluteY, A::ReadModifyWriteRegister, 7),
    (O::Nop, M::AbsoluteX, A::Read, 4),
    (O::Sbc, M::AbsoluteX, A::Read, 4),
    (O::Inc, M::AbsoluteX, A::ReadModifyWrite, 7),
    (O::Isc, M::AbsoluteX, A::ReadModifyWriteRegister, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_opcode() {
        for (i, instr) in TABLE.iter().enumerate() {
            assert_eq!(usize::from(instr.opcode), i);
        }
    }

    #[test]
    fn composites_split_into_documented_steps() {
        assert_eq!(
            Operation::Dcp.pipeline(),
            (Operation::Dec, Some(Operation::Cmp))
        );
        assert_eq!(Operation::Lda.pipeline(), (Operation::Lda, None));
        for instr in &TABLE {
            let composite = instr.operation.pipeline().1.is_some();
            assert_eq!(
                composite,
                instr.access == Access::ReadModifyWriteRegister,
                "opcode {:02X}",
                instr.opcode
            );
        }
    }

    #[test]
    fn only_ea_is_the_documented_nop() {
        let documented_nops: Vec<u8> = TABLE
            .iter()
            .filter(|i| i.operation == Operation::Nop && i.documented)
            .map(|i| i.opcode)
            .collect();
        assert_eq!(documented_nops, vec![0xEA]);
        assert_eq!(TABLE.iter().filter(|i| i.documented).count(), 151);
    }

    #[test]
    fn page_penalty_only_on_indexed_reads() {
        assert!(decode(0xBD).page_penalty); // LDA abs,X
        assert!(decode(0xB1).page_penalty); // LDA (zp),Y
        assert!(!decode(0x9D).page_penalty); // STA abs,X
        assert!(!decode(0x1E).page_penalty); // ASL abs,X
        assert!(!decode(0xA1).page_penalty); // LDA (zp,X)
    }
}

//! Cycle templates.
//!
//! A template is the ordered list of bus cycles that follow the opcode
//! fetch for one (addressing mode, access pattern) pair. Every opcode that
//! shares the pair runs the same list; only the operation plugged into the
//! work cycle differs. Some micro-ops may end the instruction early (index
//! without page crossing, branch not taken); otherwise the instruction ends
//! after the last entry.

use crate::{Access, AddressingMode};

/// Index register used by an indexed addressing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    X,
    Y,
}

/// One bus cycle of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroOp {
    /// Dummy read of PC; run an internal or accumulator effect.
    Internal,
    /// Read the operand at PC and run the effect.
    Immediate,
    /// Address low byte from PC (a complete zero-page address).
    FetchAddressLow,
    /// Address high byte from PC.
    FetchAddressHigh,
    /// Address high byte from PC, low byte plus index without carry.
    FetchAddressHighIndexed(Index),
    /// Zero-page pointer from PC.
    FetchPointer,
    /// Dummy read of the zero-page base, then add the index (wraps in page 0).
    IndexZeroPage(Index),
    /// Dummy read of the pointer, then add X (wraps in page 0).
    IndexPointer,
    ReadPointerLow,
    ReadPointerHigh,
    /// Pointer high byte, then low byte plus Y without carry.
    ReadPointerHighIndexed,
    /// Read at the un-fixed address. Without a page crossing this is the
    /// operand; otherwise fix the address and continue.
    ReadIndexed,
    /// Read at the un-fixed address and always fix it.
    DummyReadIndexed,
    /// Read the operand and run the effect.
    ReadOperand,
    /// Write the value chosen by the operation.
    Store,
    /// Read the byte to modify.
    ReadModify,
    /// Write the unmodified byte back while the ALU computes.
    DummyWriteModify,
    /// Write the modified byte, then run any register step.
    WriteModified,
    DummyReadPc,
    DummyReadStack,
    PushRegister,
    PullRegister,
    PushPcHigh,
    PushPcLow,
    /// Address high byte from PC and jump.
    FetchHighAndJump,
    ReadIndirectLow,
    /// Indirect high byte. The pointer's low byte wraps without carry.
    ReadIndirectHighAndJump,
    PullPcLow,
    PullPcHigh,
    /// Dummy read of PC, then PC + 1 (RTS returns past the JSR operand).
    IncrementPc,
    /// Read the byte after BRK (skipped by software BRK only).
    ReadPadding,
    /// Push P and latch the vector. NMI takes precedence here.
    PushStatus,
    ReadVectorLow,
    ReadVectorHigh,
    /// Read the offset; stop here if the branch is not taken.
    FetchBranchOffset,
    /// Dummy read of PC and add the offset to PCL; stop if no page crossing.
    BranchTaken,
    /// Dummy read at the un-fixed target, then fix PCH.
    BranchFixup,
    /// Lock the CPU.
    Jam,
}

use Index::{X, Y};
use MicroOp as U;

const INTERNAL: &[MicroOp] = &[U::Internal];
const IMMEDIATE: &[MicroOp] = &[U::Immediate];

const READ_ZP: &[MicroOp] = &[U::FetchAddressLow, U::ReadOperand];
const READ_ZPX: &[MicroOp] = &[U::FetchAddressLow, U::IndexZeroPage(X), U::ReadOperand];
const READ_ZPY: &[MicroOp] = &[U::FetchAddressLow, U::IndexZeroPage(Y), U::ReadOperand];
const READ_ABS: &[MicroOp] = &[U::FetchAddressLow, U::FetchAddressHigh, U::ReadOperand];
const READ_ABX: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHighIndexed(X),
    U::ReadIndexed,
    U::ReadOperand,
];
const READ_ABY: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHighIndexed(Y),
    U::ReadIndexed,
    U::ReadOperand,
];
const READ_IZX: &[MicroOp] = &[
    U::FetchPointer,
    U::IndexPointer,
    U::ReadPointerLow,
    U::ReadPointerHigh,
    U::ReadOperand,
];
const READ_IZY: &[MicroOp] = &[
    U::FetchPointer,
    U::ReadPointerLow,
    U::ReadPointerHighIndexed,
    U::ReadIndexed,
    U::ReadOperand,
];

const WRITE_ZP: &[MicroOp] = &[U::FetchAddressLow, U::Store];
const WRITE_ZPX: &[MicroOp] = &[U::FetchAddressLow, U::IndexZeroPage(X), U::Store];
const WRITE_ZPY: &[MicroOp] = &[U::FetchAddressLow, U::IndexZeroPage(Y), U::Store];
const WRITE_ABS: &[MicroOp] = &[U::FetchAddressLow, U::FetchAddressHigh, U::Store];
const WRITE_ABX: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHighIndexed(X),
    U::DummyReadIndexed,
    U::Store,
];
const WRITE_ABY: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHighIndexed(Y),
    U::DummyReadIndexed,
    U::Store,
];
const WRITE_IZX: &[MicroOp] = &[
    U::FetchPointer,
    U::IndexPointer,
    U::ReadPointerLow,
    U::ReadPointerHigh,
    U::Store,
];
const WRITE_IZY: &[MicroOp] = &[
    U::FetchPointer,
    U::ReadPointerLow,
    U::ReadPointerHighIndexed,
    U::DummyReadIndexed,
    U::Store,
];

const RMW_ZP: &[MicroOp] = &[
    U::FetchAddressLow,
    U::ReadModify,
    U::DummyWriteModify,
    U::WriteModified,
];
const RMW_ZPX: &[MicroOp] = &[
    U::FetchAddressLow,
    U::IndexZeroPage(X),
    U::ReadModify,
    U::DummyWriteModify,
    U::WriteModified,
];
const RMW_ABS: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHigh,
    U::ReadModify,
    U::DummyWriteModify,
    U::WriteModified,
];
const RMW_ABX: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHighIndexed(X),
    U::DummyReadIndexed,
    U::ReadModify,
    U::DummyWriteModify,
    U::WriteModified,
];
const RMW_ABY: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHighIndexed(Y),
    U::DummyReadIndexed,
    U::ReadModify,
    U::DummyWriteModify,
    U::WriteModified,
];
const RMW_IZX: &[MicroOp] = &[
    U::FetchPointer,
    U::IndexPointer,
    U::ReadPointerLow,
    U::ReadPointerHigh,
    U::ReadModify,
    U::DummyWriteModify,
    U::WriteModified,
];
const RMW_IZY: &[MicroOp] = &[
    U::FetchPointer,
    U::ReadPointerLow,
    U::ReadPointerHighIndexed,
    U::DummyReadIndexed,
    U::ReadModify,
    U::DummyWriteModify,
    U::WriteModified,
];

const PUSH: &[MicroOp] = &[U::DummyReadPc, U::PushRegister];
const PULL: &[MicroOp] = &[U::DummyReadPc, U::DummyReadStack, U::PullRegister];
const JUMP_ABS: &[MicroOp] = &[U::FetchAddressLow, U::FetchHighAndJump];
const JUMP_IND: &[MicroOp] = &[
    U::FetchAddressLow,
    U::FetchAddressHigh,
    U::ReadIndirectLow,
    U::ReadIndirectHighAndJump,
];
const CALL: &[MicroOp] = &[
    U::FetchAddressLow,
    U::DummyReadStack,
    U::PushPcHigh,
    U::PushPcLow,
    U::FetchHighAndJump,
];
const RETURN: &[MicroOp] = &[
    U::DummyReadPc,
    U::DummyReadStack,
    U::PullPcLow,
    U::PullPcHigh,
    U::IncrementPc,
];
const RETURN_INTERRUPT: &[MicroOp] = &[
    U::DummyReadPc,
    U::DummyReadStack,
    U::PullRegister,
    U::PullPcLow,
    U::PullPcHigh,
];
const BREAK: &[MicroOp] = &[
    U::ReadPadding,
    U::PushPcHigh,
    U::PushPcLow,
    U::PushStatus,
    U::ReadVectorLow,
    U::ReadVectorHigh,
];
const BRANCH: &[MicroOp] = &[U::FetchBranchOffset, U::BranchTaken, U::BranchFixup];
const HALT: &[MicroOp] = &[U::Jam];

/// Cycles after the opcode fetch for a (mode, access) pair.
///
/// Pairs that no opcode uses map to the halt template.
#[must_use]
pub fn template(mode: AddressingMode, access: Access) -> &'static [MicroOp] {
    use AddressingMode as M;

    match (access, mode) {
        (Access::Internal, _) => INTERNAL,
        (Access::Read, M::Immediate) => IMMEDIATE,
        (Access::Read, M::ZeroPage) => READ_ZP,
        (Access::Read, M::ZeroPageX) => READ_ZPX,
        (Access::Read, M::ZeroPageY) => READ_ZPY,
        (Access::Read, M::Absolute) => READ_ABS,
        (Access::Read, M::AbsoluteX) => READ_ABX,
        (Access::Read, M::AbsoluteY) => READ_ABY,
        (Access::Read, M::IndexedIndirect) => READ_IZX,
        (Access::Read, M::IndirectIndexed) => READ_IZY,
        (Access::Write, M::ZeroPage) => WRITE_ZP,
        (Access::Write, M::ZeroPageX) => WRITE_ZPX,
        (Access::Write, M::ZeroPageY) => WRITE_ZPY,
        (Access::Write, M::Absolute) => WRITE_ABS,
        (Access::Write, M::AbsoluteX) => WRITE_ABX,
        (Access::Write, M::AbsoluteY) => WRITE_ABY,
        (Access::Write, M::IndexedIndirect) => WRITE_IZX,
        (Access::Write, M::IndirectIndexed) => WRITE_IZY,
        (Access::ReadModifyWrite | Access::ReadModifyWriteRegister, mode) => match mode {
            M::ZeroPage => RMW_ZP,
            M::ZeroPageX => RMW_ZPX,
            M::Absolute => RMW_ABS,
            M::AbsoluteX => RMW_ABX,
            M::AbsoluteY => RMW_ABY,
            M::IndexedIndirect => RMW_IZX,
            M::IndirectIndexed => RMW_IZY,
            _ => HALT,
        },
        (Access::Push, _) => PUSH,
        (Access::Pull, _) => PULL,
        (Access::Jump, M::Indirect) => JUMP_IND,
        (Access::Jump, _) => JUMP_ABS,
        (Access::Call, _) => CALL,
        (Access::Return, _) => RETURN,
        (Access::ReturnInterrupt, _) => RETURN_INTERRUPT,
        (Access::Break, _) => BREAK,
        (Access::Branch, _) => BRANCH,
        _ => HALT,
    }
}

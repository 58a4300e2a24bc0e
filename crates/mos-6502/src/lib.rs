//! Cycle-accurate 6502 core of the Ricoh 2A03.
//!
//! The CPU is a table-driven interpreter. Each opcode decodes to an
//! [`Instruction`] naming an [`Operation`], an [`AddressingMode`] and an
//! [`Access`] pattern. The (mode, access) pair selects a cycle template,
//! and the operation's effect runs inside the template's work cycle, so
//! every documented and undocumented opcode gets the real chip's bus
//! traffic for free.
//!
//! Every `tick()` is exactly one bus access.

mod cpu;
mod disasm;
pub mod effect;
pub mod flags;
mod instruction;
mod registers;
pub mod template;

pub use cpu::{InterruptState, Mos6502};
pub use disasm::disassemble;
pub use flags::Status;
pub use instruction::{Access, AddressingMode, Instruction, Operation, TABLE, decode};
pub use registers::Registers;

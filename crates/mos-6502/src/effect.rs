//! Operation effects.
//!
//! Pure functions of (operation, registers, operand). They run inside the
//! one cycle of a template that does real work; they never touch the bus.

use crate::flags::{C, D, I, N, V, Z};
use crate::{Operation, Registers, Status};

/// Constant OR'd into A by the unstable ANE and LXA opcodes. Real chips
/// vary; $EE matches the common 2A03 behaviour.
pub const UNSTABLE_MAGIC: u8 = 0xEE;

/// Binary add with carry in and out. The 2A03 ignores D.
pub fn adc(regs: &mut Registers, operand: u8) {
    let a = regs.a;
    let sum = u16::from(a) + u16::from(operand) + u16::from(regs.p.is_set(C));
    let result = sum as u8;
    regs.p.set_if(C, sum > 0xFF);
    regs.p.set_if(V, (a ^ result) & (operand ^ result) & 0x80 != 0);
    regs.a = result;
    regs.p.update_nz(result);
}

/// Subtract with borrow, as an add of the one's complement.
pub fn sbc(regs: &mut Registers, operand: u8) {
    adc(regs, !operand);
}

fn compare(p: &mut Status, register: u8, operand: u8) {
    p.set_if(C, register >= operand);
    p.update_nz(register.wrapping_sub(operand));
}

fn load(p: &mut Status, value: u8) -> u8 {
    p.update_nz(value);
    value
}

/// Effect of an instruction that consumes a byte: immediate operand or a
/// value read from memory.
pub fn read(operation: Operation, regs: &mut Registers, operand: u8) {
    match operation {
        Operation::Lda => regs.a = load(&mut regs.p, operand),
        Operation::Ldx => regs.x = load(&mut regs.p, operand),
        Operation::Ldy => regs.y = load(&mut regs.p, operand),
        Operation::Lax => {
            regs.x = operand;
            regs.a = load(&mut regs.p, operand);
        }
        Operation::Ora => regs.a = load(&mut regs.p, regs.a | operand),
        Operation::And => regs.a = load(&mut regs.p, regs.a & operand),
        Operation::Eor => regs.a = load(&mut regs.p, regs.a ^ operand),
        Operation::Adc => adc(regs, operand),
        Operation::Sbc | Operation::Usbc => sbc(regs, operand),
        Operation::Cmp => compare(&mut regs.p, regs.a, operand),
        Operation::Cpx => compare(&mut regs.p, regs.x, operand),
        Operation::Cpy => compare(&mut regs.p, regs.y, operand),
        Operation::Bit => {
            regs.p.set_if(Z, regs.a & operand == 0);
            regs.p.set_if(N, operand & 0x80 != 0);
            regs.p.set_if(V, operand & 0x40 != 0);
        }
        Operation::Anc => {
            regs.a = load(&mut regs.p, regs.a & operand);
            regs.p.set_if(C, regs.a & 0x80 != 0);
        }
        Operation::Alr => {
            let value = regs.a & operand;
            regs.p.set_if(C, value & 0x01 != 0);
            regs.a = load(&mut regs.p, value >> 1);
        }
        Operation::Arr => {
            let value = regs.a & operand;
            let result = (value >> 1) | (u8::from(regs.p.is_set(C)) << 7);
            regs.a = load(&mut regs.p, result);
            regs.p.set_if(C, result & 0x40 != 0);
            regs.p.set_if(V, ((result >> 6) ^ (result >> 5)) & 0x01 != 0);
        }
        Operation::Ane => {
            let value = (regs.a | UNSTABLE_MAGIC) & regs.x & operand;
            regs.a = load(&mut regs.p, value);
        }
        Operation::Lxa => {
            let value = (regs.a | UNSTABLE_MAGIC) & operand;
            regs.x = value;
            regs.a = load(&mut regs.p, value);
        }
        Operation::Sbx => {
            let base = regs.a & regs.x;
            compare(&mut regs.p, base, operand);
            regs.x = base.wrapping_sub(operand);
        }
        Operation::Las => {
            let value = operand & regs.s;
            regs.s = value;
            regs.x = value;
            regs.a = load(&mut regs.p, value);
        }
        Operation::Nop => {}
        other => unreachable!("{other:?} does not consume an operand"),
    }
}

/// Byte a store puts on the bus. `high` is the high byte of the base
/// address before indexing, which the unstable stores AND into the value.
pub fn store(operation: Operation, regs: &mut Registers, high: u8) -> u8 {
    let h1 = high.wrapping_add(1);
    match operation {
        Operation::Sta => regs.a,
        Operation::Stx => regs.x,
        Operation::Sty => regs.y,
        Operation::Sax => regs.a & regs.x,
        Operation::Sha => regs.a & regs.x & h1,
        Operation::Shx => regs.x & h1,
        Operation::Shy => regs.y & h1,
        Operation::Tas => {
            regs.s = regs.a & regs.x;
            regs.s & h1
        }
        other => unreachable!("{other:?} is not a store"),
    }
}

/// Stores whose value depends on the address high byte. When indexing
/// crosses a page their target high byte is replaced by the stored value.
#[must_use]
pub const fn is_unstable_store(operation: Operation) -> bool {
    matches!(
        operation,
        Operation::Sha | Operation::Shx | Operation::Shy | Operation::Tas
    )
}

/// The modify step of a read-modify-write (or an accumulator shift).
pub fn modify(operation: Operation, regs: &mut Registers, value: u8) -> u8 {
    let result = match operation {
        Operation::Asl => {
            regs.p.set_if(C, value & 0x80 != 0);
            value << 1
        }
        Operation::Lsr => {
            regs.p.set_if(C, value & 0x01 != 0);
            value >> 1
        }
        Operation::Rol => {
            let carry_in = u8::from(regs.p.is_set(C));
            regs.p.set_if(C, value & 0x80 != 0);
            (value << 1) | carry_in
        }
        Operation::Ror => {
            let carry_in = u8::from(regs.p.is_set(C)) << 7;
            regs.p.set_if(C, value & 0x01 != 0);
            (value >> 1) | carry_in
        }
        Operation::Inc => value.wrapping_add(1),
        Operation::Dec => value.wrapping_sub(1),
        other => unreachable!("{other:?} does not modify memory"),
    };
    regs.p.update_nz(result);
    result
}

/// Register-only instructions.
pub fn internal(operation: Operation, regs: &mut Registers) {
    match operation {
        Operation::Clc => regs.p.clear(C),
        Operation::Sec => regs.p.set(C),
        Operation::Cli => regs.p.clear(I),
        Operation::Sei => regs.p.set(I),
        Operation::Cld => regs.p.clear(D),
        Operation::Sed => regs.p.set(D),
        Operation::Clv => regs.p.clear(V),
        Operation::Tax => regs.x = load(&mut regs.p, regs.a),
        Operation::Tay => regs.y = load(&mut regs.p, regs.a),
        Operation::Txa => regs.a = load(&mut regs.p, regs.x),
        Operation::Tya => regs.a = load(&mut regs.p, regs.y),
        Operation::Tsx => regs.x = load(&mut regs.p, regs.s),
        // TXS is the one transfer that leaves the flags alone.
        Operation::Txs => regs.s = regs.x,
        Operation::Inx => regs.x = load(&mut regs.p, regs.x.wrapping_add(1)),
        Operation::Iny => regs.y = load(&mut regs.p, regs.y.wrapping_add(1)),
        Operation::Dex => regs.x = load(&mut regs.p, regs.x.wrapping_sub(1)),
        Operation::Dey => regs.y = load(&mut regs.p, regs.y.wrapping_sub(1)),
        Operation::Nop => {}
        other => unreachable!("{other:?} is not an internal operation"),
    }
}

/// Byte pushed by PHA/PHP.
#[must_use]
pub fn push_value(operation: Operation, regs: &Registers) -> u8 {
    match operation {
        Operation::Php => regs.p.pushed(true),
        _ => regs.a,
    }
}

/// Apply a pulled byte (PLA, PLP, and the status pull of RTI).
pub fn pull(operation: Operation, regs: &mut Registers, value: u8) {
    match operation {
        Operation::Pla => regs.a = load(&mut regs.p, value),
        _ => regs.p = Status::from_pulled(value),
    }
}

/// Whether a conditional branch is taken.
#[must_use]
pub fn branch_taken(operation: Operation, p: Status) -> bool {
    match operation {
        Operation::Bpl => !p.is_set(N),
        Operation::Bmi => p.is_set(N),
        Operation::Bvc => !p.is_set(V),
        Operation::Bvs => p.is_set(V),
        Operation::Bcc => !p.is_set(C),
        Operation::Bcs => p.is_set(C),
        Operation::Bne => !p.is_set(Z),
        Operation::Beq => p.is_set(Z),
        _ => false,
    }
}

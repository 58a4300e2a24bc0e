//! Cycle counts, instruction lengths and bus-cycle order.

mod common;

use common::{Access, ORIGIN, TraceBus, run_instruction, setup_program};
use emu_core::{Bus, Memory};
use mos_6502::flags::{C, N, U, V, Z};
use mos_6502::{Access as Pattern, Mos6502, Status, TABLE, effect};

/// Published cycle counts, no page crossing, branches not taken.
/// JAM opcodes are 0.
#[rustfmt::skip]
const CYCLES: [u8; 256] = [
    7,6,0,8,3,3,5,5,3,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    6,6,0,8,3,3,5,5,4,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    6,6,0,8,3,3,5,5,3,2,2,2,3,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    6,6,0,8,3,3,5,5,4,2,2,2,5,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    2,6,2,6,3,3,3,3,2,2,2,2,4,4,4,4,
    2,6,0,6,4,4,4,4,2,5,2,5,5,5,5,5,
    2,6,2,6,3,3,3,3,2,2,2,2,4,4,4,4,
    2,5,0,5,4,4,4,4,2,4,2,4,4,4,4,4,
    2,6,2,8,3,3,5,5,2,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    2,6,2,8,3,3,5,5,2,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
];

/// Published instruction lengths in bytes.
#[rustfmt::skip]
const LENGTHS: [u8; 256] = [
    1,2,1,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
    3,2,1,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
    1,2,1,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
    1,2,1,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
    2,2,2,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
    2,2,2,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
    2,2,2,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
    2,2,2,2,2,2,2,2,1,2,1,2,3,3,3,3,
    2,2,1,2,2,2,2,2,1,3,1,3,3,3,3,3,
];

/// A status value under which `operation` (a branch) is not taken.
fn not_taken(operation: mos_6502::Operation) -> Status {
    let clear = Status(U);
    if effect::branch_taken(operation, clear) {
        Status(U | N | V | Z | C)
    } else {
        clear
    }
}

/// CPU about to execute `opcode` with operands that never cross a page.
fn prepared(opcode: u8, mem: &mut Memory) -> Mos6502 {
    // Operand $0010 / $10; the indirect pointer at $10 points to $0300.
    let mut cpu = setup_program(mem, &[opcode, 0x10, 0x00]);
    mem.write(0x0010, 0x00);
    mem.write(0x0011, 0x03);
    cpu.regs.x = 0;
    cpu.regs.y = 0;
    let instr = &TABLE[usize::from(opcode)];
    if instr.branch {
        cpu.regs.p = not_taken(instr.operation);
    }
    cpu
}

#[test]
fn descriptor_lengths_match_published_values() {
    for instr in &TABLE {
        assert_eq!(
            instr.bytes,
            LENGTHS[usize::from(instr.opcode)],
            "opcode {:02X}",
            instr.opcode
        );
    }
}

#[test]
fn every_opcode_takes_its_published_cycles() {
    for instr in &TABLE {
        if instr.access == Pattern::Halt {
            continue;
        }
        let mut mem = Memory::new();
        let mut cpu = prepared(instr.opcode, &mut mem);
        let cycles = run_instruction(&mut cpu, &mut mem);
        let expected = CYCLES[usize::from(instr.opcode)];
        assert_eq!(cycles, u32::from(expected), "opcode {:02X}", instr.opcode);
        assert_eq!(instr.cycles, expected, "descriptor {:02X}", instr.opcode);
    }
}

#[test]
fn straight_line_opcodes_advance_pc_by_their_length() {
    for instr in &TABLE {
        let straight = matches!(
            instr.access,
            Pattern::Internal
                | Pattern::Read
                | Pattern::Write
                | Pattern::ReadModifyWrite
                | Pattern::ReadModifyWriteRegister
                | Pattern::Push
                | Pattern::Pull
                | Pattern::Branch
        );
        if !straight {
            continue;
        }
        let mut mem = Memory::new();
        let mut cpu = prepared(instr.opcode, &mut mem);
        run_instruction(&mut cpu, &mut mem);
        assert_eq!(
            cpu.regs.pc,
            ORIGIN + u16::from(instr.bytes),
            "opcode {:02X}",
            instr.opcode
        );
    }
}

#[test]
fn indexed_reads_pay_one_cycle_for_a_page_crossing() {
    for instr in TABLE.iter().filter(|i| i.page_penalty) {
        let mut mem = Memory::new();
        // Base $02F0 (or pointer at $10 -> $02F0) plus $FF crosses.
        let mut cpu = setup_program(&mut mem, &[instr.opcode, 0xF0, 0x02]);
        mem.write(0x0010, 0xF0);
        mem.write(0x0011, 0x02);
        cpu.regs.x = 0xFF;
        cpu.regs.y = 0xFF;
        if instr.mode == mos_6502::AddressingMode::IndirectIndexed {
            mem.write(ORIGIN + 1, 0x10);
        }
        let cycles = run_instruction(&mut cpu, &mut mem);
        assert_eq!(
            cycles,
            u32::from(instr.cycles) + 1,
            "opcode {:02X}",
            instr.opcode
        );
    }
}

#[test]
fn indexed_stores_never_pay_extra() {
    let mut mem = Memory::new();
    let mut cpu = setup_program(&mut mem, &[0x9D, 0xF0, 0x02]); // STA $02F0,X
    cpu.regs.x = 0xFF;
    cpu.regs.a = 0x5A;
    assert_eq!(run_instruction(&mut cpu, &mut mem), 5);
    assert_eq!(mem.peek(0x03EF), 0x5A);
}

#[test]
fn beq_taken_across_page_costs_four_not_taken_two() {
    // BEQ at $02FD: the next instruction is at $02FF, target $030F.
    let mut mem = Memory::new();
    mem.load(0x02FD, &[0xF0, 0x10]).unwrap();

    let mut cpu = Mos6502::new();
    cpu.regs.pc = 0x02FD;
    cpu.regs.p.set(Z);
    assert_eq!(run_instruction(&mut cpu, &mut mem), 4);
    assert_eq!(cpu.regs.pc, 0x030F);

    let mut cpu = Mos6502::new();
    cpu.regs.pc = 0x02FD;
    cpu.regs.p.clear(Z);
    assert_eq!(run_instruction(&mut cpu, &mut mem), 2);
    assert_eq!(cpu.regs.pc, 0x02FF);
}

#[test]
fn branch_taken_within_page_costs_three() {
    let mut mem = Memory::new();
    let mut cpu = setup_program(&mut mem, &[0xD0, 0x02]); // BNE +2
    cpu.regs.p.clear(Z);
    assert_eq!(run_instruction(&mut cpu, &mut mem), 3);
    assert_eq!(cpu.regs.pc, 0x0204);
}

#[test]
fn absolute_x_read_crossing_page_reads_unfixed_address_first() {
    let mut bus = TraceBus::new();
    bus.mem.write(0x1101, 0x77);
    let mut cpu = setup_program(&mut bus.mem, &[0xBD, 0xF0, 0x10]); // LDA $10F0,X
    cpu.regs.x = 0x11;
    run_instruction(&mut cpu, &mut bus);

    assert_eq!(
        bus.log,
        vec![
            Access::Read(0x0200, 0xBD),
            Access::Read(0x0201, 0xF0),
            Access::Read(0x0202, 0x10),
            Access::Read(0x1001, 0x00),
            Access::Read(0x1101, 0x77),
        ]
    );
    assert_eq!(cpu.regs.a, 0x77);
}

#[test]
fn absolute_x_store_always_dummy_reads() {
    let mut bus = TraceBus::new();
    let mut cpu = setup_program(&mut bus.mem, &[0x9D, 0x00, 0x10]); // STA $1000,X
    cpu.regs.x = 0x01;
    cpu.regs.a = 0xAA;
    run_instruction(&mut cpu, &mut bus);

    assert_eq!(
        &bus.log[3..],
        &[Access::Read(0x1001, 0x00), Access::Write(0x1001, 0xAA)]
    );
}

#[test]
fn read_modify_write_writes_twice() {
    let mut bus = TraceBus::new();
    bus.mem.write(0x0040, 0x7F);
    let mut cpu = setup_program(&mut bus.mem, &[0xE6, 0x40]); // INC $40
    run_instruction(&mut cpu, &mut bus);

    assert_eq!(
        &bus.log[2..],
        &[
            Access::Read(0x0040, 0x7F),
            Access::Write(0x0040, 0x7F),
            Access::Write(0x0040, 0x80),
        ]
    );
    assert!(cpu.regs.p.is_set(N));
}

#[test]
fn indirect_indexed_store_reads_before_writing() {
    let mut bus = TraceBus::new();
    bus.mem.write(0x0080, 0xFF);
    bus.mem.write(0x0081, 0x20);
    let mut cpu = setup_program(&mut bus.mem, &[0x91, 0x80]); // STA ($80),Y
    cpu.regs.y = 0x02;
    cpu.regs.a = 0x33;
    assert_eq!(run_instruction(&mut cpu, &mut bus), 6);

    assert_eq!(
        &bus.log[2..],
        &[
            Access::Read(0x0080, 0xFF),
            Access::Read(0x0081, 0x20),
            Access::Read(0x2001, 0x00),
            Access::Write(0x2101, 0x33),
        ]
    );
}

#[test]
fn sha_page_crossing_corrupts_target_high_byte() {
    let mut bus = TraceBus::new();
    // SHA $12F0,Y with Y=$20: H+1 = $13, A & X & $13 = $12.
    let mut cpu = setup_program(&mut bus.mem, &[0x9F, 0xF0, 0x12]);
    cpu.regs.a = 0xFF;
    cpu.regs.x = 0x12;
    cpu.regs.y = 0x20;
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(bus.log.last(), Some(&Access::Write(0x1210, 0x12)));
}

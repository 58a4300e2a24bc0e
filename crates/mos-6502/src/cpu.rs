//! The execution engine.
//!
//! Each `tick()` performs exactly one bus access. Cycle 0 of every
//! instruction is the opcode fetch (or the dummy read that starts an
//! interrupt or reset); each later cycle runs the next micro-op of the
//! template for the decoded instruction.

use emu_core::{Bus, Cpu, Observable, Value};

use crate::flags::{C, D, I, N, V, Z};
use crate::template::{Index, MicroOp, template};
use crate::{AddressingMode, Instruction, Registers, decode, effect};

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

/// How the current instruction was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Opcode,
    Interrupt,
    Reset,
}

/// Result of running one micro-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Done,
}

/// Interrupt controller state, as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptState {
    Idle,
    /// An NMI edge has been latched but not yet polled.
    NmiDetected,
    /// The NMI will be serviced at the next instruction boundary.
    NmiPending,
    /// The IRQ will be serviced at the next instruction boundary.
    IrqPending,
    /// An interrupt or reset sequence is running.
    Servicing,
}

impl InterruptState {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            InterruptState::Idle => "idle",
            InterruptState::NmiDetected => "nmi-detected",
            InterruptState::NmiPending => "nmi-pending",
            InterruptState::IrqPending => "irq-pending",
            InterruptState::Servicing => "servicing",
        }
    }
}

/// The Ricoh 2A03's 6502 core.
#[derive(Debug, Clone)]
pub struct Mos6502 {
    pub regs: Registers,

    instruction: &'static Instruction,
    sequence: &'static [MicroOp],
    entry: Entry,
    /// 0 = opcode fetch; n = sequence[n - 1].
    step: u8,
    halted: bool,
    reset_pending: bool,

    /// Effective address under construction.
    addr: u16,
    /// Zero-page pointer for indirect modes.
    pointer: u8,
    /// Operand, modified byte, or branch offset.
    data: u8,
    /// High byte of the base address before indexing.
    base_high: u8,
    page_crossed: bool,
    vector: u16,

    nmi_line: bool,
    nmi_line_prev: bool,
    nmi_detected: bool,
    irq_line: bool,
    /// Interrupt wanted, sampled at the end of the latest cycle.
    poll_now: bool,
    /// The sample from the cycle before. Instruction boundaries act on this.
    poll_prev: bool,
    skip_poll: bool,

    total_cycles: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// A CPU ready to fetch at PC with post-reset registers. Useful for
    /// driving instructions directly.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registers(Registers::new())
    }

    /// A CPU at power-on. The first seven ticks run the reset sequence,
    /// which loads PC from $FFFC/$FFFD.
    #[must_use]
    pub fn power_on() -> Self {
        let mut cpu = Self::with_registers(Registers::power_on());
        cpu.reset_pending = true;
        cpu
    }

    fn with_registers(regs: Registers) -> Self {
        Self {
            regs,
            instruction: decode(0xEA),
            sequence: &[],
            entry: Entry::Opcode,
            step: 0,
            halted: false,
            reset_pending: false,
            addr: 0,
            pointer: 0,
            data: 0,
            base_high: 0,
            page_crossed: false,
            vector: IRQ_VECTOR,
            nmi_line: false,
            nmi_line_prev: false,
            nmi_detected: false,
            irq_line: false,
            poll_now: false,
            poll_prev: false,
            skip_poll: false,
            total_cycles: 0,
        }
    }

    /// True between instructions (the next tick is a fetch).
    #[must_use]
    pub fn is_instruction_complete(&self) -> bool {
        self.step == 0
    }

    /// Total cycles since construction.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Descriptor of the instruction in flight (or last completed).
    #[must_use]
    pub fn instruction(&self) -> &'static Instruction {
        self.instruction
    }

    #[must_use]
    pub fn interrupt_state(&self) -> InterruptState {
        if self.step != 0 && self.entry != Entry::Opcode {
            InterruptState::Servicing
        } else if self.nmi_detected && self.poll_now {
            InterruptState::NmiPending
        } else if self.nmi_detected {
            InterruptState::NmiDetected
        } else if self.poll_now {
            InterruptState::IrqPending
        } else {
            InterruptState::Idle
        }
    }

    fn step_cycle<B: Bus>(&mut self, bus: &mut B) {
        if self.halted {
            let _ = bus.read(self.regs.pc);
            return;
        }
        if self.step == 0 {
            self.begin(bus);
            return;
        }

        let op = self.sequence[usize::from(self.step - 1)];
        let flow = self.run(op, bus);
        if flow == Flow::Done || usize::from(self.step) >= self.sequence.len() {
            self.step = 0;
        } else {
            self.step += 1;
        }
    }

    /// Cycle 0: fetch an opcode, or start an interrupt/reset sequence.
    fn begin<B: Bus>(&mut self, bus: &mut B) {
        let entry = if self.reset_pending {
            Entry::Reset
        } else if self.poll_prev {
            Entry::Interrupt
        } else {
            Entry::Opcode
        };

        let pc = self.regs.pc;
        let opcode = bus.read(pc);
        self.instruction = match entry {
            Entry::Opcode => {
                self.regs.pc = pc.wrapping_add(1);
                decode(opcode)
            }
            // The fetched byte is discarded and BRK's shape is used.
            Entry::Interrupt | Entry::Reset => decode(0x00),
        };
        if entry == Entry::Reset {
            self.reset_pending = false;
            log::debug!("reset sequence started");
        }
        self.entry = entry;
        self.sequence = template(self.instruction.mode, self.instruction.access);
        self.step = 1;

        if log::log_enabled!(log::Level::Trace) && entry == Entry::Opcode {
            log::trace!(
                "{pc:04X} {:02X} {} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} S:{:02X}",
                opcode,
                self.instruction.operation.mnemonic(),
                self.regs.a,
                self.regs.x,
                self.regs.y,
                self.regs.p.0,
                self.regs.s,
            );
        }
    }

    fn fetch_pc<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    fn index(&self, index: Index) -> u8 {
        match index {
            Index::X => self.regs.x,
            Index::Y => self.regs.y,
        }
    }

    /// Combine a high byte with `low + index`, dropping the carry.
    fn index_absolute(&mut self, high: u8, low: u8, index: u8) {
        let (sum, carry) = low.overflowing_add(index);
        self.base_high = high;
        self.page_crossed = carry;
        self.addr = u16::from_le_bytes([sum, high]);
    }

    fn fix_address(&mut self) {
        if self.page_crossed {
            self.addr = self.addr.wrapping_add(0x0100);
        }
    }

    /// Stack write, or a read during the reset sequence (writes are
    /// suppressed there but S still moves).
    fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let addr = self.regs.push();
        if self.entry == Entry::Reset {
            let _ = bus.read(addr);
        } else {
            bus.write(addr, value);
        }
    }

    fn run<B: Bus>(&mut self, op: MicroOp, bus: &mut B) -> Flow {
        let operation = self.instruction.operation;

        match op {
            MicroOp::Internal => {
                let _ = bus.read(self.regs.pc);
                if self.instruction.mode == AddressingMode::Accumulator {
                    let value = self.regs.a;
                    self.regs.a = effect::modify(operation, &mut self.regs, value);
                } else {
                    effect::internal(operation, &mut self.regs);
                }
            }
            MicroOp::Immediate => {
                let value = self.fetch_pc(bus);
                effect::read(operation, &mut self.regs, value);
            }
            MicroOp::FetchAddressLow => {
                self.addr = u16::from(self.fetch_pc(bus));
            }
            MicroOp::FetchAddressHigh => {
                let high = self.fetch_pc(bus);
                self.addr |= u16::from(high) << 8;
            }
            MicroOp::FetchAddressHighIndexed(index) => {
                let high = self.fetch_pc(bus);
                let index = self.index(index);
                self.index_absolute(high, self.addr as u8, index);
            }
            MicroOp::FetchPointer => {
                self.pointer = self.fetch_pc(bus);
            }
            MicroOp::IndexZeroPage(index) => {
                let _ = bus.read(self.addr);
                self.addr = u16::from((self.addr as u8).wrapping_add(self.index(index)));
            }
            MicroOp::IndexPointer => {
                let _ = bus.read(u16::from(self.pointer));
                self.pointer = self.pointer.wrapping_add(self.regs.x);
            }
            MicroOp::ReadPointerLow => {
                self.addr = u16::from(bus.read(u16::from(self.pointer)));
            }
            MicroOp::ReadPointerHigh => {
                let high = bus.read(u16::from(self.pointer.wrapping_add(1)));
                self.addr |= u16::from(high) << 8;
            }
            MicroOp::ReadPointerHighIndexed => {
                let high = bus.read(u16::from(self.pointer.wrapping_add(1)));
                self.index_absolute(high, self.addr as u8, self.regs.y);
            }
            MicroOp::ReadIndexed => {
                let value = bus.read(self.addr);
                if !self.page_crossed {
                    effect::read(operation, &mut self.regs, value);
                    return Flow::Done;
                }
                self.fix_address();
            }
            MicroOp::DummyReadIndexed => {
                let _ = bus.read(self.addr);
                if effect::is_unstable_store(operation) {
                    // The value and address are settled by the store cycle.
                    return Flow::Next;
                }
                self.fix_address();
            }
            MicroOp::ReadOperand => {
                let value = bus.read(self.addr);
                effect::read(operation, &mut self.regs, value);
            }
            MicroOp::Store => {
                let value = effect::store(operation, &mut self.regs, self.base_high);
                if effect::is_unstable_store(operation) && self.page_crossed {
                    // The AND with H+1 leaks onto the address high byte.
                    self.addr = u16::from_le_bytes([self.addr as u8, value]);
                }
                bus.write(self.addr, value);
            }
            MicroOp::ReadModify => {
                self.data = bus.read(self.addr);
            }
            MicroOp::DummyWriteModify => {
                bus.write(self.addr, self.data);
                let (primary, _) = operation.pipeline();
                self.data = effect::modify(primary, &mut self.regs, self.data);
            }
            MicroOp::WriteModified => {
                if let (_, Some(secondary)) = operation.pipeline() {
                    effect::read(secondary, &mut self.regs, self.data);
                }
                bus.write(self.addr, self.data);
            }
            MicroOp::DummyReadPc => {
                let _ = bus.read(self.regs.pc);
            }
            MicroOp::DummyReadStack => {
                let _ = bus.read(self.regs.stack_addr());
            }
            MicroOp::PushRegister => {
                let value = effect::push_value(operation, &self.regs);
                self.push(bus, value);
            }
            MicroOp::PullRegister => {
                let addr = self.regs.pop();
                let value = bus.read(addr);
                effect::pull(operation, &mut self.regs, value);
            }
            MicroOp::PushPcHigh => {
                let [_, high] = self.regs.pc.to_le_bytes();
                self.push(bus, high);
            }
            MicroOp::PushPcLow => {
                let [low, _] = self.regs.pc.to_le_bytes();
                self.push(bus, low);
            }
            MicroOp::FetchHighAndJump => {
                let high = bus.read(self.regs.pc);
                self.regs.pc = u16::from_le_bytes([self.addr as u8, high]);
            }
            MicroOp::ReadIndirectLow => {
                self.data = bus.read(self.addr);
            }
            MicroOp::ReadIndirectHighAndJump => {
                let [low, high] = self.addr.to_le_bytes();
                let high = bus.read(u16::from_le_bytes([low.wrapping_add(1), high]));
                self.regs.pc = u16::from_le_bytes([self.data, high]);
            }
            MicroOp::PullPcLow => {
                let addr = self.regs.pop();
                self.data = bus.read(addr);
            }
            MicroOp::PullPcHigh => {
                let addr = self.regs.pop();
                let high = bus.read(addr);
                self.regs.pc = u16::from_le_bytes([self.data, high]);
            }
            MicroOp::IncrementPc => {
                let _ = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            MicroOp::ReadPadding => {
                let _ = bus.read(self.regs.pc);
                if self.entry == Entry::Opcode {
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
            }
            MicroOp::PushStatus => {
                let value = self.regs.p.pushed(self.entry == Entry::Opcode);
                self.vector = if self.entry == Entry::Reset {
                    RESET_VECTOR
                } else if self.nmi_detected {
                    self.nmi_detected = false;
                    NMI_VECTOR
                } else {
                    IRQ_VECTOR
                };
                self.push(bus, value);
            }
            MicroOp::ReadVectorLow => {
                self.data = bus.read(self.vector);
                self.regs.p.set(I);
            }
            MicroOp::ReadVectorHigh => {
                let high = bus.read(self.vector.wrapping_add(1));
                self.regs.pc = u16::from_le_bytes([self.data, high]);
                if self.entry != Entry::Opcode {
                    log::trace!("vectored through {:04X} to {:04X}", self.vector, self.regs.pc);
                }
            }
            MicroOp::FetchBranchOffset => {
                self.data = self.fetch_pc(bus);
                if !effect::branch_taken(operation, self.regs.p) {
                    return Flow::Done;
                }
            }
            MicroOp::BranchTaken => {
                let _ = bus.read(self.regs.pc);
                let target = self.regs.pc.wrapping_add_signed(i16::from(self.data as i8));
                let [low, _] = target.to_le_bytes();
                let [_, high] = self.regs.pc.to_le_bytes();
                if (target ^ self.regs.pc) & 0xFF00 == 0 {
                    self.regs.pc = target;
                    // A taken branch that stays on its page does not poll
                    // interrupts again.
                    self.skip_poll = true;
                    return Flow::Done;
                }
                self.addr = target;
                self.regs.pc = u16::from_le_bytes([low, high]);
            }
            MicroOp::BranchFixup => {
                let _ = bus.read(self.regs.pc);
                self.regs.pc = self.addr;
            }
            MicroOp::Jam => {
                let _ = bus.read(self.regs.pc);
                self.halted = true;
                log::error!(
                    "CPU jammed on opcode {:02X} at {:04X}",
                    self.instruction.opcode,
                    self.regs.pc.wrapping_sub(1)
                );
                return Flow::Done;
            }
        }
        Flow::Next
    }

    /// End-of-cycle bookkeeping: NMI edge detection and interrupt polling.
    fn end_cycle(&mut self) {
        if self.nmi_line && !self.nmi_line_prev {
            self.nmi_detected = true;
        }
        self.nmi_line_prev = self.nmi_line;

        if self.skip_poll {
            self.skip_poll = false;
        } else {
            self.poll_prev = self.poll_now;
        }
        self.poll_now = self.nmi_detected || (self.irq_line && !self.regs.p.is_set(I));
    }
}

impl Cpu for Mos6502 {
    type Registers = Registers;

    fn tick<B: Bus>(&mut self, bus: &mut B) {
        self.total_cycles += 1;
        self.step_cycle(bus);
        self.end_cycle();
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn set_nmi_line(&mut self, asserted: bool) {
        self.nmi_line = asserted;
    }

    fn set_irq_line(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    fn reset(&mut self) {
        self.reset_pending = true;
        self.halted = false;
        self.nmi_detected = false;
        self.step = 0;
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.0.into()),
            "flags.c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" => Some(self.regs.p.is_set(N).into()),
            "opcode" => Some(self.instruction.opcode.into()),
            "step" => Some(self.step.into()),
            "cycles" => Some(self.total_cycles.into()),
            "halted" => Some(self.halted.into()),
            "interrupt" => Some(self.interrupt_state().name().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "x", "y", "s", "p", "flags.c", "flags.z", "flags.i", "flags.d", "flags.v",
            "flags.n", "opcode", "step", "cycles", "halted", "interrupt",
        ]
    }
}

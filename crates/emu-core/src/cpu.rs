//! CPU core trait.

use crate::Bus;

/// A CPU core driven one bus cycle at a time.
///
/// The bus is borrowed for each tick rather than owned so the driver can
/// interleave other components between cycles.
///
/// Interrupt inputs are modelled as open-drain lines: `true` means some
/// device is pulling the line low (asserted).
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Advance the CPU by exactly one clock cycle.
    fn tick<B: Bus>(&mut self, bus: &mut B);

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU has locked up and no longer fetches.
    fn is_halted(&self) -> bool;

    /// Drive the non-maskable interrupt line.
    fn set_nmi_line(&mut self, asserted: bool);

    /// Drive the maskable interrupt request line.
    fn set_irq_line(&mut self, asserted: bool);

    /// Schedule the reset sequence. It runs on the following ticks.
    fn reset(&mut self);
}

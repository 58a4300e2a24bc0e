//! Byte-wide address bus.

/// A 16-bit address bus carrying 8-bit data.
///
/// The CPU performs exactly one `read` or `write` per cycle, so every call
/// is bus-observable. Implementations may have side effects on read
/// (register ports clear flags, data ports advance their address).
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}

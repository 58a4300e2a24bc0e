//! Core traits and types shared by the CPU and PPU engines.
//!
//! Every component advances one clock at a time. The driver decides the
//! ratio between components; nothing here runs on its own.

mod bus;
mod cpu;
mod memory;
mod observable;
mod timing;

pub use bus::Bus;
pub use cpu::Cpu;
pub use memory::{Memory, MemoryError, Shadow};
pub use observable::{Observable, Value};
pub use timing::{MasterClock, Tickable};

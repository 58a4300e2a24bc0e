//! Cycle-accurate NES, headless.
//!
//! The NTSC master clock ticks at 21,477,272 Hz. The PPU runs at
//! crystal/4 and the CPU at crystal/12, giving three PPU dots per CPU
//! cycle. `Nes::tick` advances one CPU cycle and the three dots that
//! follow it.
//!
//! One frame = 341 PPU dots x 262 scanlines = 89,342 dots (one fewer on
//! odd frames with rendering on).

mod bus;
pub mod capture;
mod cartridge;
mod config;
mod nes;

pub use cartridge::{Cartridge, CartridgeError};
pub use config::{NesConfig, NesRegion};
pub use nes::{Nes, NesError};

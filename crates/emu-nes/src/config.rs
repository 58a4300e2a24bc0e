//! NES configuration.

use emu_core::MasterClock;

/// Video region. Only NTSC timing is emulated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NesRegion {
    /// 60 Hz, 262 scanlines, 1,789,772 Hz CPU.
    #[default]
    Ntsc,
}

impl NesRegion {
    /// Master crystal frequency in Hz.
    #[must_use]
    pub const fn crystal_hz(self) -> u64 {
        match self {
            Self::Ntsc => 21_477_272,
        }
    }

    #[must_use]
    pub const fn master_clock(self) -> MasterClock {
        MasterClock::new(self.crystal_hz())
    }

    /// Crystal ticks per CPU cycle.
    #[must_use]
    pub const fn cpu_divider(self) -> u64 {
        match self {
            Self::Ntsc => 12,
        }
    }

    /// Crystal ticks per PPU dot.
    #[must_use]
    pub const fn ppu_divider(self) -> u64 {
        match self {
            Self::Ntsc => 4,
        }
    }

    /// PPU dots per CPU cycle.
    #[must_use]
    pub const fn dots_per_cpu_cycle(self) -> u64 {
        self.cpu_divider() / self.ppu_divider()
    }

    #[must_use]
    pub const fn cpu_hz(self) -> u64 {
        self.master_clock().divided(self.cpu_divider())
    }
}

/// NES configuration.
#[derive(Debug, Clone, Default)]
pub struct NesConfig {
    /// iNES file contents.
    pub rom_data: Vec<u8>,
    pub region: NesRegion,
}

impl NesConfig {
    #[must_use]
    pub fn new(rom_data: Vec<u8>) -> Self {
        Self {
            rom_data,
            region: NesRegion::default(),
        }
    }
}

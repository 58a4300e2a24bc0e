//! The PPU's 16 KiB address space.
//!
//! `$0000-$1FFF` pattern tables, `$2000-$2FFF` four nametables (mirrored
//! at `$3000-$3EFF`), `$3F00-$3F1F` palette RAM mirrored up to `$3FFF`.
//! Every access goes through `resolve`, so aliased addresses share one
//! backing byte.

/// Size of the video memory image handed to `Ppu::new`.
pub const VIDEO_MEMORY_SIZE: usize = 0x4000;

/// How the four logical nametables map onto storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mirroring {
    /// All four nametables distinct.
    #[default]
    FourScreen,
    /// $2000=$2400, $2800=$2C00 (vertical scrolling games).
    Horizontal,
    /// $2000=$2800, $2400=$2C00 (horizontal scrolling games).
    Vertical,
}

impl Mirroring {
    fn fold(self, offset: u16) -> u16 {
        match self {
            Mirroring::FourScreen => offset,
            Mirroring::Horizontal => offset & !0x0400,
            Mirroring::Vertical => offset & !0x0800,
        }
    }
}

pub(crate) struct VideoMemory {
    bytes: Vec<u8>,
    mirroring: Mirroring,
    /// False for CHR-ROM boards: pattern table writes are dropped.
    pattern_writable: bool,
}

impl VideoMemory {
    /// `bytes` must already be `VIDEO_MEMORY_SIZE` long.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mirroring: Mirroring::default(),
            pattern_writable: true,
        }
    }

    pub fn set_pattern_writable(&mut self, writable: bool) {
        self.pattern_writable = writable;
    }

    pub fn pattern_writable(&self) -> bool {
        self.pattern_writable
    }

    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn read(&self, address: u16) -> u8 {
        self.bytes[self.resolve(address)]
    }

    pub fn write(&mut self, address: u16, value: u8) {
        if !self.pattern_writable && address & 0x3FFF < 0x2000 {
            log::warn!("write ${value:02X} to CHR-ROM ${:04X} ignored", address & 0x3FFF);
            return;
        }
        let index = self.resolve(address);
        self.bytes[index] = value;
    }

    fn resolve(&self, address: u16) -> usize {
        let address = address & 0x3FFF;
        let resolved = match address {
            0x0000..=0x1FFF => address,
            0x2000..=0x3EFF => 0x2000 | self.mirroring.fold(address & 0x0FFF),
            _ => 0x3F00 | palette_offset(address),
        };
        usize::from(resolved)
    }
}

/// $3F10/$3F14/$3F18/$3F1C are the same bytes as $3F00/$3F04/$3F08/$3F0C.
fn palette_offset(address: u16) -> u16 {
    let offset = address & 0x1F;
    if offset & 0x13 == 0x10 {
        offset & 0x0F
    } else {
        offset
    }
}

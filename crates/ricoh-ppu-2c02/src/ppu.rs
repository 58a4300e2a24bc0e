//! The dot clock, pixel compositing and the CPU register port.

use emu_core::{Observable, Shadow, Tickable, Value};

use crate::PpuError;
use crate::background::{Background, attribute_address, attribute_shift, nametable_address};
use crate::palette::colour;
use crate::registers::{Ctrl, Mask, status};
use crate::scroll::Scroll;
use crate::sprites::Sprites;
use crate::vram::{Mirroring, VIDEO_MEMORY_SIZE, VideoMemory};

/// Framebuffer dimensions.
pub const FB_WIDTH: u32 = 256;
pub const FB_HEIGHT: u32 = 240;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
pub const VBLANK_SCANLINE: u16 = 241;
pub const PRE_RENDER_SCANLINE: u16 = 261;

const LAST_VISIBLE_SCANLINE: u16 = 239;
const LAST_DOT: u16 = DOTS_PER_SCANLINE - 1;

const QUERY_PATHS: &[&str] = &[
    "scanline", "dot", "frame", "v", "t", "fine_x", "w", "ctrl", "mask", "status", "oam_addr",
    "fetches",
];

/// Ricoh 2C02.
pub struct Ppu {
    vram: VideoMemory,
    palette: [u32; 64],
    oam_addr: u8,
    sprites: Sprites,

    ctrl: Ctrl,
    mask: Mask,
    status: u8,
    scroll: Scroll,

    /// PPUDATA read buffer.
    read_buffer: u8,
    /// Last value driven on the CPU-facing data bus.
    io_latch: u8,
    /// PPUSTATUS was read on the dot before vblank.
    suppress_vblank: bool,

    scanline: u16,
    dot: u16,
    frame: u64,
    fetches: u64,

    background: Background,
    framebuffer: Vec<u32>,
}

impl Ppu {
    /// Build a PPU over a 16 KiB video memory image and a 64-colour palette.
    ///
    /// The dot clock starts at scanline 0, dot 0 of frame 0.
    pub fn new(vram: Vec<u8>, palette: &[u32]) -> Result<Self, PpuError> {
        if vram.len() != VIDEO_MEMORY_SIZE {
            return Err(PpuError::VideoMemorySize { len: vram.len() });
        }
        let palette: [u32; 64] = palette
            .try_into()
            .map_err(|_| PpuError::PaletteSize { len: palette.len() })?;

        Ok(Self {
            vram: VideoMemory::new(vram),
            palette,
            oam_addr: 0,
            sprites: Sprites::default(),

            ctrl: Ctrl::default(),
            mask: Mask::default(),
            status: 0,
            scroll: Scroll::default(),

            read_buffer: 0,
            io_latch: 0,
            suppress_vblank: false,

            scanline: 0,
            dot: 0,
            frame: 0,
            fetches: 0,

            background: Background::default(),
            framebuffer: vec![0; (FB_WIDTH * FB_HEIGHT) as usize],
        })
    }

    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.vram.set_mirroring(mirroring);
    }

    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.vram.mirroring()
    }

    /// Whether `$0000-$1FFF` accepts writes (CHR-RAM). Defaults to true;
    /// clear it for CHR-ROM.
    pub fn set_pattern_writable(&mut self, writable: bool) {
        self.vram.set_pattern_writable(writable);
    }

    #[must_use]
    pub fn pattern_writable(&self) -> bool {
        self.vram.pattern_writable()
    }

    /// One PPU dot.
    pub fn tick(&mut self) {
        match self.scanline {
            0..=LAST_VISIBLE_SCANLINE => self.visible_dot(),
            PRE_RENDER_SCANLINE => self.pre_render_dot(),
            VBLANK_SCANLINE if self.dot == 1 => self.enter_vblank(),
            _ => {}
        }

        self.dot += 1;
        if self.dot > LAST_DOT {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline == SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame += 1;
            }
        }
    }

    fn visible_dot(&mut self) {
        if !self.mask.rendering() {
            if (1..=256).contains(&self.dot) {
                self.output_backdrop();
            }
            return;
        }

        if (1..=256).contains(&self.dot) {
            self.render_pixel();
            self.sprites.advance();
            if self
                .sprites
                .evaluate(self.dot, self.scanline, self.ctrl.sprite_height())
            {
                self.status |= status::OVERFLOW;
            }
        }
        self.sprite_fetch_dot();
        self.background_dot();
    }

    fn pre_render_dot(&mut self) {
        if self.dot == 1 {
            self.status &= !(status::VBLANK | status::SPRITE_ZERO_HIT | status::OVERFLOW);
            self.sprites.clear_found();
        }
        if !self.mask.rendering() {
            return;
        }

        self.sprite_fetch_dot();
        self.background_dot();

        if self.dot == LAST_DOT - 1 && self.frame % 2 == 1 {
            self.dot = LAST_DOT;
        }
    }

    fn enter_vblank(&mut self) {
        if self.suppress_vblank {
            self.suppress_vblank = false;
            log::trace!("frame {}: vblank suppressed by status read", self.frame);
            return;
        }
        self.status |= status::VBLANK;
        log::trace!("frame {}: vblank", self.frame);
    }

    /// A rendering-pipeline read: counted, no side effects on registers.
    fn fetch(&mut self, address: u16) -> u8 {
        self.fetches += 1;
        self.vram.read(address)
    }

    fn background_dot(&mut self) {
        match self.dot {
            1..=256 | 321..=336 => {
                self.background_fetch();
                self.background.shift();
            }
            // Two unused nametable fetches end every rendering line.
            337 | 339 => {
                self.fetch(nametable_address(self.scroll.v));
            }
            _ => {}
        }

        match self.dot {
            256 => self.scroll.increment_y(),
            257 => self.scroll.copy_horizontal(),
            280..=304 if self.scanline == PRE_RENDER_SCANLINE => self.scroll.copy_vertical(),
            _ => {}
        }
    }

    /// Eight-dot fetch group: each fetch holds the bus for two dots and
    /// reads on the first.
    fn background_fetch(&mut self) {
        let v = self.scroll.v;
        match (self.dot - 1) & 0x07 {
            0 => {
                if self.dot != 321 {
                    self.background.reload();
                }
                self.background.next_tile = self.fetch(nametable_address(v));
            }
            2 => {
                let byte = self.fetch(attribute_address(v));
                self.background.next_attrib = (byte >> attribute_shift(v)) & 0x03;
            }
            4 => {
                let address = self.background_pattern_address();
                self.background.next_lo = self.fetch(address);
            }
            6 => {
                let address = self.background_pattern_address() + 8;
                self.background.next_hi = self.fetch(address);
            }
            7 => self.scroll.increment_x(),
            _ => {}
        }
    }

    fn background_pattern_address(&self) -> u16 {
        self.ctrl.background_table()
            + u16::from(self.background.next_tile) * 16
            + self.scroll.fine_y()
    }

    /// Dots 257-320: two dummy nametable reads then both pattern planes per slot.
    fn sprite_fetch_dot(&mut self) {
        if !(257..=320).contains(&self.dot) {
            return;
        }
        self.oam_addr = 0;
        if self.dot == 257 {
            self.sprites.begin_fetch();
        }

        let slot = usize::from((self.dot - 257) / 8);
        match (self.dot - 257) & 0x07 {
            0 | 2 => {
                self.fetch(nametable_address(self.scroll.v));
            }
            4 => {
                let address = self.sprites.pattern_address(slot, self.scanline, self.ctrl);
                let lo = self.fetch(address);
                self.sprites.set_pattern_lo(slot, lo);
            }
            6 => {
                let address = self.sprites.pattern_address(slot, self.scanline, self.ctrl) + 8;
                let hi = self.fetch(address);
                self.sprites.finish_slot(slot, hi);
            }
            _ => {}
        }
    }

    fn render_pixel(&mut self) {
        let x = self.dot - 1;

        let (bg_pixel, bg_palette) =
            if self.mask.background() && (x >= 8 || self.mask.background_left()) {
                self.background.pixel(self.scroll.fine_x)
            } else {
                (0, 0)
            };
        let sprite = if self.mask.sprites() && (x >= 8 || self.mask.sprites_left()) {
            self.sprites.pixel()
        } else {
            None
        };

        let (pixel, palette) = match sprite {
            None => (bg_pixel, bg_palette),
            Some(sp) if bg_pixel == 0 => (sp.pixel, sp.palette),
            Some(sp) => {
                if sp.sprite_zero && x != 255 {
                    self.status |= status::SPRITE_ZERO_HIT;
                }
                if sp.behind_background {
                    (bg_pixel, bg_palette)
                } else {
                    (sp.pixel, sp.palette)
                }
            }
        };

        // Colour 0 of every group is the shared backdrop at $3F00.
        let address = if pixel == 0 {
            0x3F00
        } else {
            0x3F00 | (u16::from(palette) << 2) | u16::from(pixel)
        };
        self.put_pixel(x, self.vram.read(address));
    }

    /// Rendering off: the backdrop, unless v points into palette RAM.
    fn output_backdrop(&mut self) {
        let v = self.scroll.v & 0x3FFF;
        let address = if v >= 0x3F00 { v } else { 0x3F00 };
        self.put_pixel(self.dot - 1, self.vram.read(address));
    }

    fn put_pixel(&mut self, x: u16, index: u8) {
        let offset = usize::from(self.scanline) * FB_WIDTH as usize + usize::from(x);
        self.framebuffer[offset] = colour(&self.palette, index, self.mask);
    }

    /// Visible or pre-render line with rendering on.
    fn rendering_active(&self) -> bool {
        self.mask.rendering()
            && (self.scanline <= LAST_VISIBLE_SCANLINE || self.scanline == PRE_RENDER_SCANLINE)
    }

    // === CPU register port ===

    /// CPU read of `$2000-$3FFF` (the register is `address & 7`).
    pub fn read_register(&mut self, address: u16) -> u8 {
        let value = match address & 0x07 {
            2 => self.read_status(),
            4 => self.read_oam_data(),
            7 => self.read_data(),
            // Write-only registers float; the latch still holds the last value.
            _ => self.io_latch,
        };
        self.io_latch = value;
        value
    }

    /// CPU write to `$2000-$3FFF`.
    pub fn write_register(&mut self, address: u16, value: u8) {
        self.io_latch = value;
        match address & 0x07 {
            0 => {
                let ctrl = Ctrl(value);
                if ctrl.nmi_enabled() != self.ctrl.nmi_enabled() {
                    log::debug!("NMI output {}", if ctrl.nmi_enabled() { "on" } else { "off" });
                }
                self.ctrl = ctrl;
                self.scroll.write_nametable(ctrl.nametable());
            }
            1 => {
                let mask = Mask(value);
                if mask.rendering() != self.mask.rendering() {
                    log::debug!(
                        "rendering {} at scanline {} dot {}",
                        if mask.rendering() { "enabled" } else { "disabled" },
                        self.scanline,
                        self.dot
                    );
                }
                self.mask = mask;
            }
            2 => {}
            3 => self.oam_addr = value,
            4 => self.write_oam_data(value),
            5 => self.scroll.write_scroll(value),
            6 => self.scroll.write_address(value),
            _ => {
                self.vram.write(self.scroll.v & 0x3FFF, value);
                self.advance_data_address();
            }
        }
    }

    fn read_status(&mut self) -> u8 {
        let result = (self.status & 0xE0) | (self.io_latch & 0x1F);
        self.status &= !status::VBLANK;
        self.scroll.w = false;
        if self.scanline == VBLANK_SCANLINE && self.dot == 1 {
            self.suppress_vblank = true;
        }
        result
    }

    fn read_oam_data(&self) -> u8 {
        // Secondary OAM clear drives $FF onto the OAM data bus.
        if self.rendering_active()
            && self.scanline <= LAST_VISIBLE_SCANLINE
            && (1..=64).contains(&self.dot)
        {
            return 0xFF;
        }
        self.sprites.oam[usize::from(self.oam_addr)]
    }

    fn write_oam_data(&mut self, value: u8) {
        if self.rendering_active() {
            // Writes are dropped; the address glitches up by one sprite.
            self.oam_addr = self.oam_addr.wrapping_add(4);
            return;
        }
        self.write_oam(self.oam_addr, value);
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    fn read_data(&mut self) -> u8 {
        let address = self.scroll.v & 0x3FFF;
        let result = if address >= 0x3F00 {
            // Palette reads bypass the buffer, which picks up the nametable byte underneath.
            self.read_buffer = self.vram.read(address - 0x1000);
            (self.vram.read(address) & 0x3F) | (self.io_latch & 0xC0)
        } else {
            let fetched = self.vram.read(address);
            std::mem::replace(&mut self.read_buffer, fetched)
        };
        self.advance_data_address();
        result
    }

    fn advance_data_address(&mut self) {
        if self.rendering_active() {
            self.scroll.increment_x();
            self.scroll.increment_y();
        } else {
            self.scroll.v = self.scroll.v.wrapping_add(self.ctrl.increment()) & 0x7FFF;
        }
    }

    // === Direct access ===

    /// Store into primary OAM. Attribute bits 2-4 do not exist.
    pub fn write_oam(&mut self, offset: u8, value: u8) {
        let value = if offset & 0x03 == 2 { value & 0xE3 } else { value };
        self.sprites.oam[usize::from(offset)] = value;
    }

    #[must_use]
    pub fn read_oam(&self, offset: u8) -> u8 {
        self.sprites.oam[usize::from(offset)]
    }

    /// Read video memory without touching the PPUDATA buffer or counters.
    #[must_use]
    pub fn peek_vram(&self, address: u16) -> u8 {
        self.vram.read(address)
    }

    /// The current frame, ARGB32, 256x240.
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    /// True while vblank is flagged and PPUCTRL enables NMI output.
    /// The NMI line is the inverse of this level.
    #[must_use]
    pub fn nmi_asserted(&self) -> bool {
        self.status & status::VBLANK != 0 && self.ctrl.nmi_enabled()
    }

    #[must_use]
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    #[must_use]
    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Completed frames since power-on.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Rendering-pipeline memory fetches since power-on.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    /// PPUSTATUS without the read side effects.
    #[must_use]
    pub fn status(&self) -> u8 {
        self.status
    }

    #[must_use]
    pub fn ctrl(&self) -> Ctrl {
        self.ctrl
    }

    #[must_use]
    pub fn mask(&self) -> Mask {
        self.mask
    }

    #[must_use]
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }
}

impl Tickable for Ppu {
    fn tick(&mut self) {
        Ppu::tick(self);
    }
}

impl Shadow for Ppu {
    fn read(&mut self, address: u16) -> u8 {
        self.read_register(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.write_register(address, value);
    }
}

impl Observable for Ppu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "scanline" => Some(self.scanline.into()),
            "dot" => Some(self.dot.into()),
            "frame" => Some(self.frame.into()),
            "v" => Some(self.scroll.v.into()),
            "t" => Some(self.scroll.t.into()),
            "fine_x" => Some(self.scroll.fine_x.into()),
            "w" => Some(self.scroll.w.into()),
            "ctrl" => Some(self.ctrl.0.into()),
            "mask" => Some(self.mask.0.into()),
            "status" => Some(self.status.into()),
            "oam_addr" => Some(self.oam_addr.into()),
            "fetches" => Some(self.fetches.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}

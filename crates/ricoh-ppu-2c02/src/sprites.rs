//! Sprite evaluation and the eight per-line sprite slots.
//!
//! Evaluation runs one dot at a time on visible lines, exactly as the
//! hardware interleaves it with background fetches:
//!
//! - dots 1-64: secondary OAM is filled with `$FF`, one byte every two dots
//! - dots 65-256: primary OAM is scanned, reading on odd dots and acting on
//!   even dots; in-range sprites are copied to secondary OAM
//! - dots 257-320: the found sprites' patterns are fetched into the slots
//!   that draw the next line
//!
//! Once eight sprites are found the scan keeps looking for a ninth to set
//! the overflow flag, but on every miss it advances the byte offset `m`
//! along with the sprite index `n`. From then on it compares tile, attribute
//! and X bytes as if they were Y coordinates, which both misses real
//! overflows and reports false ones.

use crate::registers::Ctrl;

pub(crate) const OAM_SIZE: usize = 256;
const SECONDARY_OAM_SIZE: usize = 32;
pub(crate) const SLOTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Copying in-range sprites into secondary OAM.
    Fill,
    /// Eight found; scanning (diagonally) for a ninth.
    CheckOverflow,
    /// All 64 sprites visited.
    Done,
}

/// One sprite drawing on the current line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SpriteSlot {
    /// Dots left before the sprite starts shifting out.
    pub x_counter: u8,
    pub pattern_lo: u8,
    pub pattern_hi: u8,
    /// Palette group 4-7.
    pub palette: u8,
    pub flip_h: bool,
    pub behind_background: bool,
}

impl SpriteSlot {
    fn pixel(&self) -> u8 {
        if self.x_counter != 0 {
            return 0;
        }
        let (lo, hi) = if self.flip_h {
            (self.pattern_lo & 1, self.pattern_hi & 1)
        } else {
            (self.pattern_lo >> 7, self.pattern_hi >> 7)
        };
        (hi << 1) | lo
    }

    fn advance(&mut self) {
        if self.x_counter > 0 {
            self.x_counter -= 1;
        } else if self.flip_h {
            self.pattern_lo >>= 1;
            self.pattern_hi >>= 1;
        } else {
            self.pattern_lo <<= 1;
            self.pattern_hi <<= 1;
        }
    }
}

/// The opaque sprite pixel that wins at the current dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpritePixel {
    pub pixel: u8,
    pub palette: u8,
    pub behind_background: bool,
    pub sprite_zero: bool,
}

pub(crate) struct Sprites {
    pub oam: [u8; OAM_SIZE],
    secondary: [u8; SECONDARY_OAM_SIZE],
    phase: Phase,
    /// Sprite index 0-63.
    n: u8,
    /// Byte within the sprite, 0-3.
    m: u8,
    /// Sprites copied to secondary OAM this line.
    found: u8,
    /// Byte read on the last odd dot.
    latch: u8,
    zero_found: bool,
    slots: [SpriteSlot; SLOTS],
    /// Slot 0 holds sprite 0 on the line being drawn.
    zero_in_slots: bool,
}

impl Default for Sprites {
    fn default() -> Self {
        Self {
            oam: [0; OAM_SIZE],
            secondary: [0xFF; SECONDARY_OAM_SIZE],
            phase: Phase::Done,
            n: 0,
            m: 0,
            found: 0,
            latch: 0,
            zero_found: false,
            slots: [SpriteSlot::default(); SLOTS],
            zero_in_slots: false,
        }
    }
}

impl Sprites {
    /// One dot of clear/evaluate on a visible line. Returns true when the
    /// overflow condition trips on this dot.
    pub fn evaluate(&mut self, dot: u16, scanline: u16, height: u16) -> bool {
        match dot {
            1..=64 => {
                if dot % 2 == 0 {
                    self.secondary[usize::from(dot / 2 - 1)] = 0xFF;
                }
                false
            }
            65..=256 => {
                if dot == 65 {
                    self.begin_scan();
                }
                if dot % 2 == 1 {
                    self.latch = self.oam[usize::from(self.n) * 4 + usize::from(self.m)];
                    false
                } else {
                    self.scan_step(scanline, height)
                }
            }
            _ => false,
        }
    }

    /// Forget the last evaluation. The pre-render line fetches no sprites.
    pub fn clear_found(&mut self) {
        self.found = 0;
        self.zero_found = false;
    }

    fn begin_scan(&mut self) {
        self.phase = Phase::Fill;
        self.n = 0;
        self.m = 0;
        self.found = 0;
        self.zero_found = false;
    }

    fn scan_step(&mut self, scanline: u16, height: u16) -> bool {
        let in_range = scanline.wrapping_sub(u16::from(self.latch)) < height;
        match self.phase {
            Phase::Fill => {
                // Y is copied even when out of range; the next sprite overwrites it.
                self.secondary[usize::from(self.found) * 4 + usize::from(self.m)] = self.latch;
                if self.m == 0 && !in_range {
                    self.next_sprite();
                } else {
                    if self.m == 0 && self.n == 0 {
                        self.zero_found = true;
                    }
                    self.m += 1;
                    if self.m == 4 {
                        self.m = 0;
                        self.found += 1;
                        self.next_sprite();
                    }
                }
                false
            }
            Phase::CheckOverflow => {
                if in_range {
                    self.phase = Phase::Done;
                    return true;
                }
                self.m = (self.m + 1) & 3;
                self.next_sprite();
                false
            }
            Phase::Done => false,
        }
    }

    fn next_sprite(&mut self) {
        self.n += 1;
        if self.n == 64 {
            self.n = 0;
            self.phase = Phase::Done;
        } else if self.phase == Phase::Fill && usize::from(self.found) == SLOTS {
            self.phase = Phase::CheckOverflow;
        }
    }

    /// Latch what evaluation found for the slots about to be fetched.
    pub fn begin_fetch(&mut self) {
        self.zero_in_slots = self.zero_found;
    }

    /// Pattern-table address of the low plane for `slot` on `scanline`.
    /// Empty slots address tile $FF like the hardware's dummy fetch.
    pub fn pattern_address(&self, slot: usize, scanline: u16, ctrl: Ctrl) -> u16 {
        let entry = &self.secondary[slot * 4..slot * 4 + 4];
        let height = ctrl.sprite_height();
        let mut row = scanline.wrapping_sub(u16::from(entry[0])) & (height - 1);
        if entry[2] & 0x80 != 0 {
            row = height - 1 - row;
        }
        let tile = entry[1];
        if height == 16 {
            // 8x16: bit 0 picks the table, the pair starts at the even tile.
            let table = u16::from(tile & 0x01) * 0x1000;
            let tile = u16::from(tile & 0xFE) + (row >> 3);
            table + tile * 16 + (row & 0x07)
        } else {
            ctrl.sprite_table() + u16::from(tile) * 16 + row
        }
    }

    pub fn set_pattern_lo(&mut self, slot: usize, lo: u8) {
        self.slots[slot].pattern_lo = lo;
    }

    /// Finish `slot` with its high plane and attributes from secondary OAM.
    pub fn finish_slot(&mut self, slot: usize, hi: u8) {
        if slot >= usize::from(self.found) {
            self.slots[slot] = SpriteSlot::default();
            return;
        }
        let attributes = self.secondary[slot * 4 + 2];
        let target = &mut self.slots[slot];
        target.pattern_hi = hi;
        target.x_counter = self.secondary[slot * 4 + 3];
        target.palette = 4 + (attributes & 0x03);
        target.flip_h = attributes & 0x40 != 0;
        target.behind_background = attributes & 0x20 != 0;
    }

    /// First opaque slot at this dot; lower slots win.
    pub fn pixel(&self) -> Option<SpritePixel> {
        self.slots.iter().enumerate().find_map(|(i, slot)| {
            let pixel = slot.pixel();
            (pixel != 0).then_some(SpritePixel {
                pixel,
                palette: slot.palette,
                behind_background: slot.behind_background,
                sprite_zero: i == 0 && self.zero_in_slots,
            })
        })
    }

    /// Count down or shift every slot by one dot.
    pub fn advance(&mut self) {
        for slot in &mut self.slots {
            slot.advance();
        }
    }

    #[cfg(test)]
    fn secondary(&self) -> &[u8; SECONDARY_OAM_SIZE] {
        &self.secondary
    }
}

//! Background tile pipeline: fetch latches and the 16-bit shifters.

/// Nametable byte for the tile `v` points at.
pub(crate) fn nametable_address(v: u16) -> u16 {
    0x2000 | (v & 0x0FFF)
}

/// Attribute byte covering the 4x4-tile block that holds `v`'s tile.
pub(crate) fn attribute_address(v: u16) -> u16 {
    0x23C0 | (v & 0x0C00) | ((v >> 4) & 0x38) | ((v >> 2) & 0x07)
}

/// Shift that brings this tile's 2x2 quadrant to the bottom of the attribute byte.
pub(crate) fn attribute_shift(v: u16) -> u8 {
    (((v >> 4) & 0x04) | (v & 0x02)) as u8
}

#[derive(Debug, Default)]
pub(crate) struct Background {
    pattern_lo: u16,
    pattern_hi: u16,
    attrib_lo: u16,
    attrib_hi: u16,
    pub next_tile: u8,
    pub next_attrib: u8,
    pub next_lo: u8,
    pub next_hi: u8,
}

impl Background {
    /// Move the fetched tile into the low byte of each shifter.
    pub fn reload(&mut self) {
        self.pattern_lo = (self.pattern_lo & 0xFF00) | u16::from(self.next_lo);
        self.pattern_hi = (self.pattern_hi & 0xFF00) | u16::from(self.next_hi);

        let fill = |bit: u8| if self.next_attrib & bit != 0 { 0x00FF } else { 0 };
        let attrib_lo = fill(0x01);
        let attrib_hi = fill(0x02);
        self.attrib_lo = (self.attrib_lo & 0xFF00) | attrib_lo;
        self.attrib_hi = (self.attrib_hi & 0xFF00) | attrib_hi;
    }

    pub fn shift(&mut self) {
        self.pattern_lo <<= 1;
        self.pattern_hi <<= 1;
        self.attrib_lo <<= 1;
        self.attrib_hi <<= 1;
    }

    /// Two-bit pixel and two-bit palette at the fine-X tap.
    pub fn pixel(&self, fine_x: u8) -> (u8, u8) {
        let tap = 0x8000 >> fine_x;
        let bit = |shifter: u16| u8::from(shifter & tap != 0);
        let pixel = (bit(self.pattern_hi) << 1) | bit(self.pattern_lo);
        let palette = (bit(self.attrib_hi) << 1) | bit(self.attrib_lo);
        (pixel, palette)
    }
}

//! PPUCTRL, PPUMASK and PPUSTATUS bit layouts.

/// PPUCTRL ($2000).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ctrl(pub u8);

impl Ctrl {
    /// Base nametable select, bits 0-1.
    #[must_use]
    pub fn nametable(self) -> u8 {
        self.0 & 0x03
    }

    /// PPUDATA address step: 1 across, 32 down.
    #[must_use]
    pub fn increment(self) -> u16 {
        if self.0 & 0x04 != 0 { 32 } else { 1 }
    }

    /// Pattern table for 8x8 sprites.
    #[must_use]
    pub fn sprite_table(self) -> u16 {
        if self.0 & 0x08 != 0 { 0x1000 } else { 0 }
    }

    #[must_use]
    pub fn background_table(self) -> u16 {
        if self.0 & 0x10 != 0 { 0x1000 } else { 0 }
    }

    #[must_use]
    pub fn sprite_height(self) -> u16 {
        if self.0 & 0x20 != 0 { 16 } else { 8 }
    }

    #[must_use]
    pub fn nmi_enabled(self) -> bool {
        self.0 & 0x80 != 0
    }
}

/// PPUMASK ($2001).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mask(pub u8);

impl Mask {
    #[must_use]
    pub fn greyscale(self) -> bool {
        self.0 & 0x01 != 0
    }

    /// Background visible in the leftmost 8 pixels.
    #[must_use]
    pub fn background_left(self) -> bool {
        self.0 & 0x02 != 0
    }

    /// Sprites visible in the leftmost 8 pixels.
    #[must_use]
    pub fn sprites_left(self) -> bool {
        self.0 & 0x04 != 0
    }

    #[must_use]
    pub fn background(self) -> bool {
        self.0 & 0x08 != 0
    }

    #[must_use]
    pub fn sprites(self) -> bool {
        self.0 & 0x10 != 0
    }

    /// Either layer on. Fetches, scroll updates and evaluation run only then.
    #[must_use]
    pub fn rendering(self) -> bool {
        self.0 & 0x18 != 0
    }

    /// Emphasis bits 5-7 shifted down (bit 0 red, 1 green, 2 blue).
    #[must_use]
    pub fn emphasis(self) -> u8 {
        self.0 >> 5
    }
}

/// PPUSTATUS ($2002) flags. The low five bits are not driven.
pub(crate) mod status {
    pub const OVERFLOW: u8 = 0x20;
    pub const SPRITE_ZERO_HIT: u8 = 0x40;
    pub const VBLANK: u8 = 0x80;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_fields() {
        let ctrl = Ctrl(0b1011_1110);
        assert_eq!(ctrl.nametable(), 2);
        assert_eq!(ctrl.increment(), 32);
        assert_eq!(ctrl.sprite_table(), 0x1000);
        assert_eq!(ctrl.background_table(), 0x1000);
        assert_eq!(ctrl.sprite_height(), 16);
        assert!(ctrl.nmi_enabled());

        let ctrl = Ctrl(0);
        assert_eq!(ctrl.increment(), 1);
        assert_eq!(ctrl.sprite_height(), 8);
        assert!(!ctrl.nmi_enabled());
    }

    #[test]
    fn rendering_means_either_layer() {
        assert!(!Mask(0x06).rendering());
        assert!(Mask(0x08).rendering());
        assert!(Mask(0x10).rendering());
        assert_eq!(Mask(0xA0).emphasis(), 0b101);
    }
}

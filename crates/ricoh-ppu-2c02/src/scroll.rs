//! Internal scroll/address registers.
//!
//! `v` and `t` share one layout:
//!
//! ```text
//! yyy NN YYYYY XXXXX
//! ||| || ||||| +++++-- coarse X
//! ||| || +++++-------- coarse Y
//! ||| ++-------------- nametable select
//! +++----------------- fine Y
//! ```
//!
//! Fine X lives in its own three-bit register. `w` is the shared first/second
//! write toggle for PPUSCROLL and PPUADDR.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Scroll {
    pub v: u16,
    pub t: u16,
    pub fine_x: u8,
    pub w: bool,
}

impl Scroll {
    pub fn fine_y(&self) -> u16 {
        (self.v >> 12) & 0x07
    }

    /// PPUCTRL write: nametable select into t bits 10-11.
    pub fn write_nametable(&mut self, select: u8) {
        self.t = (self.t & !0x0C00) | (u16::from(select & 0x03) << 10);
    }

    /// PPUSCROLL write.
    pub fn write_scroll(&mut self, value: u8) {
        if self.w {
            self.t = (self.t & !0x73E0) | (u16::from(value & 0x07) << 12) | (u16::from(value >> 3) << 5);
        } else {
            self.t = (self.t & !0x001F) | u16::from(value >> 3);
            self.fine_x = value & 0x07;
        }
        self.w = !self.w;
    }

    /// PPUADDR write. The second write copies t into v.
    pub fn write_address(&mut self, value: u8) {
        if self.w {
            self.t = (self.t & 0xFF00) | u16::from(value);
            self.v = self.t;
        } else {
            self.t = (self.t & 0x00FF) | (u16::from(value & 0x3F) << 8);
        }
        self.w = !self.w;
    }

    pub fn increment_x(&mut self) {
        if self.v & 0x001F == 31 {
            self.v &= !0x001F;
            self.v ^= 0x0400;
        } else {
            self.v += 1;
        }
    }

    pub fn increment_y(&mut self) {
        if self.v & 0x7000 != 0x7000 {
            self.v += 0x1000;
            return;
        }
        self.v &= !0x7000;
        let mut coarse_y = (self.v & 0x03E0) >> 5;
        if coarse_y == 29 {
            coarse_y = 0;
            self.v ^= 0x0800;
        } else if coarse_y == 31 {
            // Rows 30-31 hold attributes; wrapping from them keeps the nametable.
            coarse_y = 0;
        } else {
            coarse_y += 1;
        }
        self.v = (self.v & !0x03E0) | (coarse_y << 5);
    }

    /// v: ....A.. ...BCDEF = t: ....A.. ...BCDEF
    pub fn copy_horizontal(&mut self) {
        self.v = (self.v & !0x041F) | (self.t & 0x041F);
    }

    /// v: GHIA.BC DEF..... = t: GHIA.BC DEF.....
    pub fn copy_vertical(&mut self) {
        self.v = (self.v & !0x7BE0) | (self.t & 0x7BE0);
    }
}

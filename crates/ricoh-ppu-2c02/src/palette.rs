//! NTSC 2C02 palette and the PPUMASK colour effects.
//!
//! Palette indices are six bits: the high two select brightness, the low
//! four select hue. Entries are ARGB32.

use crate::registers::Mask;

/// The 64 colours of an NTSC 2C02, as ARGB32.
pub const NTSC_PALETTE: [u32; 64] = [
    // $00-$0F
    0xFF54_5454, 0xFF00_1E74, 0xFF08_1090, 0xFF30_0088, 0xFF44_0064, 0xFF5C_0030, 0xFF54_0400, 0xFF3C_1800,
    0xFF20_2A00, 0xFF08_3A00, 0xFF00_4000, 0xFF00_3C00, 0xFF00_302C, 0xFF00_0000, 0xFF00_0000, 0xFF00_0000,
    // $10-$1F
    0xFF98_9698, 0xFF08_4CC4, 0xFF30_32EC, 0xFF5C_1EE4, 0xFF88_14B0, 0xFFA0_1464, 0xFF98_2220, 0xFF78_3C00,
    0xFF54_5A00, 0xFF28_7200, 0xFF08_7C00, 0xFF00_7628, 0xFF00_6678, 0xFF00_0000, 0xFF00_0000, 0xFF00_0000,
    // $20-$2F
    0xFFEC_EEEC, 0xFF3C_7EEC, 0xFF5C_5CEC, 0xFF88_44EC, 0xFFB0_2CEC, 0xFFE0_28B0, 0xFFD8_3C50, 0xFFC4_5400,
    0xFFAC_7000, 0xFF80_8800, 0xFF40_9C30, 0xFF20_A458, 0xFF20_9A88, 0xFF40_4040, 0xFF00_0000, 0xFF00_0000,
    // $30-$3F
    0xFFEC_EEEC, 0xFFA8_BCEC, 0xFFBC_ACEC, 0xFFD4_A0EC, 0xFFEC_94EC, 0xFFEC_90D4, 0xFFEC_9CB4, 0xFFE4_B090,
    0xFFDC_C878, 0xFFD4_DC78, 0xFFB8_EC98, 0xFFA8_ECBC, 0xFFA0_E4E4, 0xFFA0_A0A0, 0xFF00_0000, 0xFF00_0000,
];

/// Resolve a six-bit palette index to ARGB, applying greyscale and emphasis.
///
/// Greyscale forces the index to column 0 (AND with $30) before lookup.
/// Each emphasis bit attenuates the other two channels by about 0.816.
pub(crate) fn colour(palette: &[u32; 64], index: u8, mask: Mask) -> u32 {
    let index = if mask.greyscale() { index & 0x30 } else { index & 0x3F };
    let argb = palette[usize::from(index)];
    let emphasis = mask.emphasis();
    if emphasis == 0 {
        return argb;
    }

    let mut r = (argb >> 16) & 0xFF;
    let mut g = (argb >> 8) & 0xFF;
    let mut b = argb & 0xFF;

    // NTSC bit order: red, green, blue.
    if emphasis & 0x01 != 0 {
        g = g * 13 / 16;
        b = b * 13 / 16;
    }
    if emphasis & 0x02 != 0 {
        r = r * 13 / 16;
        b = b * 13 / 16;
    }
    if emphasis & 0x04 != 0 {
        r = r * 13 / 16;
        g = g * 13 / 16;
    }

    0xFF00_0000 | (r << 16) | (g << 8) | b
}

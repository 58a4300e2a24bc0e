//! Ricoh 2C02 picture processing unit.
//!
//! One `tick()` is one PPU dot. A frame is 341 dots by 262 scanlines
//! (one dot shorter on odd frames while rendering). The CPU reaches the
//! chip through eight registers mirrored across `$2000-$3FFF`; attach a
//! shared `Ppu` to `emu_core::Memory` as a shadow to expose them.
//!
//! ## Scanline layout
//! - 0-239: visible
//! - 240: post-render (idle)
//! - 241-260: vertical blank
//! - 261: pre-render

mod background;
mod error;
mod palette;
mod ppu;
mod registers;
mod scroll;
mod sprites;
mod vram;

pub use error::PpuError;
pub use palette::NTSC_PALETTE;
pub use ppu::{
    DOTS_PER_SCANLINE, FB_HEIGHT, FB_WIDTH, PRE_RENDER_SCANLINE, Ppu, SCANLINES_PER_FRAME,
    VBLANK_SCANLINE,
};
pub use registers::{Ctrl, Mask};
pub use vram::{Mirroring, VIDEO_MEMORY_SIZE};

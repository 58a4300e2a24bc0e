use thiserror::Error;

/// Construction failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PpuError {
    #[error("video memory must be 16384 bytes, got {len}")]
    VideoMemorySize { len: usize },
    #[error("palette must have 64 entries, got {len}")]
    PaletteSize { len: usize },
}

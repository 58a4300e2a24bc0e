//! iNES loader for mapper 0 (NROM).
//!
//! NROM has no bank switching: 16 KiB or 32 KiB of PRG-ROM at `$8000`
//! (16 KiB images repeat at `$C000`) and 8 KiB of CHR at PPU `$0000`.
//! A header with zero CHR banks means the board carries CHR-RAM instead.

use ricoh_ppu_2c02::Mirroring;
use thiserror::Error;

const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_BANK: usize = 16 * 1024;
pub(crate) const CHR_BANK: usize = 8 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("not an iNES image (bad magic)")]
    BadMagic,
    #[error("iNES image truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("mapper {0} is not supported (only mapper 0)")]
    UnsupportedMapper(u8),
    #[error("NROM needs 1 or 2 PRG banks, header says {0}")]
    PrgSize(u8),
    #[error("NROM needs 0 or 1 CHR banks, header says {0}")]
    ChrSize(u8),
    #[error("NROM PRG-ROM must be 16 or 32 KiB, got {0} bytes")]
    PrgLength(usize),
    #[error("NROM CHR must be 8 KiB, got {0} bytes")]
    ChrLength(usize),
}

/// A parsed NROM cartridge.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub prg_rom: Vec<u8>,
    /// 8 KiB of pattern data (zeroed CHR-RAM when the image has none).
    pub chr: Vec<u8>,
    pub chr_is_ram: bool,
    pub mirroring: Mirroring,
}

impl Cartridge {
    pub fn from_ines(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_LEN {
            return Err(CartridgeError::Truncated {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }
        if &data[0..4] != b"NES\x1a" {
            return Err(CartridgeError::BadMagic);
        }

        let prg_banks = data[4];
        let chr_banks = data[5];
        let flags6 = data[6];
        let flags7 = data[7];

        let mapper = (flags7 & 0xF0) | (flags6 >> 4);
        if mapper != 0 {
            return Err(CartridgeError::UnsupportedMapper(mapper));
        }
        if !(1..=2).contains(&prg_banks) {
            return Err(CartridgeError::PrgSize(prg_banks));
        }
        if chr_banks > 1 {
            return Err(CartridgeError::ChrSize(chr_banks));
        }

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let prg_start = HEADER_LEN + if flags6 & 0x04 != 0 { TRAINER_LEN } else { 0 };
        let prg_end = prg_start + usize::from(prg_banks) * PRG_BANK;
        let chr_end = prg_end + usize::from(chr_banks) * CHR_BANK;
        if data.len() < chr_end {
            return Err(CartridgeError::Truncated {
                expected: chr_end,
                actual: data.len(),
            });
        }

        let chr_is_ram = chr_banks == 0;
        let chr = if chr_is_ram {
            vec![0; CHR_BANK]
        } else {
            data[prg_end..chr_end].to_vec()
        };

        log::debug!(
            "NROM: {} KiB PRG, {} CHR, {mirroring:?} mirroring",
            (prg_end - prg_start) / 1024,
            if chr_is_ram { "CHR-RAM" } else { "CHR-ROM" }
        );

        Ok(Self {
            prg_rom: data[prg_start..prg_end].to_vec(),
            chr,
            chr_is_ram,
            mirroring,
        })
    }

    /// Check the image sizes NROM can map. `from_ines` always produces a
    /// valid cartridge; hand-built ones go through this before use.
    pub fn validate(&self) -> Result<(), CartridgeError> {
        if self.prg_rom.len() != PRG_BANK && self.prg_rom.len() != 2 * PRG_BANK {
            return Err(CartridgeError::PrgLength(self.prg_rom.len()));
        }
        if self.chr.len() != CHR_BANK {
            return Err(CartridgeError::ChrLength(self.chr.len()));
        }
        Ok(())
    }
}

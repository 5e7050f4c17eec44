//! Cartridge mappers.
//!
//! The address space only delegates to a [`Cartridge`]; banking logic lives
//! entirely in the implementations here.

mod mbc1;
mod rom_only;

pub use mbc1::Mbc1;
pub use rom_only::RomOnly;

use crate::error::{Error, Result};

/// Header offset of the cartridge type byte.
pub const CARTRIDGE_TYPE_ADDR: usize = 0x0147;
/// Header offset of the external RAM size code.
pub const RAM_SIZE_ADDR: usize = 0x0149;

pub const ROM_BANK_SIZE: usize = 0x4000;
pub const RAM_BANK_SIZE: usize = 0x2000;

/// A cartridge as seen from the CPU bus.
pub trait Cartridge {
    /// Read from 0x0000–0x7FFF.
    fn read_rom(&self, addr: u16) -> u8;
    /// Read external RAM; `offset` is relative to 0xA000.
    fn read_ram(&self, offset: u16) -> u8;
    /// Write external RAM; `offset` is relative to 0xA000.
    fn write_ram(&mut self, offset: u16, value: u8);
    /// Write to 0x0000–0x7FFF (mapper control registers).
    fn write_mbc_register(&mut self, addr: u16, value: u8);
}

/// Number of 8 KiB external RAM banks declared by the header.
///
/// 2 KiB parts are rounded up to a full bank.
pub(crate) fn ram_banks(rom: &[u8]) -> usize {
    match rom.get(RAM_SIZE_ADDR).copied().unwrap_or(0) {
        0x01 | 0x02 => 1,
        0x03 => 4,
        0x04 => 16,
        0x05 => 8,
        _ => 0,
    }
}

/// Build the mapper named by the cartridge header.
pub fn from_rom(rom: &[u8]) -> Result<Box<dyn Cartridge>> {
    let kind = rom.get(CARTRIDGE_TYPE_ADDR).copied().unwrap_or(0);
    let cartridge: Box<dyn Cartridge> = match kind {
        0x00 | 0x08 | 0x09 => Box::new(RomOnly::new(rom)),
        0x01..=0x03 => Box::new(Mbc1::new(rom)),
        _ => return Err(Error::UnsupportedCartridge(kind)),
    };
    log::debug!(
        "cartridge type 0x{:02X}: {} bytes ROM, {} RAM banks",
        kind,
        rom.len(),
        ram_banks(rom)
    );
    Ok(cartridge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(kind: u8, ram_size: u8, banks: usize) -> Vec<u8> {
        let mut rom = vec![0; banks * ROM_BANK_SIZE];
        rom[CARTRIDGE_TYPE_ADDR] = kind;
        rom[RAM_SIZE_ADDR] = ram_size;
        rom
    }

    #[test]
    fn selects_mapper_from_header() {
        for kind in [0x00, 0x08, 0x09, 0x01, 0x02, 0x03] {
            assert!(from_rom(&header(kind, 0, 2)).is_ok(), "type {kind:02X}");
        }
        assert_eq!(
            from_rom(&header(0x13, 0, 2)).err(),
            Some(Error::UnsupportedCartridge(0x13))
        );
    }

    #[test]
    fn short_images_default_to_rom_only() {
        let cart = from_rom(&[0x3C, 0x00]).expect("short image should load");
        assert_eq!(cart.read_rom(0x0000), 0x3C);
        assert_eq!(cart.read_rom(0x0002), 0xFF);
    }

    #[test]
    fn ram_size_codes() {
        assert_eq!(ram_banks(&header(0, 0x00, 2)), 0);
        assert_eq!(ram_banks(&header(0, 0x01, 2)), 1);
        assert_eq!(ram_banks(&header(0, 0x02, 2)), 1);
        assert_eq!(ram_banks(&header(0, 0x03, 2)), 4);
        assert_eq!(ram_banks(&[]), 0);
    }
}

use super::{ram_banks, Cartridge, RAM_BANK_SIZE, ROM_BANK_SIZE};

/// MBC1 mapper.
///
/// ROM banking uses the 5-bit bank register plus two high bits; the same two
/// bits select one of up to four RAM banks in advanced banking mode.
/// Battery persistence is not modelled.
pub struct Mbc1 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_banks: usize,
    ram_banks: usize,
    rom_bank_low5: u8,
    bank_high2: u8,
    ram_enabled: bool,
    /// Banking mode select (0x6000–0x7FFF): false = simple, true = advanced.
    advanced_mode: bool,
}

impl Mbc1 {
    pub fn new(rom: &[u8]) -> Self {
        let rom_banks = (rom.len() / ROM_BANK_SIZE).max(1);
        // MBC1 addresses at most four RAM banks.
        let ram_banks = ram_banks(rom).min(4);

        Self {
            rom: rom.to_vec(),
            ram: vec![0; ram_banks * RAM_BANK_SIZE],
            rom_banks,
            ram_banks,
            rom_bank_low5: 1,
            bank_high2: 0,
            ram_enabled: false,
            advanced_mode: false,
        }
    }

    fn rom_bank(&self, addr: u16) -> usize {
        let high = (self.bank_high2 as usize) << 5;
        let bank = if addr < 0x4000 {
            // Bank 0 area only sees the high bits in advanced mode.
            if self.advanced_mode {
                high
            } else {
                0
            }
        } else {
            high | self.rom_bank_low5 as usize
        };
        bank % self.rom_banks
    }

    fn ram_index(&self, offset: u16) -> Option<usize> {
        if !self.ram_enabled || self.ram_banks == 0 {
            return None;
        }
        let bank = if self.advanced_mode {
            self.bank_high2 as usize % self.ram_banks
        } else {
            0
        };
        let offset = offset as usize;
        (offset < RAM_BANK_SIZE).then_some(bank * RAM_BANK_SIZE + offset)
    }
}

impl Cartridge for Mbc1 {
    fn read_rom(&self, addr: u16) -> u8 {
        let index = self.rom_bank(addr) * ROM_BANK_SIZE + (addr as usize & 0x3FFF);
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    fn read_ram(&self, offset: u16) -> u8 {
        self.ram_index(offset)
            .and_then(|index| self.ram.get(index).copied())
            .unwrap_or(0xFF)
    }

    fn write_ram(&mut self, offset: u16, value: u8) {
        if let Some(index) = self.ram_index(offset) {
            if let Some(byte) = self.ram.get_mut(index) {
                *byte = value;
            }
        }
    }

    fn write_mbc_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = (value & 0x0F) == 0x0A,
            0x2000..=0x3FFF => {
                // Bank 0 is not selectable here; it maps to bank 1.
                self.rom_bank_low5 = (value & 0x1F).max(1);
            }
            0x4000..=0x5FFF => self.bank_high2 = value & 0x03,
            0x6000..=0x7FFF => self.advanced_mode = value & 0x01 != 0,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::RAM_SIZE_ADDR;

    /// ROM where the first byte of every bank holds the bank number.
    fn banked_rom(banks: usize, ram_size: u8) -> Vec<u8> {
        let mut rom = vec![0u8; banks * ROM_BANK_SIZE];
        for bank in 0..banks {
            rom[bank * ROM_BANK_SIZE] = bank as u8;
        }
        rom[RAM_SIZE_ADDR] = ram_size;
        rom
    }

    #[test]
    fn bank_zero_write_selects_bank_one() {
        let mut cart = Mbc1::new(&banked_rom(8, 0));
        assert_eq!(cart.read_rom(0x4000), 1);

        cart.write_mbc_register(0x2000, 0x00);
        assert_eq!(cart.read_rom(0x4000), 1);

        cart.write_mbc_register(0x2000, 0x05);
        assert_eq!(cart.read_rom(0x4000), 5);
        assert_eq!(cart.read_rom(0x0000), 0);
    }

    #[test]
    fn high_bits_extend_the_rom_bank() {
        let mut cart = Mbc1::new(&banked_rom(64, 0));
        cart.write_mbc_register(0x2000, 0x02);
        cart.write_mbc_register(0x4000, 0x01);
        assert_eq!(cart.read_rom(0x4000), 0x22);

        // Advanced mode also remaps the fixed area.
        assert_eq!(cart.read_rom(0x0000), 0);
        cart.write_mbc_register(0x6000, 0x01);
        assert_eq!(cart.read_rom(0x0000), 0x20);
    }

    #[test]
    fn bank_numbers_wrap_to_rom_size() {
        let mut cart = Mbc1::new(&banked_rom(4, 0));
        cart.write_mbc_register(0x2000, 0x06);
        assert_eq!(cart.read_rom(0x4000), 2);
    }

    #[test]
    fn ram_requires_enable() {
        let mut cart = Mbc1::new(&banked_rom(2, 0x03));
        cart.write_ram(0x0000, 0x12);
        assert_eq!(cart.read_ram(0x0000), 0xFF);

        cart.write_mbc_register(0x0000, 0x0A);
        cart.write_ram(0x0000, 0x12);
        assert_eq!(cart.read_ram(0x0000), 0x12);

        cart.write_mbc_register(0x0000, 0x00);
        assert_eq!(cart.read_ram(0x0000), 0xFF);
    }

    #[test]
    fn ram_banks_switch_in_advanced_mode() {
        let mut cart = Mbc1::new(&banked_rom(2, 0x03));
        cart.write_mbc_register(0x0000, 0x0A);
        cart.write_mbc_register(0x6000, 0x01);

        cart.write_mbc_register(0x4000, 0x02);
        cart.write_ram(0x0100, 0xB2);
        cart.write_mbc_register(0x4000, 0x00);
        cart.write_ram(0x0100, 0xB0);

        assert_eq!(cart.read_ram(0x0100), 0xB0);
        cart.write_mbc_register(0x4000, 0x02);
        assert_eq!(cart.read_ram(0x0100), 0xB2);
    }
}

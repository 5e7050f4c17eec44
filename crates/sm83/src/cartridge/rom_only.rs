use super::{ram_banks, Cartridge, RAM_BANK_SIZE};

/// Up to 32 KiB of ROM with no mapper, plus optional 8 KiB of RAM.
pub struct RomOnly {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl RomOnly {
    pub fn new(rom: &[u8]) -> Self {
        let ram_len = if ram_banks(rom) > 0 { RAM_BANK_SIZE } else { 0 };
        Self {
            rom: rom.to_vec(),
            ram: vec![0; ram_len],
        }
    }
}

impl Cartridge for RomOnly {
    fn read_rom(&self, addr: u16) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0xFF)
    }

    fn read_ram(&self, offset: u16) -> u8 {
        self.ram.get(offset as usize).copied().unwrap_or(0xFF)
    }

    fn write_ram(&mut self, offset: u16, value: u8) {
        if let Some(byte) = self.ram.get_mut(offset as usize) {
            *byte = value;
        }
    }

    // No mapper: register writes are ignored.
    fn write_mbc_register(&mut self, _addr: u16, _value: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::RAM_SIZE_ADDR;

    #[test]
    fn rom_is_read_only() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x1234] = 0x56;
        let mut cart = RomOnly::new(&rom);
        cart.write_mbc_register(0x1234, 0x00);
        assert_eq!(cart.read_rom(0x1234), 0x56);
    }

    #[test]
    fn ram_only_when_declared() {
        let mut rom = vec![0u8; 0x8000];
        let mut cart = RomOnly::new(&rom);
        cart.write_ram(0x0010, 0x42);
        assert_eq!(cart.read_ram(0x0010), 0xFF);

        rom[RAM_SIZE_ADDR] = 0x02;
        let mut cart = RomOnly::new(&rom);
        cart.write_ram(0x0010, 0x42);
        assert_eq!(cart.read_ram(0x0010), 0x42);
    }
}

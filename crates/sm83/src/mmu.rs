//! 64 KiB address space.
//!
//! | Range         | Backing                                         |
//! |---------------|-------------------------------------------------|
//! | 0000–00FF     | boot ROM while loaded and enabled               |
//! | 0000–7FFF     | cartridge ROM / mapper registers                |
//! | 8000–9FFF     | VRAM                                            |
//! | A000–BFFF     | cartridge RAM                                   |
//! | C000–DFFF     | work RAM                                        |
//! | E000–FDFF     | echo of C000–DDFF                               |
//! | FE00–FE9F     | OAM                                             |
//! | FEA0–FEFF     | unusable (reads 0xFF)                           |
//! | FF00–FF7F     | I/O registers (allow-listed)                    |
//! | FF80–FFFE     | HRAM                                            |
//! | FFFF          | IE                                              |

mod io;


use std::collections::HashMap;
use std::rc::Rc;

use crate::cartridge::Cartridge;
use crate::cpu::Bus;
use crate::error::{Error, Result};
use crate::interrupt::{IfWriteObserver, Interrupts, IE_ADDR, IF_ADDR};
use crate::serial::{SerialInterface, SB_ADDR, SC_ADDR};
use crate::timer::{Timer, DIV_ADDR, TAC_ADDR};

pub use io::{is_mapped, BOOT_ROM_DISABLE_ADDR};

pub const MEMORY_SIZE: usize = 0x10000;
pub const BOOT_ROM_SIZE: usize = 0x100;

/// What occupies the cartridge slot.
enum CartridgeSlot {
    /// No load was ever attempted: ROM and RAM fall through to plain memory.
    Unset,
    /// A load was attempted without a cartridge: reads 0xFF, writes dropped.
    Empty,
    Loaded(Box<dyn Cartridge>),
}

/// Bank-select state mirrored from writes to the mapper area.
///
/// This is for inspection only; the cartridge keeps its own copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BankSnapshot {
    pub rom_bank: u8,
    pub ram_bank: u8,
    pub ram_enabled: bool,
}

impl Default for BankSnapshot {
    fn default() -> Self {
        Self {
            rom_bank: 1,
            ram_bank: 0,
            ram_enabled: false,
        }
    }
}

pub struct Mmu {
    memory: Box<[u8]>,
    boot_rom: [u8; BOOT_ROM_SIZE],
    boot_rom_loaded: bool,
    boot_rom_enabled: bool,
    /// Set by `set_post_boot_state`; keeps the boot ROM off across resets.
    post_boot: bool,
    io: HashMap<u16, u8>,
    cartridge: CartridgeSlot,
    serial: Option<Box<dyn SerialInterface>>,
    timer: Option<Timer>,
    if_observer: Option<Rc<dyn IfWriteObserver>>,
    banks: BankSnapshot,
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}

impl Mmu {
    pub fn new() -> Self {
        let mut mmu = Self {
            memory: vec![0; MEMORY_SIZE].into_boxed_slice(),
            boot_rom: [0; BOOT_ROM_SIZE],
            boot_rom_loaded: false,
            boot_rom_enabled: true,
            post_boot: false,
            io: HashMap::new(),
            cartridge: CartridgeSlot::Unset,
            serial: None,
            timer: None,
            if_observer: None,
            banks: BankSnapshot::default(),
        };
        mmu.seed_io();
        mmu
    }

    /// Clear memory and registers back to power-on values.
    ///
    /// The cartridge, boot ROM image and attached peripherals stay in place.
    /// If the post-boot state was ever applied, the post-boot registers are
    /// restored instead and the boot ROM stays disabled.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.boot_rom_enabled = !self.post_boot;
        self.banks = BankSnapshot::default();
        self.seed_io();
    }

    /// Apply the register state the boot ROM leaves behind, and disable the
    /// boot ROM for good.
    pub fn set_post_boot_state(&mut self) {
        self.post_boot = true;
        self.boot_rom_enabled = false;
        self.seed_io();
    }

    /// Install a 256-byte boot ROM image. Whether it is visible still
    /// depends on the disable latch.
    pub fn load_boot_rom(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != BOOT_ROM_SIZE {
            return Err(Error::BootRomSize(bytes.len()));
        }
        self.boot_rom.copy_from_slice(bytes);
        self.boot_rom_loaded = true;
        log::debug!("boot ROM loaded");
        Ok(())
    }

    #[inline]
    pub fn boot_rom_active(&self) -> bool {
        self.boot_rom_loaded && self.boot_rom_enabled
    }

    /// Insert a cartridge, or record an empty slot with `None`.
    pub fn load_cartridge(&mut self, cartridge: Option<Box<dyn Cartridge>>) {
        self.cartridge = match cartridge {
            Some(cartridge) => CartridgeSlot::Loaded(cartridge),
            None => CartridgeSlot::Empty,
        };
    }

    pub fn set_serial_interface(&mut self, serial: Box<dyn SerialInterface>) {
        self.serial = Some(serial);
        self.seed_serial();
    }

    pub fn set_timer(&mut self, timer: Timer) {
        self.timer = Some(timer);
    }

    pub fn timer(&self) -> Option<&Timer> {
        self.timer.as_ref()
    }

    /// Register the observer told about every IF write.
    pub fn set_if_write_observer(&mut self, observer: Rc<dyn IfWriteObserver>) {
        self.if_observer = Some(observer);
    }

    pub fn snapshot(&self) -> BankSnapshot {
        self.banks
    }

    /// Set interrupt request bits in IF through the normal write path.
    pub fn request_interrupt(&mut self, sources: Interrupts) {
        let iflags = self.read_byte(IF_ADDR);
        self.write_byte(IF_ADDR, iflags | sources.bits());
    }

    /// Advance the timer and serial port by `cycles` T-cycles and raise the
    /// interrupts they report.
    pub fn tick(&mut self, cycles: u32) {
        let mut raised = Interrupts::empty();
        if let Some(timer) = self.timer.as_mut() {
            raised |= timer.step(cycles);
        }
        if let Some(serial) = self.serial.as_mut() {
            raised |= serial.step(cycles);
        }
        if !raised.is_empty() {
            self.request_interrupt(raised);
        }
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x00FF if self.boot_rom_active() => self.boot_rom[addr as usize],
            0x0000..=0x7FFF => match &self.cartridge {
                CartridgeSlot::Loaded(cart) => cart.read_rom(addr),
                CartridgeSlot::Empty => 0xFF,
                CartridgeSlot::Unset => self.memory[addr as usize],
            },
            0xA000..=0xBFFF => match &self.cartridge {
                CartridgeSlot::Loaded(cart) => cart.read_ram(addr - 0xA000),
                CartridgeSlot::Empty => 0xFF,
                CartridgeSlot::Unset => self.memory[addr as usize],
            },
            0xE000..=0xFDFF => self.memory[echo_target(addr)],
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00..=0xFF7F => self.read_io(addr),
            _ => self.memory[addr as usize],
        }
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {
                self.mirror_bank_register(addr, value);
                match &mut self.cartridge {
                    CartridgeSlot::Loaded(cart) => cart.write_mbc_register(addr, value),
                    CartridgeSlot::Empty => {}
                    CartridgeSlot::Unset => self.memory[addr as usize] = value,
                }
            }
            0xA000..=0xBFFF => match &mut self.cartridge {
                CartridgeSlot::Loaded(cart) => cart.write_ram(addr - 0xA000, value),
                CartridgeSlot::Empty => {}
                CartridgeSlot::Unset => self.memory[addr as usize] = value,
            },
            0xE000..=0xFDFF => self.memory[echo_target(addr)] = value,
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.write_io(addr, value),
            _ => self.memory[addr as usize] = value,
        }
    }

    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read_byte(addr);
        let hi = self.read_byte(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(addr, lo);
        self.write_byte(addr.wrapping_add(1), hi);
    }

    fn read_io(&self, addr: u16) -> u8 {
        if !io::is_mapped(addr) {
            return 0xFF;
        }
        match (addr, &self.serial, &self.timer) {
            (SB_ADDR, Some(serial), _) => serial.read_sb(),
            (SC_ADDR, Some(serial), _) => serial.read_sc(),
            (DIV_ADDR..=TAC_ADDR, _, Some(timer)) => timer.read(addr),
            // Upper three bits of IF are unused and read as 1.
            (IF_ADDR, _, _) => self.io_value(addr) | 0xE0,
            _ => self.io_value(addr),
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        if !io::is_mapped(addr) {
            return;
        }
        if let (SB_ADDR | SC_ADDR, Some(serial)) = (addr, self.serial.as_mut()) {
            if addr == SB_ADDR {
                serial.write_sb(value);
            } else {
                serial.write_sc(value);
            }
            return;
        }
        if let (DIV_ADDR..=TAC_ADDR, Some(timer)) = (addr, self.timer.as_mut()) {
            timer.write(addr, value);
            return;
        }

        match addr {
            // Without a timer DIV still clears on write.
            DIV_ADDR => {
                self.io.insert(addr, 0);
            }
            IF_ADDR => {
                let old = self.io_value(addr) & 0x1F;
                let new = value & 0x1F;
                self.io.insert(addr, new);
                if let Some(observer) = &self.if_observer {
                    observer.if_written(old, new);
                }
            }
            BOOT_ROM_DISABLE_ADDR => {
                if value != 0 && self.boot_rom_enabled {
                    log::debug!("boot ROM disabled");
                    self.boot_rom_enabled = false;
                }
                self.io.insert(addr, value);
            }
            _ => {
                self.io.insert(addr, value);
            }
        }
    }

    #[inline]
    fn io_value(&self, addr: u16) -> u8 {
        self.io.get(&addr).copied().unwrap_or(0)
    }

    /// Re-seed every register with its power-on or post-boot value.
    fn seed_io(&mut self) {
        self.io.clear();
        for addr in 0xFF00..=0xFF7Fu16 {
            if io::is_mapped(addr) {
                self.io.insert(addr, 0x00);
            }
        }

        if self.post_boot {
            for &(addr, value) in io::POST_BOOT.iter() {
                if addr == IE_ADDR {
                    self.memory[addr as usize] = value;
                } else {
                    self.io.insert(addr, value);
                }
            }
            if self.timer.is_some() {
                self.timer = Some(Timer::post_boot());
            }
        } else {
            for &(addr, value) in io::POWER_ON.iter() {
                self.io.insert(addr, value);
            }
            if self.timer.is_some() {
                self.timer = Some(Timer::new());
            }
        }
        self.seed_serial();
    }

    /// Push the seeded SB/SC values into an attached serial port.
    fn seed_serial(&mut self) {
        let sb = self.io_value(SB_ADDR);
        let sc = self.io_value(SC_ADDR);
        if let Some(serial) = self.serial.as_mut() {
            serial.write_sb(sb);
            serial.write_sc(sc);
        }
    }

    fn mirror_bank_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.banks.ram_enabled = (value & 0x0F) == 0x0A,
            0x2000..=0x3FFF => self.banks.rom_bank = (value & 0x1F).max(1),
            0x4000..=0x5FFF => self.banks.ram_bank = value & 0x03,
            _ => {}
        }
    }
}

#[inline]
fn echo_target(addr: u16) -> usize {
    (0xC000 + (addr - 0xE000)) as usize
}

impl Bus for Mmu {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read_byte(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write_byte(addr, value);
    }
}

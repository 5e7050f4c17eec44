use typed_builder::TypedBuilder;

use crate::cartridge;
use crate::cpu::{Cpu, InterruptTiming};
use crate::error::Result;
use crate::mmu::Mmu;
use crate::serial::{Serial, SerialInterface};
use crate::timer::Timer;

/// T-cycles in one DMG video frame.
pub const CYCLES_PER_FRAME: u32 = 70_224;

/// How a [`Machine`] starts up.
#[derive(Clone, Debug, TypedBuilder)]
pub struct MachineConfig {
    /// Skip the boot ROM and start at 0x0100 with the registers it leaves
    /// behind. Ignored when `boot_rom` is given.
    #[builder(default = true)]
    pub post_boot: bool,
    /// 256-byte boot ROM image to run from 0x0000.
    #[builder(default, setter(strip_option))]
    pub boot_rom: Option<Vec<u8>>,
    #[builder(default)]
    pub interrupt_timing: InterruptTiming,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// CPU plus address space, stepped in lockstep.
///
/// Every [`Machine::step`] advances the timer and serial port by exactly the
/// cycles the CPU reported.
pub struct Machine {
    cpu: Cpu,
    mmu: Mmu,
    config: MachineConfig,
}

impl Machine {
    pub fn new(config: MachineConfig) -> Result<Self> {
        let mut cpu = Cpu::new();
        cpu.set_interrupt_timing(config.interrupt_timing);

        let mut mmu = Mmu::new();
        mmu.set_timer(Timer::new());
        mmu.set_serial_interface(Box::new(Serial::new()));
        mmu.set_if_write_observer(cpu.if_write_observer());

        let mut machine = Self { cpu, mmu, config };
        machine.power_on()?;
        Ok(machine)
    }

    fn power_on(&mut self) -> Result<()> {
        match &self.config.boot_rom {
            Some(image) => self.mmu.load_boot_rom(image)?,
            None if self.config.post_boot => {
                self.mmu.set_post_boot_state();
                self.cpu.set_post_boot_state();
            }
            None => {}
        }
        Ok(())
    }

    /// Reset CPU and memory. The cartridge stays inserted.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.mmu.reset();
        if self.config.boot_rom.is_none() && self.config.post_boot {
            self.cpu.set_post_boot_state();
        }
    }

    /// Insert a cartridge built from a ROM image.
    pub fn load_cartridge(&mut self, rom: &[u8]) -> Result<()> {
        let cartridge = cartridge::from_rom(rom)?;
        self.mmu.load_cartridge(Some(cartridge));
        Ok(())
    }

    /// Replace the serial port, e.g. with one that captures output.
    pub fn set_serial_interface(&mut self, serial: Box<dyn SerialInterface>) {
        self.mmu.set_serial_interface(serial);
    }

    /// Execute one CPU step and advance the peripherals by its cycles.
    pub fn step(&mut self) -> Result<u32> {
        let cycles = self.cpu.step(&mut self.mmu)?;
        self.mmu.tick(cycles);
        Ok(cycles)
    }

    /// Step until at least `cycles` T-cycles have elapsed. Returns the
    /// exact number consumed.
    pub fn run_for(&mut self, cycles: u32) -> Result<u32> {
        let mut elapsed = 0;
        while elapsed < cycles {
            elapsed += self.step()?;
        }
        Ok(elapsed)
    }

    pub fn step_frame(&mut self) -> Result<u32> {
        self.run_for(CYCLES_PER_FRAME)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut Mmu {
        &mut self.mmu
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

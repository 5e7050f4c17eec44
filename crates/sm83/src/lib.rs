pub mod cartridge;
pub mod cpu;
pub mod error;
pub mod interrupt;
pub mod machine;
pub mod mmu;
pub mod serial;
pub mod timer;

pub use cartridge::Cartridge;
pub use cpu::{Bus, Cpu, Flag, InterruptTiming, Registers, TraceLine, TraceSink};
pub use error::{Error, Result};
pub use interrupt::{IfWriteObserver, Interrupts};
pub use machine::{Machine, MachineConfig};
pub use mmu::{BankSnapshot, Mmu};
pub use serial::{Serial, SerialInterface};
pub use timer::Timer;

//! SM83 execution engine.
//!
//! The CPU is driven one instruction at a time through [`Cpu::step`], which
//! returns the number of T-cycles consumed. All memory traffic goes through
//! the [`Bus`] trait so the core can run against the full address space or a
//! flat test memory.

mod alu;
mod cb;
mod decode;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod trace;


use std::rc::Rc;

use crate::error::{Error, Result};

pub use alu::{AluOp, FlagUpdate, ShiftOp};
pub use decode::ILLEGAL_OPCODES;
pub use interrupts::IfWriteLatch;
pub use regs::{Flag, Registers};
pub use trace::{TraceLine, TraceSink};

use decode::Instr;

/// Cycles charged for one idle step while halted.
pub const HALT_IDLE_CYCLES: u32 = 4;
/// Extra cycles charged for entering an interrupt handler.
pub const INTERRUPT_DISPATCH_CYCLES: u32 = 20;

/// Abstraction over the memory bus seen by the CPU.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit write.
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }
}

/// Where the interrupt check sits inside a single `step`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterruptTiming {
    /// Execute the instruction at PC, then check for interrupts. A dispatch
    /// also runs the first handler instruction in the same step.
    #[default]
    AfterInstruction,
    /// Check for interrupts before fetching. A dispatch runs the first
    /// handler instruction instead of the one at PC.
    BeforeInstruction,
}

/// SM83 CPU core.
pub struct Cpu {
    pub regs: Registers,
    ime: bool,
    halted: bool,
    /// STOP marker. Execution continues normally on the next step.
    stopped: bool,
    halt_bug: bool,
    ime_enable_pending: bool,
    ime_enable_delay: bool,
    /// Set once an illegal opcode is fetched; every later step reports it.
    locked: Option<Error>,
    interrupt_timing: InterruptTiming,
    if_latch: Rc<IfWriteLatch>,
    trace: Option<Box<dyn TraceSink>>,
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("ime", &self.ime)
            .field("halted", &self.halted)
            .field("stopped", &self.stopped)
            .field("locked", &self.locked)
            .field("interrupt_timing", &self.interrupt_timing)
            .finish_non_exhaustive()
    }
}

impl Cpu {
    #[inline]
    pub fn ime(&self) -> bool {
        self.ime
    }

    /// Set IME directly. Cancels any EI still waiting to take effect.
    pub fn set_ime(&mut self, value: bool) {
        self.ime = value;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.regs.flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.regs.set_flag(flag, value);
    }

    pub fn interrupt_timing(&self) -> InterruptTiming {
        self.interrupt_timing
    }

    pub fn set_interrupt_timing(&mut self, timing: InterruptTiming) {
        self.interrupt_timing = timing;
    }

    /// Observer the address space should notify about IF writes.
    pub fn if_write_observer(&self) -> Rc<IfWriteLatch> {
        Rc::clone(&self.if_latch)
    }

    /// Install a sink that receives one [`TraceLine`] per step.
    pub fn set_trace_sink(&mut self, sink: impl TraceSink + 'static) {
        self.trace = Some(Box::new(sink));
    }

    pub fn clear_trace_sink(&mut self) {
        self.trace = None;
    }

    /// Execute one instruction (plus any interrupt entry) and return the
    /// T-cycles consumed.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        if let Some(err) = &self.locked {
            return Err(err.clone());
        }

        self.emit_trace(bus);

        if self.halted {
            if self.pending_interrupts(bus).is_empty() {
                return Ok(HALT_IDLE_CYCLES);
            }
            // Waking does not depend on IME.
            self.halted = false;
        }

        match self.interrupt_timing {
            InterruptTiming::AfterInstruction => {
                let mut cycles = self.execute_next(bus)?;
                if let Some(dispatch) = self.service_interrupt(bus) {
                    cycles += dispatch + self.execute_next(bus)?;
                }
                Ok(cycles)
            }
            InterruptTiming::BeforeInstruction => match self.service_interrupt(bus) {
                Some(dispatch) => Ok(dispatch + self.execute_next(bus)?),
                None => self.execute_next(bus),
            },
        }
    }

    /// Fetch, decode and execute the instruction at PC.
    fn execute_next<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        self.if_latch.begin();
        let result = self.execute(bus);
        self.if_latch.end();

        let cycles = result?;
        self.apply_ime_delay();
        Ok(cycles)
    }

    fn execute<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let addr = self.regs.pc;
        let opcode = self.fetch8(bus);
        let entry = decode::opcode(opcode);

        match entry.instr {
            Instr::Illegal => {
                let err = Error::IllegalOpcode { opcode, addr };
                log::error!("CPU locked: {}", err);
                self.locked = Some(err.clone());
                Err(err)
            }
            Instr::Prefix => {
                let cb = self.fetch8(bus);
                let entry = decode::cb_opcode(cb);
                log::trace!("{:04X}: CB {:02X} {:?}", addr, cb, entry.instr);
                self.exec_cb(bus, entry.instr);
                Ok(entry.cycles)
            }
            instr => {
                log::trace!("{:04X}: {:02X} {:?}", addr, opcode, instr);
                let taken = self.exec(bus, instr);
                Ok(if taken {
                    entry.cycles_taken
                } else {
                    entry.cycles
                })
            }
        }
    }
}

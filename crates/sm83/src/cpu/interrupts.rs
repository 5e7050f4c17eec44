use std::cell::Cell;

use super::{Bus, Cpu, INTERRUPT_DISPATCH_CYCLES};
use crate::interrupt::{IfWriteObserver, Interrupts, IE_ADDR, IF_ADDR};

/// Tracks IF bits set by the instruction currently executing.
///
/// The latch only records while the CPU has it armed, so interrupt requests
/// raised by peripherals between steps are never held back. Bits recorded
/// during an instruction stay blocked until the next instruction starts.
#[derive(Debug, Default)]
pub struct IfWriteLatch {
    executing: Cell<bool>,
    delayed: Cell<u8>,
}

impl IfWriteLatch {
    pub(super) fn begin(&self) {
        self.delayed.set(0);
        self.executing.set(true);
    }

    pub(super) fn end(&self) {
        self.executing.set(false);
    }

    pub(super) fn clear(&self) {
        self.delayed.set(0);
        self.executing.set(false);
    }

    /// IF bits that may not trigger a dispatch at the current boundary.
    pub fn delayed(&self) -> Interrupts {
        Interrupts::from_bits_truncate(self.delayed.get())
    }
}

impl IfWriteObserver for IfWriteLatch {
    fn if_written(&self, old: u8, new: u8) {
        if self.executing.get() {
            let raised = new & !old & Interrupts::all().bits();
            self.delayed.set(self.delayed.get() | raised);
        }
    }
}

impl Cpu {
    /// Apply delayed IME change requested by EI.
    #[inline]
    pub(super) fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            // Second boundary after EI: actually enable IME.
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            // Boundary right after EI: arm the delayed enable.
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }

    /// Sources that are both enabled and requested.
    pub(super) fn pending_interrupts<B: Bus>(&mut self, bus: &mut B) -> Interrupts {
        let ie = bus.read8(IE_ADDR);
        let iflags = bus.read8(IF_ADDR);
        Interrupts::from_bits_truncate(ie & iflags)
    }

    /// Dispatch the highest-priority pending interrupt if IME allows it.
    ///
    /// Returns the dispatch cost when a handler was entered.
    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if !self.ime {
            return None;
        }

        let pending = self.pending_interrupts(bus) - self.if_latch.delayed();
        let source = pending.highest_priority()?;

        self.ime = false;
        self.halted = false;
        self.stopped = false;

        let iflags = bus.read8(IF_ADDR);
        bus.write8(IF_ADDR, iflags & !source.bits());

        // A HALT bug still waiting for its fetch (EI; HALT with a request
        // already pending) is taken by the dispatch instead: the handler
        // returns to the HALT.
        let pc = if self.halt_bug {
            self.halt_bug = false;
            self.regs.pc.wrapping_sub(1)
        } else {
            self.regs.pc
        };
        self.push_u16(bus, pc);
        self.regs.pc = source.vector();

        log::debug!(
            "interrupt {:?}: vector=0x{:04X} pc=0x{:04X} sp=0x{:04X}",
            source,
            self.regs.pc,
            pc,
            self.regs.sp,
        );

        Some(INTERRUPT_DISPATCH_CYCLES)
    }
}

use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// STOP is two bytes long; the padding byte is fetched and ignored.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) {
        let _padding = self.fetch8(bus);
        self.stopped = true;
        log::debug!("STOP at 0x{:04X}", self.regs.pc.wrapping_sub(2));
    }

    pub(super) fn exec_halt<B: Bus>(&mut self, bus: &mut B) {
        if !self.ime && !self.pending_interrupts(bus).is_empty() {
            // HALT bug: the CPU does not halt and the next opcode fetch
            // does not advance PC.
            self.halt_bug = true;
            return;
        }
        self.halted = true;
    }

    pub(super) fn exec_di(&mut self) {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }

    /// IME becomes 1 after the *next* instruction completes.
    pub(super) fn exec_ei(&mut self) {
        if !self.ime {
            self.ime_enable_pending = true;
        }
    }
}

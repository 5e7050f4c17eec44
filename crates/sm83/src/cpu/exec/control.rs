use crate::cpu::decode::Cond;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// JR: signed displacement relative to the address after the operand.
    pub(super) fn exec_jr<B: Bus>(&mut self, bus: &mut B, cond: Cond) -> bool {
        let offset = self.fetch8(bus) as i8;
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
        }
        taken
    }

    pub(super) fn exec_jp<B: Bus>(&mut self, bus: &mut B, cond: Cond) -> bool {
        let addr = self.fetch16(bus);
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = addr;
        }
        taken
    }

    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, cond: Cond) -> bool {
        let addr = self.fetch16(bus);
        let taken = self.condition(cond);
        if taken {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
        }
        taken
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B, cond: Cond) -> bool {
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = self.pop_u16(bus);
        }
        taken
    }

    /// RETI enables IME immediately, unlike EI.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
        self.ime = true;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u8) {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = vector as u16;
    }
}

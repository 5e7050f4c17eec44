use crate::cpu::decode::StackReg;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, reg: StackReg) {
        let value = self.stack_reg(reg);
        self.push_u16(bus, value);
    }

    /// POP AF drops the low nibble of F.
    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, reg: StackReg) {
        let value = self.pop_u16(bus);
        self.set_stack_reg(reg, value);
    }
}

use crate::cpu::decode::{Loc8, Reg16};
use crate::cpu::{alu, Bus, Cpu};

impl Cpu {
    /// All 8-bit transfers: register/register, immediates, indirect and
    /// high-page forms.
    pub(super) fn exec_ld<B: Bus>(&mut self, bus: &mut B, dst: Loc8, src: Loc8) {
        debug_assert!(!(dst.is_memory() && src.is_memory()));

        let value = self.read_loc(bus, src);
        self.write_loc(bus, dst, value);
    }

    pub(super) fn exec_ld16_imm<B: Bus>(&mut self, bus: &mut B, reg: Reg16) {
        let value = self.fetch16(bus);
        self.set_reg16(reg, value);
    }

    pub(super) fn exec_ld_imm16_sp<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.fetch16(bus);
        let sp = self.regs.sp;
        bus.write16(addr, sp);
    }

    pub(super) fn exec_ld_hl_sp_offset<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        let (value, flags) = alu::add_sp_offset(self.regs.sp, offset);
        self.regs.set_hl(value);
        self.regs.apply_flags(flags);
    }
}

use crate::cpu::alu::{self, AluOp, FlagUpdate, ShiftOp};
use crate::cpu::decode::{Loc8, Reg16};
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    pub(super) fn exec_alu<B: Bus>(&mut self, bus: &mut B, op: AluOp, src: Loc8) {
        let value = self.read_loc(bus, src);
        let out = alu::accumulate(op, self.regs.a, value, self.regs.flag(Flag::C));
        self.regs.a = out.value;
        self.regs.apply_flags(out.flags);
    }

    pub(super) fn exec_inc<B: Bus>(&mut self, bus: &mut B, target: Loc8) {
        let out = alu::inc8(self.read_loc(bus, target));
        self.write_loc(bus, target, out.value);
        self.regs.apply_flags(out.flags);
    }

    pub(super) fn exec_dec<B: Bus>(&mut self, bus: &mut B, target: Loc8) {
        let out = alu::dec8(self.read_loc(bus, target));
        self.write_loc(bus, target, out.value);
        self.regs.apply_flags(out.flags);
    }

    pub(super) fn exec_add_hl(&mut self, reg: Reg16) {
        let (value, flags) = alu::add16(self.regs.hl(), self.reg16(reg));
        self.regs.set_hl(value);
        self.regs.apply_flags(flags);
    }

    pub(super) fn exec_add_sp_offset<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        let (value, flags) = alu::add_sp_offset(self.regs.sp, offset);
        self.regs.sp = value;
        self.regs.apply_flags(flags);
    }

    pub(super) fn exec_rotate_a(&mut self, op: ShiftOp) {
        let out = alu::rotate_a(op, self.regs.a, self.regs.flag(Flag::C));
        self.regs.a = out.value;
        self.regs.apply_flags(out.flags);
    }

    pub(super) fn exec_daa(&mut self) {
        let out = alu::daa(
            self.regs.a,
            self.regs.flag(Flag::N),
            self.regs.flag(Flag::H),
            self.regs.flag(Flag::C),
        );
        self.regs.a = out.value;
        self.regs.apply_flags(out.flags);
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.regs.apply_flags(FlagUpdate {
            n: Some(true),
            h: Some(true),
            ..FlagUpdate::none()
        });
    }

    pub(super) fn exec_scf(&mut self) {
        self.regs.apply_flags(FlagUpdate {
            n: Some(false),
            h: Some(false),
            c: Some(true),
            ..FlagUpdate::none()
        });
    }

    pub(super) fn exec_ccf(&mut self) {
        let carry = self.regs.flag(Flag::C);
        self.regs.apply_flags(FlagUpdate {
            n: Some(false),
            h: Some(false),
            c: Some(!carry),
            ..FlagUpdate::none()
        });
    }
}

use super::decode::{Cond, Loc8, Reg16, StackReg};
use super::{Bus, Cpu, Flag};

impl Cpu {
    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        if self.halt_bug {
            // HALT bug: the first fetch after the bug does not advance PC.
            self.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Push a word: high byte first, so memory[SP] = low, memory[SP+1] = high.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        let hi = bus.read8(self.regs.sp.wrapping_add(1));
        self.regs.sp = self.regs.sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }

    /// Address of a memory operand. Operands that carry their address in the
    /// instruction stream consume it here; (HL+)/(HL-) adjust HL.
    fn operand_addr<B: Bus>(&mut self, bus: &mut B, loc: Loc8) -> u16 {
        match loc {
            Loc8::IndHl => self.regs.hl(),
            Loc8::IndBc => self.regs.bc(),
            Loc8::IndDe => self.regs.de(),
            Loc8::IndHlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Loc8::IndHlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
            Loc8::IndImm16 => self.fetch16(bus),
            Loc8::HighImm => 0xFF00 | self.fetch8(bus) as u16,
            Loc8::HighC => 0xFF00 | self.regs.c as u16,
            _ => unreachable!("{:?} is not a memory operand", loc),
        }
    }

    pub(super) fn read_loc<B: Bus>(&mut self, bus: &mut B, loc: Loc8) -> u8 {
        match loc {
            Loc8::A => self.regs.a,
            Loc8::B => self.regs.b,
            Loc8::C => self.regs.c,
            Loc8::D => self.regs.d,
            Loc8::E => self.regs.e,
            Loc8::H => self.regs.h,
            Loc8::L => self.regs.l,
            Loc8::Imm => self.fetch8(bus),
            _ => {
                let addr = self.operand_addr(bus, loc);
                bus.read8(addr)
            }
        }
    }

    pub(super) fn write_loc<B: Bus>(&mut self, bus: &mut B, loc: Loc8, value: u8) {
        match loc {
            Loc8::A => self.regs.a = value,
            Loc8::B => self.regs.b = value,
            Loc8::C => self.regs.c = value,
            Loc8::D => self.regs.d = value,
            Loc8::E => self.regs.e = value,
            Loc8::H => self.regs.h = value,
            Loc8::L => self.regs.l = value,
            Loc8::Imm => unreachable!("immediate operand is not writable"),
            _ => {
                let addr = self.operand_addr(bus, loc);
                bus.write8(addr, value);
            }
        }
    }

    #[inline]
    pub(super) fn reg16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::Bc => self.regs.bc(),
            Reg16::De => self.regs.de(),
            Reg16::Hl => self.regs.hl(),
            Reg16::Sp => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn set_reg16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::Bc => self.regs.set_bc(value),
            Reg16::De => self.regs.set_de(value),
            Reg16::Hl => self.regs.set_hl(value),
            Reg16::Sp => self.regs.sp = value,
        }
    }

    #[inline]
    pub(super) fn stack_reg(&self, reg: StackReg) -> u16 {
        match reg {
            StackReg::Bc => self.regs.bc(),
            StackReg::De => self.regs.de(),
            StackReg::Hl => self.regs.hl(),
            StackReg::Af => self.regs.af(),
        }
    }

    #[inline]
    pub(super) fn set_stack_reg(&mut self, reg: StackReg, value: u16) {
        match reg {
            StackReg::Bc => self.regs.set_bc(value),
            StackReg::De => self.regs.set_de(value),
            StackReg::Hl => self.regs.set_hl(value),
            StackReg::Af => self.regs.set_af(value),
        }
    }

    #[inline]
    pub(super) fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::Always => true,
            Cond::Nz => !self.regs.flag(Flag::Z),
            Cond::Z => self.regs.flag(Flag::Z),
            Cond::Nc => !self.regs.flag(Flag::C),
            Cond::C => self.regs.flag(Flag::C),
        }
    }
}

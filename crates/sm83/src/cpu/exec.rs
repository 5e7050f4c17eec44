mod alu;
mod control;
mod ld;
mod stack;
mod system;

use super::decode::Instr;
use super::{Bus, Cpu};

impl Cpu {
    /// Execute one decoded, unprefixed instruction.
    ///
    /// Returns whether a conditional branch was taken, which selects the
    /// longer cycle cost from the opcode table. Unconditional instructions
    /// return `true`.
    pub(super) fn exec<B: Bus>(&mut self, bus: &mut B, instr: Instr) -> bool {
        match instr {
            Instr::Nop => {}
            Instr::Stop => self.exec_stop(bus),
            Instr::Halt => self.exec_halt(bus),
            Instr::Di => self.exec_di(),
            Instr::Ei => self.exec_ei(),

            Instr::Ld { dst, src } => self.exec_ld(bus, dst, src),
            Instr::Ld16Imm(reg) => self.exec_ld16_imm(bus, reg),
            Instr::LdImm16Sp => self.exec_ld_imm16_sp(bus),
            Instr::LdSpHl => self.regs.sp = self.regs.hl(),
            Instr::LdHlSpOffset => self.exec_ld_hl_sp_offset(bus),
            Instr::AddSpOffset => self.exec_add_sp_offset(bus),

            Instr::Alu(op, src) => self.exec_alu(bus, op, src),
            Instr::Inc(target) => self.exec_inc(bus, target),
            Instr::Dec(target) => self.exec_dec(bus, target),
            Instr::Inc16(reg) => {
                let value = self.reg16(reg).wrapping_add(1);
                self.set_reg16(reg, value);
            }
            Instr::Dec16(reg) => {
                let value = self.reg16(reg).wrapping_sub(1);
                self.set_reg16(reg, value);
            }
            Instr::AddHl(reg) => self.exec_add_hl(reg),
            Instr::RotateA(op) => self.exec_rotate_a(op),
            Instr::Daa => self.exec_daa(),
            Instr::Cpl => self.exec_cpl(),
            Instr::Scf => self.exec_scf(),
            Instr::Ccf => self.exec_ccf(),

            Instr::Jr(cond) => return self.exec_jr(bus, cond),
            Instr::Jp(cond) => return self.exec_jp(bus, cond),
            Instr::JpHl => self.regs.pc = self.regs.hl(),
            Instr::Call(cond) => return self.exec_call(bus, cond),
            Instr::Ret(cond) => return self.exec_ret(bus, cond),
            Instr::Reti => self.exec_reti(bus),
            Instr::Rst(vector) => self.exec_rst(bus, vector),
            Instr::Push(reg) => self.exec_push(bus, reg),
            Instr::Pop(reg) => self.exec_pop(bus, reg),

            Instr::Prefix
            | Instr::Illegal
            | Instr::Shift(..)
            | Instr::Bit(..)
            | Instr::Res(..)
            | Instr::Set(..) => {
                unreachable!("{:?} is not an unprefixed instruction", instr)
            }
        }
        true
    }
}

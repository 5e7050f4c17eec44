use super::alu;
use super::decode::Instr;
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Execute a CB-prefixed instruction (rotates, shifts and bit operations).
    pub(super) fn exec_cb<B: Bus>(&mut self, bus: &mut B, instr: Instr) {
        match instr {
            Instr::Shift(op, target) => {
                let value = self.read_loc(bus, target);
                let out = alu::shift(op, value, self.regs.flag(Flag::C));
                self.write_loc(bus, target, out.value);
                self.regs.apply_flags(out.flags);
            }
            Instr::Bit(index, target) => {
                let value = self.read_loc(bus, target);
                self.regs.apply_flags(alu::bit(index, value));
            }
            // SET/RES never touch flags.
            Instr::Res(index, target) => {
                let value = self.read_loc(bus, target);
                self.write_loc(bus, target, alu::res_bit(index, value));
            }
            Instr::Set(index, target) => {
                let value = self.read_loc(bus, target);
                self.write_loc(bus, target, alu::set_bit(index, value));
            }
            _ => unreachable!("{:?} is not a CB instruction", instr),
        }
    }
}

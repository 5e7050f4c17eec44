use std::fmt;

use super::{Bus, Cpu, Registers};

/// CPU state at the start of a step, in the fixed log format used by
/// external trace comparison tools:
///
/// ```text
/// A:01 F:B0 B:00 C:13 D:00 E:D8 H:01 L:4D SP:FFFE PC:0100 PCMEM:00,C3,13,02
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceLine {
    pub regs: Registers,
    /// Four bytes starting at PC (wrapping at 0xFFFF).
    pub pcmem: [u8; 4],
}

impl TraceLine {
    pub fn capture<B: Bus>(regs: &Registers, bus: &mut B) -> Self {
        let pc = regs.pc;
        let pcmem = std::array::from_fn(|i| bus.read8(pc.wrapping_add(i as u16)));
        Self { regs: *regs, pcmem }
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.regs;
        let [m0, m1, m2, m3] = self.pcmem;
        write!(
            f,
            "A:{:02X} F:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} PC:{:04X} PCMEM:{:02X},{:02X},{:02X},{:02X}",
            r.a, r.f, r.b, r.c, r.d, r.e, r.h, r.l, r.sp, r.pc, m0, m1, m2, m3
        )
    }
}

/// Receiver for per-step trace lines.
pub trait TraceSink {
    fn trace(&mut self, line: &TraceLine);
}

impl<F: FnMut(&TraceLine)> TraceSink for F {
    fn trace(&mut self, line: &TraceLine) {
        self(line)
    }
}

impl Cpu {
    pub(super) fn emit_trace<B: Bus>(&mut self, bus: &mut B) {
        if let Some(sink) = self.trace.as_mut() {
            let line = TraceLine::capture(&self.regs, bus);
            sink.trace(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatBus([u8; 0x10000]);

    impl Bus for FlatBus {
        fn read8(&mut self, addr: u16) -> u8 {
            self.0[addr as usize]
        }

        fn write8(&mut self, addr: u16, value: u8) {
            self.0[addr as usize] = value;
        }
    }

    #[test]
    fn post_boot_line_matches_reference_format() {
        let mut bus = FlatBus([0; 0x10000]);
        bus.0[0x100..0x104].copy_from_slice(&[0x00, 0xC3, 0x13, 0x02]);

        let mut cpu = Cpu::new();
        cpu.set_post_boot_state();
        let line = TraceLine::capture(&cpu.regs, &mut bus);
        assert_eq!(
            line.to_string(),
            "A:01 F:B0 B:00 C:13 D:00 E:D8 H:01 L:4D SP:FFFE PC:0100 PCMEM:00,C3,13,02"
        );
    }

    #[test]
    fn pcmem_wraps_around_the_address_space() {
        let mut bus = FlatBus([0; 0x10000]);
        bus.0[0xFFFE] = 0xAA;
        bus.0[0xFFFF] = 0xBB;
        bus.0[0x0000] = 0xCC;
        bus.0[0x0001] = 0xDD;

        let regs = Registers {
            pc: 0xFFFE,
            ..Registers::default()
        };
        let line = TraceLine::capture(&regs, &mut bus);
        assert_eq!(line.pcmem, [0xAA, 0xBB, 0xCC, 0xDD]);
        assert!(line.to_string().ends_with("PC:FFFE PCMEM:AA,BB,CC,DD"));
    }
}

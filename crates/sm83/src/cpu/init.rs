use std::rc::Rc;

use super::{Cpu, InterruptTiming, IfWriteLatch, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in its power-on state: every register zero, IME clear.
    ///
    /// This is the state the boot ROM starts from. Use
    /// [`Cpu::set_post_boot_state`] to start directly at the cartridge entry
    /// point instead.
    pub fn new() -> Self {
        Self {
            regs: Registers::default(),
            ime: false,
            halted: false,
            stopped: false,
            halt_bug: false,
            ime_enable_pending: false,
            ime_enable_delay: false,
            locked: None,
            interrupt_timing: InterruptTiming::default(),
            if_latch: Rc::new(IfWriteLatch::default()),
            trace: None,
        }
    }

    /// Reset to the power-on state.
    ///
    /// The interrupt timing policy, trace sink and IF-write observer survive
    /// a reset; everything else, including the illegal-opcode lock, is
    /// cleared.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.ime = false;
        self.halted = false;
        self.stopped = false;
        self.halt_bug = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        self.locked = None;
        self.if_latch.clear();
    }

    /// Load the register values the DMG boot ROM leaves behind when it
    /// hands control to the cartridge at 0x0100.
    pub fn set_post_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0; // Z=1 N=0 H=1 C=1
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;

        // IME is clear at 0x0100; the cartridge enables interrupts itself.
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }
}

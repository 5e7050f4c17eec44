//! Divider and timer unit (DIV/TIMA/TMA/TAC at 0xFF04–0xFF07).

use crate::interrupt::Interrupts;

pub const DIV_ADDR: u16 = 0xFF04;
pub const TIMA_ADDR: u16 = 0xFF05;
pub const TMA_ADDR: u16 = 0xFF06;
pub const TAC_ADDR: u16 = 0xFF07;

const TAC_ENABLE: u8 = 0x04;

/// Timer state.
///
/// Time only advances through [`Timer::step`]; register reads and writes
/// never move the clock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    /// Free-running system counter; DIV is its upper byte.
    internal_counter: u16,
    tima: u8,
    tma: u8,
    /// TAC, lower 3 bits only.
    tac: u8,
    /// Cycles accumulated towards the next TIMA increment.
    elapsed: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer as left by the DMG boot ROM: DIV reads 0xAB.
    pub fn post_boot() -> Self {
        Self {
            internal_counter: 0xAB00,
            ..Self::default()
        }
    }

    #[inline]
    pub fn div(&self) -> u8 {
        (self.internal_counter >> 8) as u8
    }

    #[inline]
    pub fn tima(&self) -> u8 {
        self.tima
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.tac & TAC_ENABLE != 0
    }

    /// T-cycles per TIMA increment for the current TAC rate.
    pub fn period(&self) -> u32 {
        match self.tac & 0x03 {
            0b00 => 1024,
            0b01 => 16,
            0b10 => 64,
            _ => 256,
        }
    }

    /// Advance by `cycles` T-cycles. Returns the timer interrupt if TIMA
    /// overflowed at least once.
    pub fn step(&mut self, cycles: u32) -> Interrupts {
        self.internal_counter = self.internal_counter.wrapping_add(cycles as u16);

        if !self.enabled() {
            return Interrupts::empty();
        }

        let mut raised = Interrupts::empty();
        self.elapsed += cycles;
        let period = self.period();
        while self.elapsed >= period {
            self.elapsed -= period;
            let (tima, overflow) = self.tima.overflowing_add(1);
            if overflow {
                self.tima = self.tma;
                raised |= Interrupts::TIMER;
            } else {
                self.tima = tima;
            }
        }
        raised
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            DIV_ADDR => self.div(),
            TIMA_ADDR => self.tima,
            TMA_ADDR => self.tma,
            TAC_ADDR => self.tac | 0xF8,
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // Any write clears the whole divider.
            DIV_ADDR => {
                self.internal_counter = 0;
                self.elapsed = 0;
            }
            TIMA_ADDR => self.tima = value,
            TMA_ADDR => self.tma = value,
            TAC_ADDR => self.tac = value & 0x07,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_is_the_upper_counter_byte() {
        let mut timer = Timer::new();
        timer.step(255);
        assert_eq!(timer.read(DIV_ADDR), 0);
        timer.step(1);
        assert_eq!(timer.read(DIV_ADDR), 1);

        timer.write(DIV_ADDR, 0x77);
        assert_eq!(timer.read(DIV_ADDR), 0);
        assert_eq!(Timer::post_boot().read(DIV_ADDR), 0xAB);
    }

    #[test]
    fn tac_reads_back_with_upper_bits_set() {
        let mut timer = Timer::new();
        assert_eq!(timer.read(TAC_ADDR), 0xF8);
        timer.write(TAC_ADDR, 0xFD);
        assert_eq!(timer.read(TAC_ADDR), 0xFD);
        assert_eq!(timer.period(), 16);
    }

    #[test]
    fn tima_rates() {
        for (tac, period) in [(0x04, 1024), (0x05, 16), (0x06, 64), (0x07, 256)] {
            let mut timer = Timer::new();
            timer.write(TAC_ADDR, tac);
            timer.step(period - 4);
            assert_eq!(timer.tima(), 0, "TAC {tac:02X}");
            timer.step(4);
            assert_eq!(timer.tima(), 1, "TAC {tac:02X}");
            timer.step(period * 3);
            assert_eq!(timer.tima(), 4, "TAC {tac:02X}");
        }
    }

    #[test]
    fn disabled_timer_only_moves_div() {
        let mut timer = Timer::new();
        timer.write(TAC_ADDR, 0x01);
        assert_eq!(timer.step(4096), Interrupts::empty());
        assert_eq!(timer.tima(), 0);
        assert_eq!(timer.div(), 0x10);
    }

    #[test]
    fn overflow_reloads_tma_and_raises_interrupt() {
        let mut timer = Timer::new();
        timer.write(TMA_ADDR, 0xF0);
        timer.write(TIMA_ADDR, 0xFF);
        timer.write(TAC_ADDR, 0x05);

        assert_eq!(timer.step(12), Interrupts::empty());
        assert_eq!(timer.step(4), Interrupts::TIMER);
        assert_eq!(timer.tima(), 0xF0);
    }
}

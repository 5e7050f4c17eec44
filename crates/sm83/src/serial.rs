//! Serial port (SB at 0xFF01, SC at 0xFF02).

use crate::interrupt::Interrupts;

pub const SB_ADDR: u16 = 0xFF01;
pub const SC_ADDR: u16 = 0xFF02;

/// T-cycles for one 8-bit transfer on the internal clock (8192 Hz).
pub const TRANSFER_CYCLES: u32 = 4096;

const SC_START: u8 = 0x80;
const SC_INTERNAL_CLOCK: u8 = 0x01;

/// Serial peripheral as seen by the address space.
pub trait SerialInterface {
    fn read_sb(&self) -> u8;
    fn write_sb(&mut self, value: u8);
    fn read_sc(&self) -> u8;
    fn write_sc(&mut self, value: u8);
    /// Advance by `cycles` T-cycles; returns interrupts to request.
    fn step(&mut self, cycles: u32) -> Interrupts;
}

/// Serial port with no link partner.
///
/// A transfer starts when SC has both the start bit and the internal clock
/// bit set. The outgoing byte goes to the optional sink (test ROMs print
/// through this), and after [`TRANSFER_CYCLES`] SB reads 0xFF, the start bit
/// clears and the serial interrupt is raised.
pub struct Serial {
    sb: u8,
    sc: u8,
    remaining: Option<u32>,
    sink: Option<Box<dyn FnMut(u8)>>,
}

impl Default for Serial {
    fn default() -> Self {
        Self::new()
    }
}

impl Serial {
    pub fn new() -> Self {
        Self {
            sb: 0x00,
            sc: 0x7E,
            remaining: None,
            sink: None,
        }
    }

    /// Serial port that hands every transmitted byte to `sink`.
    pub fn with_sink(sink: impl FnMut(u8) + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            ..Self::new()
        }
    }

    #[inline]
    pub fn transfer_in_progress(&self) -> bool {
        self.remaining.is_some()
    }
}

impl SerialInterface for Serial {
    fn read_sb(&self) -> u8 {
        self.sb
    }

    fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    fn read_sc(&self) -> u8 {
        // Unused bits read as 1.
        self.sc | 0x7E
    }

    fn write_sc(&mut self, value: u8) {
        self.sc = value;
        if value & (SC_START | SC_INTERNAL_CLOCK) == SC_START | SC_INTERNAL_CLOCK {
            log::debug!("serial out: 0x{:02X} {:?}", self.sb, self.sb as char);
            if let Some(sink) = self.sink.as_mut() {
                sink(self.sb);
            }
            self.remaining = Some(TRANSFER_CYCLES);
        } else if value & SC_START == 0 {
            self.remaining = None;
        }
    }

    fn step(&mut self, cycles: u32) -> Interrupts {
        let Some(remaining) = self.remaining else {
            return Interrupts::empty();
        };

        if cycles < remaining {
            self.remaining = Some(remaining - cycles);
            return Interrupts::empty();
        }

        self.remaining = None;
        self.sb = 0xFF;
        self.sc &= !SC_START;
        Interrupts::SERIAL
    }
}

use super::alu::FlagUpdate;

/// Register file of the SM83.
///
/// Only the eight 8-bit registers and SP/PC are stored. The 16-bit pairs
/// (AF, BC, DE, HL) are views that compose and split those bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f & 0xF0])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        // Lower 4 bits of F are always zero.
        self.f = f & 0xF0;
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        self.f = value & 0xF0;
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.f & flag.mask() != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.f |= flag.mask();
        } else {
            self.f &= !flag.mask();
        }
    }

    /// Apply a per-instruction flag outcome. Flags the update leaves as
    /// `None` keep their current value.
    pub fn apply_flags(&mut self, update: FlagUpdate) {
        let FlagUpdate { z, n, h, c } = update;
        for (flag, value) in [(Flag::Z, z), (Flag::N, n), (Flag::H, h), (Flag::C, c)] {
            if let Some(value) = value {
                self.set_flag(flag, value);
            }
        }
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

impl Flag {
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

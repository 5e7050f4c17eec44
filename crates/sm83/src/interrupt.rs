use bitflags::bitflags;

/// Address of the interrupt flag register (IF).
pub const IF_ADDR: u16 = 0xFF0F;
/// Address of the interrupt enable register (IE).
pub const IE_ADDR: u16 = 0xFFFF;

bitflags! {
    /// Interrupt sources as they appear in IE and IF.
    ///
    /// Lower bits have higher priority.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Interrupts: u8 {
        const VBLANK = 0x01;
        const LCD_STAT = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

impl Interrupts {
    /// The highest-priority source in the set, if any.
    pub fn highest_priority(self) -> Option<Interrupts> {
        let bits = self.bits() & Self::all().bits();
        if bits == 0 {
            return None;
        }
        Some(Interrupts::from_bits_truncate(bits & bits.wrapping_neg()))
    }

    /// Handler address for a single source.
    ///
    /// For a set with several bits the highest-priority source wins.
    pub fn vector(self) -> u16 {
        let index = (self.bits() & Self::all().bits()).trailing_zeros() as u16;
        0x0040 + index * 8
    }
}

/// Receives notifications about program writes to IF.
///
/// The address space calls this on every IF write with the value before and
/// after the write. The CPU implements it to hold back freshly set bits for
/// one instruction boundary.
pub trait IfWriteObserver {
    fn if_written(&self, old: u8, new: u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bits_win() {
        let pending = Interrupts::TIMER | Interrupts::JOYPAD | Interrupts::LCD_STAT;
        assert_eq!(pending.highest_priority(), Some(Interrupts::LCD_STAT));
        assert_eq!(Interrupts::empty().highest_priority(), None);
        assert_eq!(
            Interrupts::from_bits_retain(0xE0).highest_priority(),
            None
        );
    }

    #[test]
    fn vectors() {
        assert_eq!(Interrupts::VBLANK.vector(), 0x40);
        assert_eq!(Interrupts::LCD_STAT.vector(), 0x48);
        assert_eq!(Interrupts::TIMER.vector(), 0x50);
        assert_eq!(Interrupts::SERIAL.vector(), 0x58);
        assert_eq!(Interrupts::JOYPAD.vector(), 0x60);
    }
}

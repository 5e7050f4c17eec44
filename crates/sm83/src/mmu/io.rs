//! I/O register map: which addresses exist and what they hold at power-on
//! and after the boot ROM.

/// Boot ROM disable register.
pub const BOOT_ROM_DISABLE_ADDR: u16 = 0xFF50;

/// Whether `addr` in 0xFF00–0xFF7F is backed by a register.
///
/// Everything else in the page reads 0xFF and ignores writes.
pub fn is_mapped(addr: u16) -> bool {
    matches!(
        addr,
        0xFF00..=0xFF02
            | 0xFF04..=0xFF07
            | 0xFF0F
            | 0xFF10..=0xFF14
            | 0xFF16..=0xFF1E
            | 0xFF20..=0xFF26
            | 0xFF30..=0xFF3F
            | 0xFF40..=0xFF4B
            | 0xFF50
    )
}

/// Power-on values that differ from zero.
pub(super) const POWER_ON: [(u16, u8); 2] = [
    (0xFF00, 0xCF), // P1
    (0xFF02, 0x7E), // SC
];

/// Register values the DMG boot ROM leaves behind at 0x0100.
pub(super) const POST_BOOT: [(u16, u8); 43] = [
    (0xFF00, 0xCF), // P1
    (0xFF01, 0x00), // SB
    (0xFF02, 0x7E), // SC
    (0xFF04, 0xAB), // DIV
    (0xFF05, 0x00), // TIMA
    (0xFF06, 0x00), // TMA
    (0xFF07, 0xF8), // TAC
    (0xFF0F, 0xE1), // IF
    (0xFF10, 0x80), // NR10
    (0xFF11, 0xBF), // NR11
    (0xFF12, 0xF3), // NR12
    (0xFF13, 0xFF), // NR13
    (0xFF14, 0xBF), // NR14
    (0xFF16, 0x3F), // NR21
    (0xFF17, 0x00), // NR22
    (0xFF18, 0xFF), // NR23
    (0xFF19, 0xBF), // NR24
    (0xFF1A, 0x7F), // NR30
    (0xFF1B, 0xFF), // NR31
    (0xFF1C, 0x9F), // NR32
    (0xFF1D, 0xFF), // NR33
    (0xFF1E, 0xBF), // NR34
    (0xFF20, 0xFF), // NR41
    (0xFF21, 0x00), // NR42
    (0xFF22, 0x00), // NR43
    (0xFF23, 0xBF), // NR44
    (0xFF24, 0x77), // NR50
    (0xFF25, 0xF3), // NR51
    (0xFF26, 0xF1), // NR52
    (0xFF40, 0x91), // LCDC
    (0xFF41, 0x85), // STAT
    (0xFF42, 0x00), // SCY
    (0xFF43, 0x00), // SCX
    (0xFF44, 0x00), // LY
    (0xFF45, 0x00), // LYC
    (0xFF46, 0xFF), // DMA
    (0xFF47, 0xFC), // BGP
    (0xFF48, 0xFF), // OBP0
    (0xFF49, 0xFF), // OBP1
    (0xFF4A, 0x00), // WY
    (0xFF4B, 0x00), // WX
    (BOOT_ROM_DISABLE_ADDR, 0x01),
    (0xFFFF, 0x00), // IE
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_edges() {
        assert!(is_mapped(0xFF00));
        assert!(!is_mapped(0xFF03));
        assert!(!is_mapped(0xFF08));
        assert!(is_mapped(0xFF0F));
        assert!(!is_mapped(0xFF15));
        assert!(!is_mapped(0xFF1F));
        assert!(!is_mapped(0xFF27));
        assert!(!is_mapped(0xFF2F));
        assert!(is_mapped(0xFF30));
        assert!(is_mapped(0xFF4B));
        assert!(!is_mapped(0xFF4C));
        assert!(is_mapped(0xFF50));
        assert!(!is_mapped(0xFF51));
        assert!(!is_mapped(0xFF7F));
    }

    #[test]
    fn seed_tables_only_name_real_registers() {
        for (addr, _) in POWER_ON.iter().chain(POST_BOOT.iter()) {
            assert!(is_mapped(*addr) || *addr == 0xFFFF, "{addr:04X}");
        }
    }
}

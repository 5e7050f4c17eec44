//! Arithmetic and flag rules.
//!
//! Every function here is a pure function of its operands: it returns the
//! result together with a [`FlagUpdate`] describing what the instruction does
//! to Z/N/H/C. A flag left as `None` is preserved by the instruction.

/// Flag outcome of a single instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlagUpdate {
    pub z: Option<bool>,
    pub n: Option<bool>,
    pub h: Option<bool>,
    pub c: Option<bool>,
}

impl FlagUpdate {
    /// Update that writes all four flags.
    #[inline]
    pub const fn all(z: bool, n: bool, h: bool, c: bool) -> Self {
        Self {
            z: Some(z),
            n: Some(n),
            h: Some(h),
            c: Some(c),
        }
    }

    /// Update that leaves every flag untouched.
    #[inline]
    pub const fn none() -> Self {
        Self {
            z: None,
            n: None,
            h: None,
            c: None,
        }
    }
}

/// Result byte plus flag outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOutput {
    pub value: u8,
    pub flags: FlagUpdate,
}

/// The eight accumulator operations selected by bits 3..5 of the opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub(crate) const ALL: [AluOp; 8] = [
        AluOp::Add,
        AluOp::Adc,
        AluOp::Sub,
        AluOp::Sbc,
        AluOp::And,
        AluOp::Xor,
        AluOp::Or,
        AluOp::Cp,
    ];
}

/// Rotate/shift family of the CB-prefixed table (and the four
/// accumulator rotates).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub(crate) const ALL: [ShiftOp; 8] = [
        ShiftOp::Rlc,
        ShiftOp::Rrc,
        ShiftOp::Rl,
        ShiftOp::Rr,
        ShiftOp::Sla,
        ShiftOp::Sra,
        ShiftOp::Swap,
        ShiftOp::Srl,
    ];
}

/// Apply one of the accumulator operations. `carry` is the current C flag
/// and only matters for ADC/SBC.
pub fn accumulate(op: AluOp, a: u8, value: u8, carry: bool) -> AluOutput {
    match op {
        AluOp::Add => add8(a, value, false),
        AluOp::Adc => add8(a, value, carry),
        AluOp::Sub => sub8(a, value, false),
        AluOp::Sbc => sub8(a, value, carry),
        AluOp::And => and8(a, value),
        AluOp::Xor => xor8(a, value),
        AluOp::Or => or8(a, value),
        AluOp::Cp => cp8(a, value),
    }
}

/// 8-bit ADD/ADC.
pub fn add8(a: u8, value: u8, carry_in: bool) -> AluOutput {
    let cin = carry_in as u16;
    let half = (a & 0x0F) as u16 + (value & 0x0F) as u16 + cin;
    let full = a as u16 + value as u16 + cin;
    let result = full as u8;
    AluOutput {
        value: result,
        flags: FlagUpdate::all(result == 0, false, half > 0x0F, full > 0xFF),
    }
}

/// 8-bit SUB/SBC.
pub fn sub8(a: u8, value: u8, carry_in: bool) -> AluOutput {
    let cin = carry_in as i16;
    let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - cin;
    let full = a as i16 - value as i16 - cin;
    let result = full as u8;
    AluOutput {
        value: result,
        flags: FlagUpdate::all(result == 0, true, half < 0, full < 0),
    }
}

#[inline]
pub fn and8(a: u8, value: u8) -> AluOutput {
    let result = a & value;
    AluOutput {
        value: result,
        flags: FlagUpdate::all(result == 0, false, true, false),
    }
}

#[inline]
pub fn or8(a: u8, value: u8) -> AluOutput {
    let result = a | value;
    AluOutput {
        value: result,
        flags: FlagUpdate::all(result == 0, false, false, false),
    }
}

#[inline]
pub fn xor8(a: u8, value: u8) -> AluOutput {
    let result = a ^ value;
    AluOutput {
        value: result,
        flags: FlagUpdate::all(result == 0, false, false, false),
    }
}

/// Compare: flags as for SUB, the returned value is `a` unchanged.
#[inline]
pub fn cp8(a: u8, value: u8) -> AluOutput {
    let flags = sub8(a, value, false).flags;
    AluOutput { value: a, flags }
}

/// INC r / INC (HL). C is preserved.
#[inline]
pub fn inc8(value: u8) -> AluOutput {
    let result = value.wrapping_add(1);
    AluOutput {
        value: result,
        flags: FlagUpdate {
            z: Some(result == 0),
            n: Some(false),
            h: Some((value & 0x0F) + 1 > 0x0F),
            c: None,
        },
    }
}

/// DEC r / DEC (HL). C is preserved.
#[inline]
pub fn dec8(value: u8) -> AluOutput {
    let result = value.wrapping_sub(1);
    AluOutput {
        value: result,
        flags: FlagUpdate {
            z: Some(result == 0),
            n: Some(true),
            h: Some((value & 0x0F) == 0),
            c: None,
        },
    }
}

/// ADD HL,rr. Z is preserved.
#[inline]
pub fn add16(hl: u16, value: u16) -> (u16, FlagUpdate) {
    let flags = FlagUpdate {
        z: None,
        n: Some(false),
        h: Some((hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF),
        c: Some(hl as u32 + value as u32 > 0xFFFF),
    };
    (hl.wrapping_add(value), flags)
}

/// Signed 8-bit offset added to SP (ADD SP,e8 and LD HL,SP+e8).
///
/// Z and N are forced to 0; H and C come from the unsigned addition of the
/// low byte of SP and the raw offset byte.
#[inline]
pub fn add_sp_offset(sp: u16, offset: u8) -> (u16, FlagUpdate) {
    let extended = offset as i8 as i16 as u16;
    let flags = FlagUpdate::all(
        false,
        false,
        (sp & 0x000F) + (extended & 0x000F) > 0x000F,
        (sp & 0x00FF) + (extended & 0x00FF) > 0x00FF,
    );
    (sp.wrapping_add(extended), flags)
}

/// CB-prefixed rotate/shift. `carry_in` is the current C flag, used by RL/RR.
pub fn shift(op: ShiftOp, value: u8, carry_in: bool) -> AluOutput {
    let (result, carry) = match op {
        ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        ShiftOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
        ShiftOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
        ShiftOp::Sla => (value << 1, value & 0x80 != 0),
        ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        ShiftOp::Swap => (value.rotate_left(4), false),
        ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
    };
    AluOutput {
        value: result,
        flags: FlagUpdate::all(result == 0, false, false, carry),
    }
}

/// RLCA/RRCA/RLA/RRA: same as the CB rotate but Z is always cleared.
pub fn rotate_a(op: ShiftOp, a: u8, carry_in: bool) -> AluOutput {
    debug_assert!(matches!(
        op,
        ShiftOp::Rlc | ShiftOp::Rrc | ShiftOp::Rl | ShiftOp::Rr
    ));
    let mut out = shift(op, a, carry_in);
    out.flags.z = Some(false);
    out
}

/// BIT b: Z is the complement of the tested bit, N=0, H=1, C preserved.
#[inline]
pub fn bit(index: u8, value: u8) -> FlagUpdate {
    FlagUpdate {
        z: Some(value & (1 << index) == 0),
        n: Some(false),
        h: Some(true),
        c: None,
    }
}

#[inline]
pub fn set_bit(index: u8, value: u8) -> u8 {
    value | (1 << index)
}

#[inline]
pub fn res_bit(index: u8, value: u8) -> u8 {
    value & !(1 << index)
}

/// Decimal adjust after a BCD addition or subtraction. N is preserved.
pub fn daa(a: u8, n: bool, h: bool, c: bool) -> AluOutput {
    let mut adjust: u8 = if c { 0x60 } else { 0x00 };
    if h {
        adjust |= 0x06;
    }

    let result = if !n {
        if (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if a > 0x99 {
            adjust |= 0x60;
        }
        a.wrapping_add(adjust)
    } else {
        a.wrapping_sub(adjust)
    };

    AluOutput {
        value: result,
        flags: FlagUpdate {
            z: Some(result == 0),
            n: None,
            h: Some(false),
            c: Some(adjust >= 0x60),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn add_matches_carry_formulas(a in any::<u8>(), b in any::<u8>()) {
            let out = add8(a, b, false);
            prop_assert_eq!(out.value, a.wrapping_add(b));
            prop_assert_eq!(out.flags.c, Some(a as u16 + b as u16 > 0xFF));
            prop_assert_eq!(out.flags.h, Some((a & 0x0F) + (b & 0x0F) > 0x0F));
            prop_assert_eq!(out.flags.n, Some(false));
            prop_assert_eq!(out.flags.z, Some(out.value == 0));
        }

        #[test]
        fn adc_adds_the_incoming_carry(a in any::<u8>(), b in any::<u8>(), cin in any::<bool>()) {
            let out = add8(a, b, cin);
            let sum = a as u16 + b as u16 + cin as u16;
            prop_assert_eq!(out.value, sum as u8);
            prop_assert_eq!(out.flags.c, Some(sum > 0xFF));
            prop_assert_eq!(
                out.flags.h,
                Some((a & 0x0F) as u16 + (b & 0x0F) as u16 + cin as u16 > 0x0F)
            );
        }

        #[test]
        fn sub_matches_borrow_formulas(a in any::<u8>(), b in any::<u8>(), cin in any::<bool>()) {
            let out = sub8(a, b, cin);
            prop_assert_eq!(out.value, a.wrapping_sub(b).wrapping_sub(cin as u8));
            prop_assert_eq!(out.flags.c, Some((a as i16) - (b as i16) - (cin as i16) < 0));
            prop_assert_eq!(out.flags.h, Some((b & 0x0F) + cin as u8 > (a & 0x0F)));
            prop_assert_eq!(out.flags.n, Some(true));
        }

        #[test]
        fn cp_is_sub_without_writeback(a in any::<u8>(), b in any::<u8>()) {
            let cp = cp8(a, b);
            prop_assert_eq!(cp.value, a);
            prop_assert_eq!(cp.flags, sub8(a, b, false).flags);
        }

        #[test]
        fn inc_dec_preserve_carry(v in any::<u8>()) {
            prop_assert_eq!(inc8(v).flags.c, None);
            prop_assert_eq!(dec8(v).flags.c, None);
            prop_assert_eq!(dec8(inc8(v).value).value, v);
        }

        #[test]
        fn add16_preserves_zero(hl in any::<u16>(), rr in any::<u16>()) {
            let (result, flags) = add16(hl, rr);
            prop_assert_eq!(result, hl.wrapping_add(rr));
            prop_assert_eq!(flags.z, None);
            prop_assert_eq!(flags.h, Some((hl & 0x0FFF) + (rr & 0x0FFF) > 0x0FFF));
            prop_assert_eq!(flags.c, Some(hl as u32 + rr as u32 > 0xFFFF));
        }

        #[test]
        fn sp_offset_uses_low_byte_only(sp in any::<u16>(), e in any::<u8>()) {
            let (result, flags) = add_sp_offset(sp, e);
            prop_assert_eq!(result, sp.wrapping_add(e as i8 as u16));
            prop_assert_eq!(flags.z, Some(false));
            prop_assert_eq!(flags.n, Some(false));
            prop_assert_eq!(flags.c, Some((sp & 0xFF) + e as u16 > 0xFF));
            prop_assert_eq!(flags.h, Some((sp & 0x0F) + (e & 0x0F) as u16 > 0x0F));
        }

        #[test]
        fn set_and_res_round_trip(index in 0u8..8, v in any::<u8>()) {
            let set = set_bit(index, v);
            prop_assert!(set & (1 << index) != 0);
            let cleared = res_bit(index, set);
            prop_assert_eq!(cleared & (1 << index), 0);
            prop_assert_eq!(cleared | (v & (1 << index)), v);
        }

        #[test]
        fn shifts_report_the_outgoing_bit(v in any::<u8>(), cin in any::<bool>()) {
            prop_assert_eq!(shift(ShiftOp::Rlc, v, cin).flags.c, Some(v & 0x80 != 0));
            prop_assert_eq!(shift(ShiftOp::Rl, v, cin).flags.c, Some(v & 0x80 != 0));
            prop_assert_eq!(shift(ShiftOp::Sla, v, cin).flags.c, Some(v & 0x80 != 0));
            prop_assert_eq!(shift(ShiftOp::Rrc, v, cin).flags.c, Some(v & 0x01 != 0));
            prop_assert_eq!(shift(ShiftOp::Rr, v, cin).flags.c, Some(v & 0x01 != 0));
            prop_assert_eq!(shift(ShiftOp::Sra, v, cin).flags.c, Some(v & 0x01 != 0));
            prop_assert_eq!(shift(ShiftOp::Srl, v, cin).flags.c, Some(v & 0x01 != 0));
            prop_assert_eq!(shift(ShiftOp::Swap, v, cin).flags.c, Some(false));
        }
    }

    #[test]
    fn sub_a_a_is_always_zero() {
        for a in 0..=0xFFu8 {
            let out = sub8(a, a, false);
            assert_eq!(out.value, 0);
            assert_eq!(out.flags, FlagUpdate::all(true, true, false, false));
        }
    }

    #[test]
    fn logical_ops_force_h_and_c() {
        assert_eq!(and8(0xF0, 0x0F).flags, FlagUpdate::all(true, false, true, false));
        assert_eq!(or8(0x00, 0x00).flags, FlagUpdate::all(true, false, false, false));
        assert_eq!(xor8(0xFF, 0x0F).value, 0xF0);
        assert_eq!(xor8(0xFF, 0x0F).flags, FlagUpdate::all(false, false, false, false));
    }

    #[test]
    fn rotates_through_carry() {
        // RL shifts the old carry into bit 0.
        let out = shift(ShiftOp::Rl, 0x80, true);
        assert_eq!(out.value, 0x01);
        assert_eq!(out.flags.c, Some(true));
        assert_eq!(out.flags.z, Some(false));

        // RR shifts the old carry into bit 7.
        let out = shift(ShiftOp::Rr, 0x01, false);
        assert_eq!(out.value, 0x00);
        assert_eq!(out.flags, FlagUpdate::all(true, false, false, true));
    }

    #[test]
    fn sra_keeps_sign_and_srl_clears_it() {
        assert_eq!(shift(ShiftOp::Sra, 0x81, false).value, 0xC0);
        assert_eq!(shift(ShiftOp::Srl, 0x81, false).value, 0x40);
        assert_eq!(shift(ShiftOp::Swap, 0xA5, true).value, 0x5A);
    }

    #[test]
    fn accumulator_rotates_clear_zero() {
        let out = rotate_a(ShiftOp::Rlc, 0x00, false);
        assert_eq!(out.value, 0x00);
        assert_eq!(out.flags.z, Some(false));
    }

    #[test]
    fn bit_preserves_carry() {
        assert_eq!(
            bit(3, 0x00),
            FlagUpdate {
                z: Some(true),
                n: Some(false),
                h: Some(true),
                c: None,
            }
        );
        assert_eq!(bit(7, 0x80).z, Some(false));
    }

    #[test]
    fn daa_after_addition_and_subtraction() {
        // 0x15 + 0x27 = 0x3C -> 0x42 in BCD.
        let out = daa(0x3C, false, false, false);
        assert_eq!(out.value, 0x42);
        assert_eq!(out.flags.c, Some(false));

        // 0x99 + 0x01 = 0x9A -> 0x00 with carry.
        let out = daa(0x9A, false, false, false);
        assert_eq!(out.value, 0x00);
        assert_eq!(out.flags.z, Some(true));
        assert_eq!(out.flags.c, Some(true));

        // 0x10 - 0x01 = 0x0F with half borrow -> 0x09.
        let out = daa(0x0F, true, true, false);
        assert_eq!(out.value, 0x09);
        assert_eq!(out.flags.n, None);
    }
}

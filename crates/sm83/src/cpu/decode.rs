//! Opcode tables.
//!
//! Both the unprefixed and the CB-prefixed opcode spaces are decoded once into
//! 256-entry tables of [`Opcode`] entries. Decoding follows the usual split of
//! the opcode byte into fields:
//!
//! ```text
//!   7 6 | 5 4 3 | 2 1 0
//!    x  |   y   |   z
//!       | p | q |
//! ```
//!
//! The executor only ever looks at the decoded [`Instr`]; cycle counts come
//! from the table as well so timing lives in one place.

use lazy_static::lazy_static;

use super::alu::{AluOp, ShiftOp};

/// 8-bit operand location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Loc8 {
    B,
    C,
    D,
    E,
    H,
    L,
    /// (HL)
    IndHl,
    A,
    /// d8 following the opcode.
    Imm,
    /// (BC)
    IndBc,
    /// (DE)
    IndDe,
    /// (HL+): HL is incremented after the access.
    IndHlInc,
    /// (HL-): HL is decremented after the access.
    IndHlDec,
    /// (a16)
    IndImm16,
    /// ($FF00 + a8)
    HighImm,
    /// ($FF00 + C)
    HighC,
}

impl Loc8 {
    /// Register order used by the `r[z]`/`r[y]` opcode fields.
    const TABLE: [Loc8; 8] = [
        Loc8::B,
        Loc8::C,
        Loc8::D,
        Loc8::E,
        Loc8::H,
        Loc8::L,
        Loc8::IndHl,
        Loc8::A,
    ];

    #[inline]
    fn from_index(index: u8) -> Self {
        Self::TABLE[(index & 0x07) as usize]
    }

    /// Whether this operand touches memory through a register or immediate
    /// address (i.e. anything other than a plain register or d8).
    #[inline]
    pub fn is_memory(self) -> bool {
        !matches!(
            self,
            Loc8::A | Loc8::B | Loc8::C | Loc8::D | Loc8::E | Loc8::H | Loc8::L | Loc8::Imm
        )
    }
}

/// 16-bit register pair selected by the `rp[p]` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg16 {
    Bc,
    De,
    Hl,
    Sp,
}

/// 16-bit register pair selected by the `rp2[p]` field (PUSH/POP).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackReg {
    Bc,
    De,
    Hl,
    Af,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Always,
    Nz,
    Z,
    Nc,
    C,
}

impl Cond {
    #[inline]
    fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Cond::Nz,
            1 => Cond::Z,
            2 => Cond::Nc,
            _ => Cond::C,
        }
    }
}

/// Decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instr {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// CB prefix: the real instruction is in the second table.
    Prefix,
    /// One of the eleven opcode holes.
    Illegal,

    Ld { dst: Loc8, src: Loc8 },
    Ld16Imm(Reg16),
    LdImm16Sp,
    LdSpHl,
    LdHlSpOffset,
    AddSpOffset,

    Alu(AluOp, Loc8),
    Inc(Loc8),
    Dec(Loc8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),

    RotateA(ShiftOp),
    Daa,
    Cpl,
    Scf,
    Ccf,

    Jr(Cond),
    Jp(Cond),
    JpHl,
    Call(Cond),
    Ret(Cond),
    Reti,
    Rst(u8),
    Push(StackReg),
    Pop(StackReg),

    Shift(ShiftOp, Loc8),
    Bit(u8, Loc8),
    Res(u8, Loc8),
    Set(u8, Loc8),
}

/// One table entry: the decoded instruction plus its T-cycle cost.
///
/// `cycles` is the cost when a conditional branch is not taken (or the only
/// cost for unconditional instructions); `cycles_taken` is the cost when it
/// is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub instr: Instr,
    pub cycles: u32,
    pub cycles_taken: u32,
}

impl Opcode {
    const fn new(instr: Instr, cycles: u32) -> Self {
        Self {
            instr,
            cycles,
            cycles_taken: cycles,
        }
    }

    const fn branch(instr: Instr, not_taken: u32, taken: u32) -> Self {
        Self {
            instr,
            cycles: not_taken,
            cycles_taken: taken,
        }
    }
}

/// Opcodes that hard-lock the CPU on real hardware.
pub const ILLEGAL_OPCODES: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

lazy_static! {
    static ref OPCODES: [Opcode; 256] = std::array::from_fn(|op| decode(op as u8));
    static ref CB_OPCODES: [Opcode; 256] = std::array::from_fn(|op| decode_cb(op as u8));
}

/// Look up an unprefixed opcode.
#[inline]
pub fn opcode(op: u8) -> &'static Opcode {
    &OPCODES[op as usize]
}

/// Look up a CB-prefixed opcode (the byte after 0xCB).
#[inline]
pub fn cb_opcode(op: u8) -> &'static Opcode {
    &CB_OPCODES[op as usize]
}

const RP: [Reg16; 4] = [Reg16::Bc, Reg16::De, Reg16::Hl, Reg16::Sp];
const RP2: [StackReg; 4] = [StackReg::Bc, StackReg::De, StackReg::Hl, StackReg::Af];

fn decode(op: u8) -> Opcode {
    let x = op >> 6;
    let y = (op >> 3) & 0x07;
    let z = op & 0x07;
    let p = (y >> 1) as usize;
    let q = y & 0x01;

    match (x, z) {
        (0, 0) => match y {
            0 => Opcode::new(Instr::Nop, 4),
            1 => Opcode::new(Instr::LdImm16Sp, 20),
            2 => Opcode::new(Instr::Stop, 4),
            3 => Opcode::new(Instr::Jr(Cond::Always), 12),
            _ => Opcode::branch(Instr::Jr(Cond::from_index(y - 4)), 8, 12),
        },
        (0, 1) if q == 0 => Opcode::new(Instr::Ld16Imm(RP[p]), 12),
        (0, 1) => Opcode::new(Instr::AddHl(RP[p]), 8),
        (0, 2) => {
            let mem = [Loc8::IndBc, Loc8::IndDe, Loc8::IndHlInc, Loc8::IndHlDec][p];
            let instr = if q == 0 {
                Instr::Ld { dst: mem, src: Loc8::A }
            } else {
                Instr::Ld { dst: Loc8::A, src: mem }
            };
            Opcode::new(instr, 8)
        }
        (0, 3) if q == 0 => Opcode::new(Instr::Inc16(RP[p]), 8),
        (0, 3) => Opcode::new(Instr::Dec16(RP[p]), 8),
        (0, 4) | (0, 5) => {
            let target = Loc8::from_index(y);
            let instr = if z == 4 { Instr::Inc(target) } else { Instr::Dec(target) };
            Opcode::new(instr, if target == Loc8::IndHl { 12 } else { 4 })
        }
        (0, 6) => {
            let dst = Loc8::from_index(y);
            let cycles = if dst == Loc8::IndHl { 12 } else { 8 };
            Opcode::new(Instr::Ld { dst, src: Loc8::Imm }, cycles)
        }
        (0, _) => {
            let instr = match y {
                0 => Instr::RotateA(ShiftOp::Rlc),
                1 => Instr::RotateA(ShiftOp::Rrc),
                2 => Instr::RotateA(ShiftOp::Rl),
                3 => Instr::RotateA(ShiftOp::Rr),
                4 => Instr::Daa,
                5 => Instr::Cpl,
                6 => Instr::Scf,
                _ => Instr::Ccf,
            };
            Opcode::new(instr, 4)
        }

        (1, _) if op == 0x76 => Opcode::new(Instr::Halt, 4),
        (1, _) => {
            let dst = Loc8::from_index(y);
            let src = Loc8::from_index(z);
            let cycles = if dst == Loc8::IndHl || src == Loc8::IndHl { 8 } else { 4 };
            Opcode::new(Instr::Ld { dst, src }, cycles)
        }

        (2, _) => {
            let src = Loc8::from_index(z);
            let cycles = if src == Loc8::IndHl { 8 } else { 4 };
            Opcode::new(Instr::Alu(AluOp::ALL[y as usize], src), cycles)
        }

        (_, 0) => match y {
            0..=3 => Opcode::branch(Instr::Ret(Cond::from_index(y)), 8, 20),
            4 => Opcode::new(Instr::Ld { dst: Loc8::HighImm, src: Loc8::A }, 12),
            5 => Opcode::new(Instr::AddSpOffset, 16),
            6 => Opcode::new(Instr::Ld { dst: Loc8::A, src: Loc8::HighImm }, 12),
            _ => Opcode::new(Instr::LdHlSpOffset, 12),
        },
        (_, 1) if q == 0 => Opcode::new(Instr::Pop(RP2[p]), 12),
        (_, 1) => match p {
            0 => Opcode::new(Instr::Ret(Cond::Always), 16),
            1 => Opcode::new(Instr::Reti, 16),
            2 => Opcode::new(Instr::JpHl, 4),
            _ => Opcode::new(Instr::LdSpHl, 8),
        },
        (_, 2) => match y {
            0..=3 => Opcode::branch(Instr::Jp(Cond::from_index(y)), 12, 16),
            4 => Opcode::new(Instr::Ld { dst: Loc8::HighC, src: Loc8::A }, 8),
            5 => Opcode::new(Instr::Ld { dst: Loc8::IndImm16, src: Loc8::A }, 16),
            6 => Opcode::new(Instr::Ld { dst: Loc8::A, src: Loc8::HighC }, 8),
            _ => Opcode::new(Instr::Ld { dst: Loc8::A, src: Loc8::IndImm16 }, 16),
        },
        (_, 3) => match y {
            0 => Opcode::new(Instr::Jp(Cond::Always), 16),
            1 => Opcode::new(Instr::Prefix, 0),
            6 => Opcode::new(Instr::Di, 4),
            7 => Opcode::new(Instr::Ei, 4),
            _ => Opcode::new(Instr::Illegal, 0),
        },
        (_, 4) => match y {
            0..=3 => Opcode::branch(Instr::Call(Cond::from_index(y)), 12, 24),
            _ => Opcode::new(Instr::Illegal, 0),
        },
        (_, 5) if q == 0 => Opcode::new(Instr::Push(RP2[p]), 16),
        (_, 5) => match p {
            0 => Opcode::new(Instr::Call(Cond::Always), 24),
            _ => Opcode::new(Instr::Illegal, 0),
        },
        (_, 6) => Opcode::new(Instr::Alu(AluOp::ALL[y as usize], Loc8::Imm), 8),
        (_, _) => Opcode::new(Instr::Rst(y * 8), 16),
    }
}

fn decode_cb(op: u8) -> Opcode {
    let x = op >> 6;
    let y = (op >> 3) & 0x07;
    let target = Loc8::from_index(op);
    let on_hl = target == Loc8::IndHl;

    match x {
        0 => Opcode::new(
            Instr::Shift(ShiftOp::ALL[y as usize], target),
            if on_hl { 16 } else { 8 },
        ),
        // BIT only reads (HL), so it is one memory cycle shorter.
        1 => Opcode::new(Instr::Bit(y, target), if on_hl { 12 } else { 8 }),
        2 => Opcode::new(Instr::Res(y, target), if on_hl { 16 } else { 8 }),
        _ => Opcode::new(Instr::Set(y, target), if on_hl { 16 } else { 8 }),
    }
}

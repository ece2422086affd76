//! Opcode tables and instruction encoders for the supported MIPS subset.
//!
//! Field layout (bit ranges inclusive):
//!
//! | field  | bits  |
//! |--------|-------|
//! | opcode | 31-26 |
//! | rs     | 25-21 |
//! | rt     | 20-16 |
//! | rd     | 15-11 |
//! | funct  | 5-0   |
//! | offset | 15-0  |
//! | target | 25-0  |

#![allow(clippy::cast_lossless)]

/// Primary opcode shared by all R-type instructions.
pub const OPCODE_RTYPE: u8 = 0x00;
/// `j target`.
pub const OPCODE_J: u8 = 0x02;
/// `beq rs, rt, offset`.
pub const OPCODE_BEQ: u8 = 0x04;
/// `addi rt, rs, imm`.
pub const OPCODE_ADDI: u8 = 0x08;
/// `lui rt, imm`.
pub const OPCODE_LUI: u8 = 0x0F;
/// `lw rt, offset(rs)`.
pub const OPCODE_LW: u8 = 0x23;
/// `sw rt, offset(rs)`.
pub const OPCODE_SW: u8 = 0x2B;
/// Effective opcode assigned to `slt` by alias resolution.
pub const OPCODE_SLT: u8 = 0x2A;
/// Effective opcode assigned to `sltu` by alias resolution; moved off `sw`'s `0x2B`.
pub const OPCODE_SLTU: u8 = 0x29;

/// R-type function code for `add`.
pub const FUNCT_ADD: u8 = 0x20;
/// R-type function code for `slt`.
pub const FUNCT_SLT: u8 = 0x2A;
/// R-type function code for `sltu`.
pub const FUNCT_SLTU: u8 = 0x2B;

/// Operations with a control vector in the decode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Operation {
    Addi,
    /// Every R-type whose function code is not an aliased compare.
    Add,
    Slt,
    Sw,
    Sltu,
    Lw,
    J,
    Beq,
    Lui,
}

/// Canonical effective-opcode table in decode order.
pub const OPERATION_TABLE: &[(u8, Operation)] = &[
    (OPCODE_ADDI, Operation::Addi),
    (OPCODE_RTYPE, Operation::Add),
    (OPCODE_SLT, Operation::Slt),
    (OPCODE_SW, Operation::Sw),
    (OPCODE_SLTU, Operation::Sltu),
    (OPCODE_LW, Operation::Lw),
    (OPCODE_J, Operation::J),
    (OPCODE_BEQ, Operation::Beq),
    (OPCODE_LUI, Operation::Lui),
];

impl Operation {
    /// Classifies an effective opcode.
    #[must_use]
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            OPCODE_ADDI => Some(Self::Addi),
            OPCODE_RTYPE => Some(Self::Add),
            OPCODE_SLT => Some(Self::Slt),
            OPCODE_SW => Some(Self::Sw),
            OPCODE_SLTU => Some(Self::Sltu),
            OPCODE_LW => Some(Self::Lw),
            OPCODE_J => Some(Self::J),
            OPCODE_BEQ => Some(Self::Beq),
            OPCODE_LUI => Some(Self::Lui),
            _ => None,
        }
    }

    /// Effective opcode consumed by decode.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        match self {
            Self::Addi => OPCODE_ADDI,
            Self::Add => OPCODE_RTYPE,
            Self::Slt => OPCODE_SLT,
            Self::Sw => OPCODE_SW,
            Self::Sltu => OPCODE_SLTU,
            Self::Lw => OPCODE_LW,
            Self::J => OPCODE_J,
            Self::Beq => OPCODE_BEQ,
            Self::Lui => OPCODE_LUI,
        }
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Addi => "addi",
            Self::Add => "add",
            Self::Slt => "slt",
            Self::Sw => "sw",
            Self::Sltu => "sltu",
            Self::Lw => "lw",
            Self::J => "j",
            Self::Beq => "beq",
            Self::Lui => "lui",
        }
    }
}

const fn imm_bits(imm: i16) -> u16 {
    u16::from_ne_bytes(imm.to_ne_bytes())
}

/// Encodes an R-type word (`opcode = 0`, `shamt = 0`).
#[must_use]
pub const fn encode_r(rs: u8, rt: u8, rd: u8, funct: u8) -> u32 {
    ((rs as u32 & 0x1F) << 21)
        | ((rt as u32 & 0x1F) << 16)
        | ((rd as u32 & 0x1F) << 11)
        | (funct as u32 & 0x3F)
}

/// Encodes an I-type word.
#[must_use]
pub const fn encode_i(opcode: u8, rs: u8, rt: u8, imm: u16) -> u32 {
    ((opcode as u32 & 0x3F) << 26)
        | ((rs as u32 & 0x1F) << 21)
        | ((rt as u32 & 0x1F) << 16)
        | imm as u32
}

/// Encodes a J-type word. `target` is the 26-bit word target.
#[must_use]
pub const fn encode_j(opcode: u8, target: u32) -> u32 {
    ((opcode as u32 & 0x3F) << 26) | (target & 0x03FF_FFFF)
}

/// `addi rt, rs, imm`
#[must_use]
pub const fn addi(rt: u8, rs: u8, imm: i16) -> u32 {
    encode_i(OPCODE_ADDI, rs, rt, imm_bits(imm))
}

/// `add rd, rs, rt`
#[must_use]
pub const fn add(rd: u8, rs: u8, rt: u8) -> u32 {
    encode_r(rs, rt, rd, FUNCT_ADD)
}

/// `slt rd, rs, rt`
#[must_use]
pub const fn slt(rd: u8, rs: u8, rt: u8) -> u32 {
    encode_r(rs, rt, rd, FUNCT_SLT)
}

/// `sltu rd, rs, rt`
#[must_use]
pub const fn sltu(rd: u8, rs: u8, rt: u8) -> u32 {
    encode_r(rs, rt, rd, FUNCT_SLTU)
}

/// `lw rt, offset(base)`
#[must_use]
pub const fn lw(rt: u8, offset: i16, base: u8) -> u32 {
    encode_i(OPCODE_LW, base, rt, imm_bits(offset))
}

/// `sw rt, offset(base)`
#[must_use]
pub const fn sw(rt: u8, offset: i16, base: u8) -> u32 {
    encode_i(OPCODE_SW, base, rt, imm_bits(offset))
}

/// `beq rs, rt, offset` where `offset` counts instructions past the next one.
#[must_use]
pub const fn beq(rs: u8, rt: u8, offset: i16) -> u32 {
    encode_i(OPCODE_BEQ, rs, rt, imm_bits(offset))
}

/// `j target` where `target` is a word index (`PC = target << 2`).
#[must_use]
pub const fn j(target: u32) -> u32 {
    encode_j(OPCODE_J, target)
}

/// `lui rt, imm`
#[must_use]
pub const fn lui(rt: u8, imm: u16) -> u32 {
    encode_i(OPCODE_LUI, 0, rt, imm)
}

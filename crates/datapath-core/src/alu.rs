//! Arithmetic/logic unit.

/// Operation selected by the 3-bit `ALUOp` control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum AluOp {
    /// `A + B`, wrapping.
    Add = 0,
    /// `A - B`, wrapping.
    Sub = 1,
    /// `1` when `A < B` as two's-complement values, else `0`.
    SetLessThan = 2,
    /// `1` when `A < B` as unsigned values, else `0`.
    SetLessThanUnsigned = 3,
    /// `A & B`.
    And = 4,
    /// `A | B`.
    Or = 5,
    /// `B << 16`, used by `lui`.
    ShiftLeft16 = 6,
    /// `!A`; `B` is ignored.
    Not = 7,
}

impl AluOp {
    /// Every operation in selector order.
    pub const ALL: [Self; 8] = [
        Self::Add,
        Self::Sub,
        Self::SetLessThan,
        Self::SetLessThanUnsigned,
        Self::And,
        Self::Or,
        Self::ShiftLeft16,
        Self::Not,
    ];

    /// Converts a raw selector into an operation. Values above 7 are rejected.
    #[must_use]
    pub const fn from_bits(selector: u8) -> Option<Self> {
        match selector {
            0 => Some(Self::Add),
            1 => Some(Self::Sub),
            2 => Some(Self::SetLessThan),
            3 => Some(Self::SetLessThanUnsigned),
            4 => Some(Self::And),
            5 => Some(Self::Or),
            6 => Some(Self::ShiftLeft16),
            7 => Some(Self::Not),
            _ => None,
        }
    }

    /// Returns the raw selector value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Result and zero flag produced by one ALU evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AluOutput {
    /// Computed 32-bit result.
    pub result: u32,
    /// Set when `result == 0`.
    pub zero: bool,
}

/// Evaluates `op` over operands `a` and `b`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn alu(a: u32, b: u32, op: AluOp) -> AluOutput {
    let result = match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::SetLessThan => {
            if (a as i32) < (b as i32) {
                1
            } else {
                0
            }
        }
        AluOp::SetLessThanUnsigned => {
            if a < b {
                1
            } else {
                0
            }
        }
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::ShiftLeft16 => b << 16,
        AluOp::Not => !a,
    };

    AluOutput {
        result,
        zero: result == 0,
    }
}

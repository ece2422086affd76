use std::fmt;

/// Number of general-purpose registers (`$0..$31`).
pub const REGISTER_COUNT: usize = 32;

/// Register index taken from a 5-bit instruction field.
///
/// Register 0 is an ordinary writable register here; nothing hardwires it
/// to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterIndex(u8);

impl RegisterIndex {
    /// Decodes a 5-bit value into a register index.
    #[must_use]
    pub const fn from_u5(bits: u8) -> Option<Self> {
        if bits < 32 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Extracts the register index held in the low five bits of `field`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_field(field: u32) -> Self {
        Self((field & 0x1F) as u8)
    }

    /// Returns the array index for this register (`0..=31`).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the register number as encoded in the instruction.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Iterates every register in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0_u8..32).map(Self)
    }
}

impl fmt::Display for RegisterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Bank of 32 general-purpose 32-bit registers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    regs: [u32; REGISTER_COUNT],
}

impl RegisterFile {
    /// Reads one register.
    #[must_use]
    pub const fn get(&self, reg: RegisterIndex) -> u32 {
        self.regs[reg.index()]
    }

    /// Writes one register unconditionally.
    pub const fn set(&mut self, reg: RegisterIndex, value: u32) {
        self.regs[reg.index()] = value;
    }

    /// Reads the two source operands of an instruction.
    #[must_use]
    pub const fn read_pair(&self, r1: RegisterIndex, r2: RegisterIndex) -> (u32, u32) {
        (self.regs[r1.index()], self.regs[r2.index()])
    }

    /// Stores `value` in `reg` only when `enable` is set.
    pub const fn write(&mut self, reg: RegisterIndex, value: u32, enable: bool) {
        if enable {
            self.regs[reg.index()] = value;
        }
    }

    /// Borrows the raw register contents.
    #[must_use]
    pub const fn as_array(&self) -> &[u32; REGISTER_COUNT] {
        &self.regs
    }
}

use thiserror::Error;

/// Halt classes used for reporting and exit-status policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HaltClass {
    /// Program reached its all-zero terminator word.
    EndOfProgram,
    /// Decoder could not produce a control vector.
    Decode,
    /// ALU dispatch rejected the control vector.
    Execute,
    /// Memory stage ended the run (halt address or unmapped access).
    Memory,
}

/// Every condition that stops the datapath.
///
/// All reasons are terminal for the current run. Callers that only need the
/// aggregated halt signal can ignore the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HaltReason {
    /// Fetched instruction word was all zero.
    #[error("end of program (all-zero instruction word)")]
    EndOfProgram,
    /// Effective opcode has no control vector.
    #[error("unsupported opcode 0x{opcode:02X}")]
    UnsupportedOpcode {
        /// Effective opcode after alias resolution.
        opcode: u8,
    },
    /// Control vector carried an ALU selector outside `0..=7`.
    #[error("invalid ALU operation selector {selector}")]
    InvalidAluSelector {
        /// Rejected selector value.
        selector: u8,
    },
    /// ALU-computed address targeted the reserved halt word.
    #[error("memory access at halt address 0x{address:08X}")]
    HaltAddressAccess {
        /// Byte address produced by the ALU.
        address: u32,
    },
    /// Program counter points past the end of memory.
    #[error("program counter 0x{pc:08X} is outside memory")]
    PcOutOfRange {
        /// Offending program counter.
        pc: u32,
    },
    /// Data access beyond the halt word.
    #[error("data address 0x{address:08X} is outside memory")]
    AddressOutOfRange {
        /// Byte address produced by the ALU.
        address: u32,
    },
}

impl HaltReason {
    /// Returns the reporting class for this halt reason.
    #[must_use]
    pub const fn class(self) -> HaltClass {
        match self {
            Self::EndOfProgram => HaltClass::EndOfProgram,
            Self::UnsupportedOpcode { .. } => HaltClass::Decode,
            Self::InvalidAluSelector { .. } => HaltClass::Execute,
            Self::HaltAddressAccess { .. }
            | Self::PcOutOfRange { .. }
            | Self::AddressOutOfRange { .. } => HaltClass::Memory,
        }
    }

    /// Designed termination paths: the zero word and the halt address.
    #[must_use]
    pub const fn is_clean_exit(self) -> bool {
        matches!(self, Self::EndOfProgram | Self::HaltAddressAccess { .. })
    }
}

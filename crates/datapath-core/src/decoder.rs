//! Instruction partition, opcode alias resolution, and control-signal decode.
//!
//! Decode is split into two pure steps: [`InstructionFields::partition`]
//! extracts the fixed fields and resolves the two R-type compare aliases into a
//! single effective opcode, then [`decode_controls`] maps that opcode onto the
//! control vector.

use crate::encoding::{Operation, FUNCT_SLT, FUNCT_SLTU, OPCODE_RTYPE, OPCODE_SLT, OPCODE_SLTU};
use crate::{HaltReason, RegisterIndex};

/// Fields extracted from one raw instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionFields {
    /// Effective opcode after alias resolution; this is what decode consumes.
    pub opcode: u8,
    /// Opcode exactly as encoded in bits 31-26.
    pub raw_opcode: u8,
    /// First source register (bits 25-21).
    pub rs: RegisterIndex,
    /// Second source / I-type destination register (bits 20-16).
    pub rt: RegisterIndex,
    /// R-type destination register (bits 15-11).
    pub rd: RegisterIndex,
    /// Function code (bits 5-0).
    pub funct: u8,
    /// Immediate / branch offset (bits 15-0).
    pub offset: u16,
    /// Jump target (bits 25-0).
    pub jump_target: u32,
}

impl InstructionFields {
    /// Splits `word` into its fields and resolves the effective opcode.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn partition(word: u32) -> Self {
        let raw_opcode = (word >> 26) as u8;
        let funct = (word & 0x3F) as u8;

        Self {
            opcode: resolve_alias(raw_opcode, funct),
            raw_opcode,
            rs: RegisterIndex::from_field(word >> 21),
            rt: RegisterIndex::from_field(word >> 16),
            rd: RegisterIndex::from_field(word >> 11),
            funct,
            offset: (word & 0xFFFF) as u16,
            jump_target: word & 0x03FF_FFFF,
        }
    }
}

/// Maps the shared R-type opcode onto dedicated compare opcodes.
///
/// `slt` becomes [`OPCODE_SLT`]; `sltu` becomes [`OPCODE_SLTU`] because its
/// function code collides with the store-word opcode. Every other input is
/// returned unchanged.
#[must_use]
pub const fn resolve_alias(opcode: u8, funct: u8) -> u8 {
    if opcode != OPCODE_RTYPE {
        return opcode;
    }
    match funct {
        FUNCT_SLT => OPCODE_SLT,
        FUNCT_SLTU => OPCODE_SLTU,
        _ => opcode,
    }
}

/// Control-signal vector driving one cycle.
///
/// Built once per cycle by [`decode_controls`] and treated as read-only by every
/// later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct ControlSignals {
    /// Write to `rd` (set) or `rt` (clear).
    pub reg_dst: bool,
    /// Unconditional jump.
    pub jump: bool,
    /// Conditional branch on the ALU zero flag.
    pub branch: bool,
    /// Read data memory.
    pub mem_read: bool,
    /// Write back memory data (set) or the ALU result (clear).
    pub mem_to_reg: bool,
    /// Write data memory.
    pub mem_write: bool,
    /// ALU operand B from the sign-extended immediate (set) or `rt` (clear).
    pub alu_src: bool,
    /// Commit a register write.
    pub reg_write: bool,
    /// Raw 3-bit ALU operation selector.
    pub alu_op: u8,
}

impl ControlSignals {
    /// Fixed control vector for a supported operation.
    #[must_use]
    pub const fn for_operation(op: Operation) -> Self {
        match op {
            Operation::Addi => Self {
                reg_dst: false,
                jump: false,
                branch: false,
                mem_read: false,
                mem_to_reg: false,
                mem_write: false,
                alu_src: true,
                reg_write: true,
                alu_op: 0,
            },
            Operation::Add => Self {
                reg_dst: true,
                jump: false,
                branch: false,
                mem_read: false,
                mem_to_reg: false,
                mem_write: false,
                alu_src: false,
                reg_write: true,
                alu_op: 0,
            },
            Operation::Slt => Self {
                reg_dst: true,
                jump: false,
                branch: false,
                mem_read: false,
                mem_to_reg: false,
                mem_write: false,
                alu_src: false,
                reg_write: true,
                alu_op: 2,
            },
            Operation::Sw => Self {
                reg_dst: false,
                jump: false,
                branch: false,
                mem_read: false,
                mem_to_reg: false,
                mem_write: true,
                alu_src: true,
                reg_write: false,
                alu_op: 0,
            },
            Operation::Sltu => Self {
                reg_dst: true,
                jump: false,
                branch: false,
                mem_read: false,
                mem_to_reg: false,
                mem_write: false,
                alu_src: false,
                reg_write: true,
                alu_op: 3,
            },
            Operation::Lw => Self {
                reg_dst: false,
                jump: false,
                branch: false,
                mem_read: true,
                mem_to_reg: true,
                mem_write: false,
                alu_src: true,
                reg_write: true,
                alu_op: 0,
            },
            Operation::J => Self {
                reg_dst: false,
                jump: true,
                branch: false,
                mem_read: false,
                mem_to_reg: false,
                mem_write: false,
                alu_src: false,
                reg_write: false,
                alu_op: 0,
            },
            Operation::Beq => Self {
                reg_dst: false,
                jump: false,
                branch: true,
                mem_read: false,
                mem_to_reg: false,
                mem_write: false,
                alu_src: false,
                reg_write: false,
                alu_op: 1,
            },
            Operation::Lui => Self {
                reg_dst: false,
                jump: false,
                branch: false,
                mem_read: false,
                mem_to_reg: false,
                mem_write: false,
                alu_src: true,
                reg_write: true,
                alu_op: 6,
            },
        }
    }
}

/// Produces the control vector for an effective opcode.
///
/// # Errors
///
/// Returns [`HaltReason::UnsupportedOpcode`] when the opcode is outside the
/// supported set.
pub const fn decode_controls(opcode: u8) -> Result<ControlSignals, HaltReason> {
    match Operation::from_opcode(opcode) {
        Some(op) => Ok(ControlSignals::for_operation(op)),
        None => Err(HaltReason::UnsupportedOpcode { opcode }),
    }
}

/// Fully decoded instruction: fields, classified operation, and controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedInstruction {
    /// Extracted fields.
    pub fields: InstructionFields,
    /// Operation selected by the effective opcode.
    pub operation: Operation,
    /// Control vector for this instruction.
    pub controls: ControlSignals,
}

/// Stateless decoder combining partition and control decode.
pub struct Decoder;

impl Decoder {
    /// Decodes a raw instruction word.
    ///
    /// # Errors
    ///
    /// Returns [`HaltReason::UnsupportedOpcode`] when the effective opcode has
    /// no control vector.
    pub const fn decode(word: u32) -> Result<DecodedInstruction, HaltReason> {
        let fields = InstructionFields::partition(word);
        match Operation::from_opcode(fields.opcode) {
            Some(operation) => Ok(DecodedInstruction {
                fields,
                operation,
                controls: ControlSignals::for_operation(operation),
            }),
            None => Err(HaltReason::UnsupportedOpcode {
                opcode: fields.opcode,
            }),
        }
    }
}

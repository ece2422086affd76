//! Instruction disassembly for the supported MIPS subset.
//!
//! Rendering follows the effective opcode, so an R-type word whose function
//! code is neither `slt` nor `sltu` prints as `add` (that is how it executes)
//! with the raw function code noted. The all-zero word ends a program and is
//! rendered as data.

use crate::decoder::{Decoder, InstructionFields};
use crate::encoding::{Operation, FUNCT_ADD};
use crate::memory::word_index;
use crate::{Memory, MEMORY_WORDS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled memory word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Byte address of the word.
    pub address: u32,
    /// Raw instruction word.
    pub word: u32,
    /// Rendered assembly text.
    pub text: String,
    /// Whether the word renders as `.word` data (zero or undecodable).
    pub is_data: bool,
}

/// Renders one instruction word as assembly text.
///
/// The zero word and words the decoder rejects render as `.word 0xXXXXXXXX`.
#[must_use]
pub fn disassemble(word: u32) -> String {
    match Decoder::decode(word) {
        Ok(decoded) if word != 0 => render(decoded.operation, &decoded.fields),
        _ => format!(".word 0x{word:08X}"),
    }
}

const fn is_data(word: u32) -> bool {
    word == 0 || Decoder::decode(word).is_err()
}

#[allow(clippy::cast_possible_wrap)]
fn render(op: Operation, f: &InstructionFields) -> String {
    let mnemonic = op.mnemonic();
    let imm = f.offset as i16;
    match op {
        Operation::Add if f.funct != FUNCT_ADD => format!(
            "{mnemonic} {}, {}, {} ; funct 0x{:02X}",
            f.rd, f.rs, f.rt, f.funct
        ),
        Operation::Add | Operation::Slt | Operation::Sltu => {
            format!("{mnemonic} {}, {}, {}", f.rd, f.rs, f.rt)
        }
        Operation::Addi => format!("{mnemonic} {}, {}, {imm}", f.rt, f.rs),
        Operation::Lw | Operation::Sw => format!("{mnemonic} {}, {imm}({})", f.rt, f.rs),
        Operation::Beq => format!("{mnemonic} {}, {}, {imm}", f.rs, f.rt),
        Operation::J => format!("{mnemonic} 0x{:08X}", f.jump_target << 2),
        Operation::Lui => format!("{mnemonic} {}, 0x{:04X}", f.rt, f.offset),
    }
}

/// Disassembles `count` consecutive words starting at byte address `start`.
///
/// Rows stop early at the end of memory.
#[must_use]
pub fn disassemble_range(memory: &Memory, start: u32, count: usize) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(count.min(MEMORY_WORDS));
    let mut address = start & !3;
    for _ in 0..count {
        let Ok(word) = memory.read_word(word_index(address)) else {
            break;
        };
        rows.push(DisassemblyRow {
            address,
            word,
            text: disassemble(word),
            is_data: is_data(word),
        });
        address = address.wrapping_add(4);
    }
    rows
}

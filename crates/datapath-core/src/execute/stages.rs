//! Individual datapath stages.
//!
//! Each stage is a free function over explicit inputs. Stages that can end the
//! run return `Result<_, HaltReason>`; the orchestrator stops at the first
//! `Err`.

use crate::alu::{alu, AluOp, AluOutput};
use crate::decoder::{ControlSignals, InstructionFields};
use crate::memory::{word_index, HALT_WORD_INDEX};
use crate::{HaltReason, Memory, RegisterFile, RegisterIndex};

/// Fetches the instruction word at `pc`.
///
/// # Errors
///
/// [`HaltReason::EndOfProgram`] for the all-zero word, and
/// [`HaltReason::PcOutOfRange`] when `pc` is past the end of memory.
pub fn fetch(pc: u32, memory: &Memory) -> Result<u32, HaltReason> {
    let word = memory
        .read_word(word_index(pc))
        .map_err(|_| HaltReason::PcOutOfRange { pc })?;

    if word == 0 {
        return Err(HaltReason::EndOfProgram);
    }
    Ok(word)
}

/// Widens a 16-bit immediate to 32 bits, copying bit 15 into the high half.
#[must_use]
pub const fn sign_extend(offset: u16) -> u32 {
    if offset & 0x8000 != 0 {
        offset as u32 | 0xFFFF_0000
    } else {
        offset as u32
    }
}

/// Selects ALU operand B and evaluates the ALU.
///
/// # Errors
///
/// [`HaltReason::InvalidAluSelector`] when `controls.alu_op` is outside `0..=7`;
/// the ALU is not invoked in that case.
pub const fn alu_dispatch(
    data1: u32,
    data2: u32,
    extended: u32,
    controls: &ControlSignals,
) -> Result<AluOutput, HaltReason> {
    let Some(op) = AluOp::from_bits(controls.alu_op) else {
        return Err(HaltReason::InvalidAluSelector {
            selector: controls.alu_op,
        });
    };

    let operand_b = if controls.alu_src { extended } else { data2 };
    Ok(alu(data1, operand_b, op))
}

/// Performs the load or store implied by `controls` at byte address `address`.
///
/// Returns the loaded word when `mem_read` is set.
///
/// # Errors
///
/// [`HaltReason::HaltAddressAccess`] when the word index equals the halt
/// index (checked before any access, regardless of the read/write flags), and
/// [`HaltReason::AddressOutOfRange`] for an access beyond it.
pub fn memory_access(
    address: u32,
    store_data: u32,
    controls: &ControlSignals,
    memory: &mut Memory,
) -> Result<Option<u32>, HaltReason> {
    let index = word_index(address);
    if index == HALT_WORD_INDEX {
        return Err(HaltReason::HaltAddressAccess { address });
    }

    let mut loaded = None;
    if controls.mem_read {
        let value = memory
            .read_word(index)
            .map_err(|_| HaltReason::AddressOutOfRange { address })?;
        loaded = Some(value);
    }
    if controls.mem_write {
        memory
            .write_word(index, store_data)
            .map_err(|_| HaltReason::AddressOutOfRange { address })?;
    }
    Ok(loaded)
}

/// Commits the selected result to the destination register.
///
/// Returns the written register and value, or `None` when `reg_write` is clear.
/// A memory-to-register write with no loaded word stores 0.
pub fn write_back(
    fields: &InstructionFields,
    loaded: Option<u32>,
    alu_result: u32,
    controls: &ControlSignals,
    registers: &mut RegisterFile,
) -> Option<(RegisterIndex, u32)> {
    let (dest, value) = if controls.mem_to_reg {
        (fields.rt, loaded.unwrap_or_default())
    } else if controls.reg_dst {
        (fields.rd, alu_result)
    } else {
        (fields.rt, alu_result)
    };

    registers.write(dest, value, controls.reg_write);
    controls.reg_write.then_some((dest, value))
}

/// Computes the PC for the next cycle from the current `pc`.
///
/// A taken branch wins over a jump; jumps are absolute (`target << 2`) and do
/// not merge the upper bits of `pc + 4`.
#[must_use]
pub const fn next_pc(
    pc: u32,
    jump_target: u32,
    extended: u32,
    controls: &ControlSignals,
    zero: bool,
) -> u32 {
    if controls.branch && zero {
        pc.wrapping_add(extended.wrapping_mul(4)).wrapping_add(4)
    } else if controls.jump {
        jump_target << 2
    } else {
        pc.wrapping_add(4)
    }
}

//! Property coverage for the pure datapath stages.

#![allow(clippy::pedantic, clippy::nursery, clippy::cast_possible_truncation)]

use datapath_core::encoding::{beq, j};
use datapath_core::execute::{next_pc, sign_extend};
use datapath_core::{
    alu, decode_controls, step_cycle, AluOp, ControlSignals, CoreState, CycleOutcome,
    HaltReason, InstructionFields, Operation, RegisterIndex,
};
use log as _;
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

proptest! {
    #[test]
    fn add_zero_is_identity(a in any::<u32>()) {
        let out = alu(a, 0, AluOp::Add);
        prop_assert_eq!(out.result, a);
        prop_assert_eq!(out.zero, a == 0);
    }

    #[test]
    fn not_ignores_operand_b(a in any::<u32>(), b in any::<u32>()) {
        prop_assert_eq!(alu(a, b, AluOp::Not).result, !a);
        prop_assert_eq!(alu(a, b, AluOp::Not), alu(a, 0, AluOp::Not));
    }

    #[test]
    fn zero_flag_tracks_result(a in any::<u32>(), b in any::<u32>(), bits in 0_u8..8) {
        let op = AluOp::from_bits(bits).expect("three-bit selector");
        let out = alu(a, b, op);
        prop_assert_eq!(out.zero, out.result == 0);
    }

    #[test]
    fn sign_extension_preserves_signed_value(offset in any::<i16>()) {
        let bits = offset as u16;
        prop_assert_eq!(sign_extend(bits) as i32, i32::from(offset));
        prop_assert_eq!(sign_extend(bits) & 0xFFFF, u32::from(bits));
    }

    #[test]
    fn decode_is_deterministic_and_total(word in any::<u32>()) {
        let fields = InstructionFields::partition(word);
        prop_assert_eq!(fields, InstructionFields::partition(word));
        match decode_controls(fields.opcode) {
            Ok(controls) => {
                let op = Operation::from_opcode(fields.opcode).expect("decoded opcode is classified");
                prop_assert_eq!(controls, ControlSignals::for_operation(op));
            }
            Err(reason) => {
                prop_assert_eq!(reason, HaltReason::UnsupportedOpcode { opcode: fields.opcode });
            }
        }
    }

    #[test]
    fn taken_branch_offsets_from_next_instruction(pc in (0_u32..0x4000).prop_map(|w| w * 4), offset in any::<i16>()) {
        let controls = ControlSignals::for_operation(Operation::Beq);
        let extended = sign_extend(offset as u16);
        let expected = (i64::from(pc) + 4 + 4 * i64::from(offset)) as u32;
        prop_assert_eq!(next_pc(pc, 0, extended, &controls, true), expected);
        prop_assert_eq!(next_pc(pc, 0, extended, &controls, false), pc.wrapping_add(4));
    }

    #[test]
    fn jump_replaces_pc_with_shifted_target(pc in any::<u32>(), target in 0_u32..(1 << 26)) {
        let controls = ControlSignals::for_operation(Operation::J);
        prop_assert_eq!(next_pc(pc, target, 0, &controls, false), target << 2);
    }

    #[test]
    fn beq_on_equal_registers_always_branches(value in any::<u32>(), offset in 0_i16..64) {
        let mut state = CoreState::with_program(&[beq(1, 2, offset)]).expect("program fits");
        let r1 = RegisterIndex::from_u5(1).expect("valid register");
        let r2 = RegisterIndex::from_u5(2).expect("valid register");
        state.registers.set(r1, value);
        state.registers.set(r2, value);

        let next = 4 + 4 * offset as u32;
        prop_assert_eq!(step_cycle(&mut state), CycleOutcome::Retired { next_pc: next });
    }

    #[test]
    fn halted_state_never_executes(target in 1_u32..0x3FFF) {
        let mut state = CoreState::with_program(&[j(target)]).expect("program fits");
        state.run_state = datapath_core::RunState::Halted(HaltReason::EndOfProgram);
        let before = state.clone();

        prop_assert_eq!(step_cycle(&mut state), CycleOutcome::Halted(HaltReason::EndOfProgram));
        prop_assert_eq!(state, before);
    }
}

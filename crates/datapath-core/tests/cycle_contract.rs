//! End-to-end cycle contract: whole programs through the public API.

#![allow(clippy::pedantic, clippy::nursery, clippy::cast_possible_truncation)]

use datapath_core::encoding::{add, addi, beq, encode_i, encode_r, j, lui, lw, slt, sltu, sw};
use datapath_core::{
    run, run_traced, step_cycle, CoreConfig, CoreSnapshot, CoreState, CycleOutcome, HaltClass,
    HaltReason, RegisterIndex, RunState, RunStop, SnapshotVersion, TraceEvent,
};
use log as _;
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn reg(bits: u8) -> RegisterIndex {
    RegisterIndex::from_u5(bits).expect("valid register")
}

fn run_program(program: &[u32]) -> (CoreState, RunStop, u64) {
    let mut state = CoreState::with_program(program).expect("program fits");
    let outcome = run(&mut state, &CoreConfig::default());
    (state, outcome.stop, outcome.cycles)
}

#[test]
fn taken_branch_skips_instruction_and_halts_on_zero_word() {
    let (state, stop, cycles) = run_program(&[
        addi(1, 0, 5),
        addi(2, 0, 5),
        beq(1, 2, 1),
        addi(3, 0, 99),
        addi(3, 0, 1),
        0,
    ]);

    assert_eq!(stop, RunStop::Halted(HaltReason::EndOfProgram));
    assert_eq!(cycles, 4);
    assert_eq!(state.register(reg(3)), 1);
    assert_eq!(state.pc, 20);
}

#[test]
fn untaken_branch_falls_through() {
    let (state, _, cycles) = run_program(&[
        addi(1, 0, 5),
        addi(2, 0, 6),
        beq(1, 2, 1),
        addi(3, 0, 99),
        addi(4, 0, 1),
    ]);

    assert_eq!(cycles, 5);
    assert_eq!(state.register(reg(3)), 99);
    assert_eq!(state.register(reg(4)), 1);
}

#[test]
fn backward_branch_loop_counts_down() {
    // r1 = 3; loop: r1 += -1; r2 += 1; beq r1, r0, +1; j loop; done
    let (state, stop, _) = run_program(&[
        addi(1, 0, 3),
        addi(1, 1, -1),
        addi(2, 2, 1),
        beq(1, 0, 1),
        j(1),
        addi(5, 0, 7),
    ]);

    assert_eq!(stop, RunStop::Halted(HaltReason::EndOfProgram));
    assert_eq!(state.register(reg(1)), 0);
    assert_eq!(state.register(reg(2)), 3);
    assert_eq!(state.register(reg(5)), 7);
}

#[test]
fn jump_target_is_absolute_word_address() {
    let mut state = CoreState::with_program(&[j(4)]).expect("program fits");
    state.memory.write_word(4, addi(7, 0, 42)).expect("backed");

    let outcome = run(&mut state, &CoreConfig::default());
    assert_eq!(outcome.cycles, 2);
    assert_eq!(state.register(reg(7)), 42);
    assert_eq!(state.pc, 20);
}

#[test]
fn store_and_load_share_unified_memory() {
    let (state, _, _) = run_program(&[
        addi(1, 0, -2),
        addi(29, 0, 0x200),
        sw(1, -4, 29),
        lw(8, -4, 29),
    ]);

    assert_eq!(state.memory.read_word(0x7F), Ok(0xFFFF_FFFE));
    assert_eq!(state.register(reg(8)), 0xFFFF_FFFE);
}

#[test]
fn lui_places_immediate_in_upper_half() {
    let (state, _, _) = run_program(&[lui(4, 0x8001), addi(5, 4, 1)]);
    assert_eq!(state.register(reg(4)), 0x8001_0000);
    assert_eq!(state.register(reg(5)), 0x8001_0001);
}

#[rstest]
#[case(-1, 1, 1, 0)]
#[case(1, -1, 0, 1)]
#[case(3, 3, 0, 0)]
fn set_less_than_signed_and_unsigned(
    #[case] lhs: i16,
    #[case] rhs: i16,
    #[case] signed: u32,
    #[case] unsigned: u32,
) {
    let (state, _, _) = run_program(&[
        addi(1, 0, lhs),
        addi(2, 0, rhs),
        slt(3, 1, 2),
        sltu(4, 1, 2),
    ]);
    assert_eq!(state.register(reg(3)), signed);
    assert_eq!(state.register(reg(4)), unsigned);
}

#[test]
fn unknown_rtype_function_executes_as_add() {
    let (state, _, _) = run_program(&[addi(1, 0, 10), addi(2, 0, 3), encode_r(1, 2, 3, 0x22)]);
    assert_eq!(state.register(reg(3)), 13);
}

#[test]
fn register_zero_accepts_writes() {
    let (state, _, _) = run_program(&[addi(0, 0, 9), add(1, 0, 0)]);
    assert_eq!(state.register(reg(0)), 9);
    assert_eq!(state.register(reg(1)), 18);
}

#[test]
fn unsupported_opcode_halts_before_any_write() {
    let (state, stop, cycles) = run_program(&[addi(1, 0, 1), encode_i(0x3F, 0, 2, 5)]);

    assert_eq!(cycles, 1);
    assert_eq!(stop, RunStop::Halted(HaltReason::UnsupportedOpcode { opcode: 0x3F }));
    assert_eq!(state.pc, 4);
    assert_eq!(state.register(reg(2)), 0);
    assert_eq!(
        HaltReason::UnsupportedOpcode { opcode: 0x3F }.class(),
        HaltClass::Decode
    );
}

/// Leaves `$1 = 0xFFFE` without any ALU result landing on the halt word.
const HALT_BASE_SETUP: [u32; 2] = [addi(1, 0, 0x7FFF), add(1, 1, 1)];

#[test]
fn load_from_halt_address_halts_without_register_write() {
    let mut state =
        CoreState::with_program(&[HALT_BASE_SETUP[0], HALT_BASE_SETUP[1], lw(2, 2, 1)])
            .expect("program fits");
    state.registers.set(reg(2), 0x55);

    let outcome = run(&mut state, &CoreConfig::default());
    let reason = HaltReason::HaltAddressAccess {
        address: 0x0001_0000,
    };
    assert_eq!(outcome.stop, RunStop::Halted(reason));
    assert_eq!(outcome.cycles, 2);
    assert!(reason.is_clean_exit());
    assert_eq!(state.register(reg(1)), 0xFFFE);
    assert_eq!(state.register(reg(2)), 0x55);
    assert_eq!(state.pc, 8);
}

#[test]
fn store_to_halt_address_leaves_memory_untouched() {
    let mut state = CoreState::with_program(&[
        HALT_BASE_SETUP[0],
        HALT_BASE_SETUP[1],
        addi(2, 0, 1),
        sw(2, 2, 1),
    ])
    .expect("program fits");
    let memory_before = state.memory.clone();

    let outcome = run(&mut state, &CoreConfig::default());
    assert_eq!(
        outcome.stop,
        RunStop::Halted(HaltReason::HaltAddressAccess {
            address: 0x0001_0000
        })
    );
    assert_eq!(outcome.cycles, 3);
    assert_eq!(state.pc, 12);
    assert_eq!(state.memory, memory_before);
}

#[test]
fn store_with_negative_offset_onto_halt_word_halts() {
    let mut state = CoreState::with_program(&[sw(2, -4, 1)]).expect("program fits");
    state.registers.set(reg(1), 0x0001_0004);
    state.registers.set(reg(2), 0xDEAD_BEEF);
    let memory_before = state.memory.clone();

    assert_eq!(
        step_cycle(&mut state),
        CycleOutcome::Halted(HaltReason::HaltAddressAccess {
            address: 0x0001_0000
        })
    );
    assert_eq!(state.memory, memory_before);
    assert_eq!(state.pc, 0);
}

#[test]
fn lui_producing_halt_address_halts_without_writeback() {
    let mut state = CoreState::with_program(&[lui(1, 1), addi(2, 0, 1)]).expect("program fits");

    let outcome = run(&mut state, &CoreConfig::default());
    assert_eq!(
        outcome.stop,
        RunStop::Halted(HaltReason::HaltAddressAccess {
            address: 0x0001_0000
        })
    );
    assert_eq!(outcome.cycles, 0);
    assert_eq!(state.register(reg(1)), 0);
    assert_eq!(state.register(reg(2)), 0);
    assert_eq!(state.pc, 0);
}

#[test]
fn zero_word_fetch_changes_nothing() {
    let mut state = CoreState::new();
    state.pc = 0x80;
    state.registers.set(reg(9), 1);
    let before = state.clone();

    assert_eq!(
        step_cycle(&mut state),
        CycleOutcome::Halted(HaltReason::EndOfProgram)
    );
    assert_eq!(state.pc, before.pc);
    assert_eq!(state.registers, before.registers);
    assert_eq!(state.memory, before.memory);
}

#[test]
fn pc_past_memory_halts_instead_of_faulting() {
    let mut state = CoreState::with_program(&[j(0x4000)]).expect("program fits");
    let outcome = run(&mut state, &CoreConfig::default());
    assert_eq!(
        outcome.stop,
        RunStop::Halted(HaltReason::PcOutOfRange { pc: 0x0001_0000 })
    );
    assert!(!HaltReason::PcOutOfRange { pc: 0 }.is_clean_exit());
}

#[test]
fn unbounded_run_reaches_halt() {
    let mut state = CoreState::with_program(&[addi(1, 0, 1)]).expect("program fits");
    let config = CoreConfig {
        cycle_limit: None,
        ..CoreConfig::default()
    };
    assert_eq!(run(&mut state, &config).cycles, 1);
}

#[test]
fn traced_run_reports_store_then_retire_then_halt() {
    let mut state = CoreState::with_program(&[addi(1, 0, 3), sw(1, 0x40, 0)]).expect("fits");
    let config = CoreConfig {
        tracing_enabled: true,
        ..CoreConfig::default()
    };
    let mut events = Vec::new();
    run_traced(&mut state, &config, &mut events);

    assert_eq!(
        events,
        vec![
            TraceEvent::InstructionStart {
                pc: 0,
                word: addi(1, 0, 3)
            },
            TraceEvent::RegisterWrite {
                reg: reg(1),
                value: 3
            },
            TraceEvent::InstructionRetired { pc: 0, next_pc: 4 },
            TraceEvent::InstructionStart {
                pc: 4,
                word: sw(1, 0x40, 0)
            },
            TraceEvent::MemoryAccess {
                address: 0x40,
                value: 3,
                is_write: true
            },
            TraceEvent::InstructionRetired { pc: 4, next_pc: 8 },
            TraceEvent::Halted {
                pc: 8,
                reason: HaltReason::EndOfProgram
            },
        ]
    );
}

#[test]
fn snapshot_resume_matches_uninterrupted_run() {
    let program = [addi(1, 0, 1), add(1, 1, 1), add(1, 1, 1), add(1, 1, 1)];

    let mut straight = CoreState::with_program(&program).expect("fits");
    run(&mut straight, &CoreConfig::default());

    let mut first_half = CoreState::with_program(&program).expect("fits");
    let config = CoreConfig {
        cycle_limit: Some(2),
        ..CoreConfig::default()
    };
    assert_eq!(run(&mut first_half, &config).stop, RunStop::CycleLimit);

    let snapshot = CoreSnapshot::from_core_state(SnapshotVersion::V1, &first_half);
    let mut resumed = snapshot.try_into_core_state().expect("valid snapshot");
    run(&mut resumed, &CoreConfig::default());

    assert_eq!(resumed, straight);
    assert_eq!(resumed.register(reg(1)), 8);
    assert!(matches!(resumed.run_state, RunState::Halted(_)));
}

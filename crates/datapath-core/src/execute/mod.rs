//! Single-cycle execution: one fetch-to-PC-update pass per call.

pub mod stages;

pub use stages::{alu_dispatch, fetch, memory_access, next_pc, sign_extend, write_back};

use crate::api::{CoreConfig, CoreState, CycleOutcome, RunOutcome, RunStop, TraceEvent, TraceSink};
use crate::decoder::{decode_controls, InstructionFields};
use crate::{HaltReason, RunState};

struct NullSink;

impl TraceSink for NullSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Executes exactly one instruction cycle.
///
/// A halted state stays halted: the latched reason is returned and nothing is
/// executed.
pub fn step_cycle(state: &mut CoreState) -> CycleOutcome {
    step_cycle_traced(state, &mut NullSink)
}

/// Executes one cycle, reporting stage events to `sink` in order.
///
/// Stages run fetch, partition, decode, register read, sign extension, ALU,
/// memory, writeback, then PC update. The first stage to halt ends the cycle;
/// later stages are skipped, so the PC, registers, and memory keep whatever
/// earlier stages committed (nothing, for every halt this datapath raises).
pub fn step_cycle_traced(state: &mut CoreState, sink: &mut dyn TraceSink) -> CycleOutcome {
    if let RunState::Halted(reason) = state.run_state {
        return CycleOutcome::Halted(reason);
    }

    let pc = state.pc;
    match execute_cycle(state, pc, sink) {
        Ok(next) => {
            state.pc = next;
            log::trace!("retired pc=0x{pc:08X} next=0x{next:08X}");
            sink.on_event(TraceEvent::InstructionRetired { pc, next_pc: next });
            CycleOutcome::Retired { next_pc: next }
        }
        Err(reason) => {
            state.run_state = RunState::Halted(reason);
            log::debug!("halted at pc=0x{pc:08X}: {reason}");
            sink.on_event(TraceEvent::Halted { pc, reason });
            CycleOutcome::Halted(reason)
        }
    }
}

fn execute_cycle(
    state: &mut CoreState,
    pc: u32,
    sink: &mut dyn TraceSink,
) -> Result<u32, HaltReason> {
    let word = fetch(pc, &state.memory)?;
    sink.on_event(TraceEvent::InstructionStart { pc, word });

    let fields = InstructionFields::partition(word);
    let controls = decode_controls(fields.opcode)?;

    let (data1, data2) = state.registers.read_pair(fields.rs, fields.rt);
    let extended = sign_extend(fields.offset);

    let alu_out = alu_dispatch(data1, data2, extended, &controls)?;

    let loaded = memory_access(alu_out.result, data2, &controls, &mut state.memory)?;
    if let Some(value) = loaded {
        sink.on_event(TraceEvent::MemoryAccess {
            address: alu_out.result,
            value,
            is_write: false,
        });
    }
    if controls.mem_write {
        sink.on_event(TraceEvent::MemoryAccess {
            address: alu_out.result,
            value: data2,
            is_write: true,
        });
    }

    if let Some((reg, value)) = write_back(
        &fields,
        loaded,
        alu_out.result,
        &controls,
        &mut state.registers,
    ) {
        sink.on_event(TraceEvent::RegisterWrite { reg, value });
    }

    Ok(next_pc(
        pc,
        fields.jump_target,
        extended,
        &controls,
        alu_out.zero,
    ))
}

/// Runs cycles until a halt or the configured cycle limit.
pub fn run(state: &mut CoreState, config: &CoreConfig) -> RunOutcome {
    run_traced(state, config, &mut NullSink)
}

/// Runs cycles like [`run`], forwarding events to `sink` when
/// `config.tracing_enabled` is set.
pub fn run_traced(
    state: &mut CoreState,
    config: &CoreConfig,
    sink: &mut dyn TraceSink,
) -> RunOutcome {
    if config.tracing_enabled {
        run_loop(state, config.cycle_limit, sink)
    } else {
        run_loop(state, config.cycle_limit, &mut NullSink)
    }
}

fn run_loop(state: &mut CoreState, cycle_limit: Option<u64>, sink: &mut dyn TraceSink) -> RunOutcome {
    let mut cycles = 0_u64;
    loop {
        if cycle_limit.is_some_and(|limit| cycles >= limit) {
            log::debug!("cycle limit reached after {cycles} cycles");
            return RunOutcome {
                cycles,
                stop: RunStop::CycleLimit,
            };
        }
        match step_cycle_traced(state, sink) {
            CycleOutcome::Retired { .. } => cycles += 1,
            CycleOutcome::Halted(reason) => {
                return RunOutcome {
                    cycles,
                    stop: RunStop::Halted(reason),
                };
            }
        }
    }
}

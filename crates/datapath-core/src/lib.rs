//! Core simulator crate for a single-cycle MIPS-subset datapath.

/// Flat word-addressed memory and the halt sentinel.
pub mod memory;
pub use memory::{word_index, Memory, MemoryError, HALT_WORD_INDEX, MEMORY_BYTES, MEMORY_WORDS};

/// Halt taxonomy for stage-level termination.
pub mod halt;
pub use halt::{HaltClass, HaltReason};

/// Architectural state carried across cycles.
pub mod state;
pub use state::{RegisterFile, RegisterIndex, RunState, REGISTER_COUNT};

/// Arithmetic/logic unit.
pub mod alu;
pub use alu::{alu, AluOp, AluOutput};

/// Opcode tables and instruction encoders.
pub mod encoding;
pub use encoding::{Operation, OPERATION_TABLE};

/// Instruction partition and control-signal decode.
pub mod decoder;
pub use decoder::{
    decode_controls, resolve_alias, ControlSignals, DecodedInstruction, Decoder, InstructionFields,
};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    CoreConfig, CoreSnapshot, CoreState, CycleOutcome, RunOutcome, RunStop, SnapshotError,
    SnapshotVersion, TraceEvent, TraceSink, DEFAULT_CYCLE_LIMIT,
};

/// Datapath stages and the cycle orchestrator.
pub mod execute;
pub use execute::{run, run_traced, step_cycle, step_cycle_traced};

/// Instruction disassembly.
pub mod disasm;
pub use disasm::{disassemble, disassemble_range, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;

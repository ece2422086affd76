//! Host-facing API: configuration, caller-owned state, outcomes, and trace hooks.

use thiserror::Error;

use crate::{HaltReason, Memory, MemoryError, RegisterFile, RegisterIndex, RunState, MEMORY_WORDS};

/// Default upper bound on cycles executed by a single `run` call.
pub const DEFAULT_CYCLE_LIMIT: u64 = 1_000_000;

/// Immutable run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Maximum cycles per `run` call; `None` runs until a halt.
    pub cycle_limit: Option<u64>,
    /// Enables trace callback dispatch from the traced run loop.
    pub tracing_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            cycle_limit: Some(DEFAULT_CYCLE_LIMIT),
            tracing_enabled: false,
        }
    }
}

/// Caller-owned machine state threaded through every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreState {
    /// Byte address of the next instruction.
    pub pc: u32,
    /// General-purpose register bank.
    pub registers: RegisterFile,
    /// Unified instruction/data memory.
    pub memory: Memory,
    /// Running or latched-halt state.
    pub run_state: RunState,
}

impl CoreState {
    /// Creates a zeroed machine with `PC = 0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a machine with `program` loaded at address 0.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ImageTooLarge`] when `program` exceeds memory.
    pub fn with_program(program: &[u32]) -> Result<Self, MemoryError> {
        let mut state = Self::new();
        state.load_words(0, program)?;
        Ok(state)
    }

    /// Copies `image` into memory starting at word index `base_word`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ImageTooLarge`] when the image does not fit; memory
    /// is left untouched in that case.
    pub fn load_words(&mut self, base_word: usize, image: &[u32]) -> Result<(), MemoryError> {
        self.memory.load_words(base_word, image)?;
        log::debug!("loaded {} words at word {base_word}", image.len());
        Ok(())
    }

    /// Reads one register.
    #[must_use]
    pub const fn register(&self, reg: RegisterIndex) -> u32 {
        self.registers.get(reg)
    }

    /// Returns the latched halt reason, if any.
    #[must_use]
    pub const fn halt_reason(&self) -> Option<HaltReason> {
        self.run_state.halt_reason()
    }

    /// Clears registers, PC, and any latched halt. Memory is preserved.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.registers = RegisterFile::default();
        self.run_state = RunState::Running;
    }
}

/// Aggregated result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleOutcome {
    /// Every stage ran and the PC was updated.
    Retired {
        /// PC value committed by the PC-update stage.
        next_pc: u32,
    },
    /// A stage halted; later stages did not run and the PC is unchanged.
    Halted(HaltReason),
}

impl CycleOutcome {
    /// The single halt indicator reported to run loops.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted(_))
    }

    /// Returns the halt reason for diagnostics.
    #[must_use]
    pub const fn halt_reason(self) -> Option<HaltReason> {
        match self {
            Self::Halted(reason) => Some(reason),
            Self::Retired { .. } => None,
        }
    }
}

/// Why a run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStop {
    /// A stage halted.
    Halted(HaltReason),
    /// The configured cycle limit was reached first.
    CycleLimit,
}

/// Aggregated outcome from running cycles until halt or limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Cycles that retired during this call.
    pub cycles: u64,
    /// Stop condition observed.
    pub stop: RunStop,
}

/// Stable snapshot wire-version identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum SnapshotVersion {
    /// Initial schema revision.
    V1 = 1,
}

impl SnapshotVersion {
    /// Converts wire value to known snapshot version.
    #[must_use]
    pub const fn from_u16(version: u16) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            _ => None,
        }
    }
}

/// Snapshot validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SnapshotError {
    /// Memory image has the wrong number of words.
    #[error("snapshot memory holds {found} words, expected {capacity}", capacity = MEMORY_WORDS)]
    MemorySize {
        /// Word count found in the snapshot.
        found: usize,
    },
    /// PC is not word aligned.
    #[error("snapshot PC 0x{pc:08X} is not word aligned")]
    MisalignedPc {
        /// Offending PC.
        pc: u32,
    },
}

/// Full-state snapshot used for save/restore and replay fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreSnapshot {
    /// Snapshot schema version.
    pub version: SnapshotVersion,
    /// Captured machine state.
    pub state: CoreState,
}

impl CoreSnapshot {
    /// Captures `state` under `version`.
    #[must_use]
    pub fn from_core_state(version: SnapshotVersion, state: &CoreState) -> Self {
        Self {
            version,
            state: state.clone(),
        }
    }

    /// Validates and restores the captured state.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the memory size or PC alignment is invalid,
    /// which can only happen for snapshots built or deserialized externally.
    pub fn try_into_core_state(self) -> Result<CoreState, SnapshotError> {
        if self.state.memory.len() != MEMORY_WORDS {
            return Err(SnapshotError::MemorySize {
                found: self.state.memory.len(),
            });
        }
        if self.state.pc % 4 != 0 {
            return Err(SnapshotError::MisalignedPc { pc: self.state.pc });
        }
        Ok(self.state)
    }
}

/// Trace events emitted in stage order by the traced cycle entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Instruction fetched and about to be decoded.
    InstructionStart {
        /// PC used for this fetch.
        pc: u32,
        /// Raw instruction word.
        word: u32,
    },
    /// Data memory access performed by the memory stage.
    MemoryAccess {
        /// Byte address from the ALU.
        address: u32,
        /// Value read or written.
        value: u32,
        /// True for stores.
        is_write: bool,
    },
    /// Register committed by writeback.
    RegisterWrite {
        /// Destination register.
        reg: RegisterIndex,
        /// Value written.
        value: u32,
    },
    /// Cycle completed and PC updated.
    InstructionRetired {
        /// PC of the retired instruction.
        pc: u32,
        /// PC committed for the next cycle.
        next_pc: u32,
    },
    /// A stage halted the cycle.
    Halted {
        /// PC of the halting cycle (unchanged).
        pc: u32,
        /// Stage-specific reason.
        reason: HaltReason,
    },
}

/// Sink trait for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Collects every event; handy for tests and post-run listings.
impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

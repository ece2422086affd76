use crate::HaltReason;

/// Execution state carried between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next cycle.
    #[default]
    Running,
    /// A stage halted; no further cycles execute until reset.
    Halted(HaltReason),
}

impl RunState {
    /// Returns the latched halt reason, if this state is halted.
    #[must_use]
    pub const fn halt_reason(self) -> Option<HaltReason> {
        match self {
            Self::Halted(reason) => Some(reason),
            Self::Running => None,
        }
    }

    /// Returns `true` once any stage has halted.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted(_))
    }
}

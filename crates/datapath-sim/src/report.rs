//! Plain-text machine state reports.

use std::fmt::Write as _;

use datapath_core::{CoreState, RegisterIndex, RunOutcome, RunStop};

/// Formats the run summary: cycle count, stop condition and final PC.
#[must_use]
pub fn format_summary(outcome: &RunOutcome, state: &CoreState) -> String {
    let stop = match outcome.stop {
        RunStop::Halted(reason) => format!("halted: {reason}"),
        RunStop::CycleLimit => "stopped: cycle limit reached".to_string(),
    };
    format!(
        "cycles: {}\n{stop}\npc: 0x{:08X}\n",
        outcome.cycles, state.pc
    )
}

/// Formats all registers, four per row.
#[must_use]
pub fn format_registers(state: &CoreState) -> String {
    let mut out = String::new();
    for reg in RegisterIndex::all() {
        let name = reg.to_string();
        let sep = if reg.number() % 4 == 3 { '\n' } else { ' ' };
        let _ = write!(out, "{name:>4} = 0x{:08X}{sep}", state.register(reg));
    }
    out
}

/// Formats memory words between byte addresses `start` and `end` inclusive.
///
/// Words outside memory are skipped.
#[must_use]
pub fn format_memory(state: &CoreState, start: u32, end: u32) -> String {
    let mut out = String::new();
    let mut address = start & !3;
    while address <= end {
        let Ok(word) = state.memory.read_word(datapath_core::word_index(address)) else {
            break;
        };
        let _ = writeln!(out, "0x{address:08X}: 0x{word:08X}");
        let Some(next) = address.checked_add(4) else {
            break;
        };
        address = next;
    }
    out
}

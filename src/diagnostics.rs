//! `-i`/`-v`/`-tr` observability (spec §4.2, §6, design note §9), routed
//! through `tracing` instead of a bare stdout/stderr handle.

use crate::config::RunConfig;

/// Echo a rejected QSO line to the diagnostics stream, gated on `-i`.
pub fn bad_qso_line(config: &RunConfig, source: &str, line: &str) {
    if config.display_bad_qsos {
        tracing::warn!(source, line, "rejected QSO line");
    }
}

/// Progress reporting gated on `-v`.
pub fn progress(config: &RunConfig, message: &str) {
    if config.verbose {
        tracing::info!("{}", message);
    }
}

/// Per-pass trace line for the one callsign named by `-tr`, if any.
pub fn trace_call(config: &RunConfig, call: &str, pass: &str, action: &str) {
    if config.is_traced(call) {
        tracing::debug!(call, pass, action, "traced call");
    }
}

// src/output.rs
use crate::mc::mc_engine::McOutcome;
use std::io::{self, Write};

pub fn format_payoff_line(outcome: &McOutcome) -> String {
    format!("Option payoff = {}", outcome.average_payoff)
}

pub fn write_payoff_line<W: Write>(out: &mut W, outcome: &McOutcome) -> io::Result<()> {
    writeln!(out, "{}", format_payoff_line(outcome))
}

/// Write one payoff line per outcome and flush `out`
pub fn write_report<W: Write>(out: &mut W, outcomes: &[&McOutcome]) -> io::Result<()> {
    for outcome in outcomes {
        write_payoff_line(out, outcome)?;
    }
    out.flush()
}

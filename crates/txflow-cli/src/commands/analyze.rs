//! Analyze and rank command implementations.

use super::report_unavailable;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::{Session, SessionReport};

/// Execute the analyze command: overview, metric explanation and leaderboard.
pub fn execute_analyze(session: &mut Session, formatter: &Formatter) -> Result<()> {
    let SessionReport { dataset, report } = session.analyze()?;
    report_unavailable(&dataset, formatter);

    println!(
        "{}",
        formatter.format_analysis(&report.overview, report.scores.kind(), &report.ranked)?
    );
    Ok(())
}

/// Execute the rank command: leaderboard only.
pub fn execute_rank(session: &mut Session, formatter: &Formatter) -> Result<()> {
    let SessionReport { dataset, report } = session.analyze()?;
    report_unavailable(&dataset, formatter);

    println!(
        "{}",
        formatter.format_leaderboard(report.scores.kind(), &report.ranked)?
    );
    Ok(())
}

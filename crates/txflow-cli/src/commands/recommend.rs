//! Recommend command implementation.

use super::report_unavailable;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::{Session, SessionReport};
use txflow_analysis::Recommendations;

/// Execute the recommend command.
///
/// The home bank comes from the session (profile or `set home-bank`).
pub fn execute_recommend(session: &mut Session, formatter: &Formatter) -> Result<()> {
    let home_bank = session.params.home_bank.clone().ok_or_else(|| {
        CliError::InvalidInput(
            "No home bank set. Use --home-bank, 'set home-bank <bank>' or a profile with home_bank."
                .to_string(),
        )
    })?;

    let SessionReport { dataset, report } = session.analyze()?;
    report_unavailable(&dataset, formatter);

    let recs = Recommendations::partition(&report.ranked, &home_bank);
    println!(
        "{}",
        formatter.format_recommendations(report.scores.kind(), &recs)?
    );
    Ok(())
}

//! Overview command implementation.

use super::report_unavailable;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::{Session, SessionReport};
use txflow_analysis::TransactionInsights;
use txflow_loader::read_auxiliary_tables;

/// Execute the overview command.
///
/// Network shape comes from the filtered graph; insights cover the filtered records.
pub fn execute_overview(session: &mut Session, formatter: &Formatter) -> Result<()> {
    let SessionReport { dataset, report } = session.analyze()?;
    report_unavailable(&dataset, formatter);

    let insights = TransactionInsights::of(&report.filtered, session.analysis_config());
    let auxiliary = read_auxiliary_tables(session.source());

    println!(
        "{}",
        formatter.format_network_report(&report.overview, &insights, &auxiliary)?
    );
    Ok(())
}

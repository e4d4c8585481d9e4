//! Transactions command implementation.

use super::report_unavailable;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::{Session, SessionReport};
use txflow_analysis::top_transactions;

/// Execute the transactions command: the largest filtered transactions by amount.
pub fn execute_transactions(
    session: &mut Session,
    limit: Option<usize>,
    formatter: &Formatter,
) -> Result<()> {
    let limit = limit.unwrap_or(session.analysis_config().top_transactions);
    if limit == 0 {
        return Err(CliError::InvalidInput("limit must be at least 1".to_string()));
    }

    let SessionReport { dataset, report } = session.analyze()?;
    report_unavailable(&dataset, formatter);

    let top = top_transactions(&report.filtered, limit);
    println!("{}", formatter.format_transactions(&top)?);
    Ok(())
}

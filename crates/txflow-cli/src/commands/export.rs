//! Export command implementation.

use super::report_unavailable;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::{Session, SessionReport};
use std::fs;
use std::path::Path;
use txflow_analysis::RenderGraph;

/// Execute the export command: write the leaderboard subgraph as a render document.
///
/// The document is always JSON; `output` of `None` prints it to stdout.
pub fn execute_export(
    session: &mut Session,
    output: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    let SessionReport { dataset, report } = session.analyze()?;
    report_unavailable(&dataset, formatter);

    let options = session.params.render_options(&dataset.records);
    let render = RenderGraph::from_subgraph(&report.subgraph, &report.scores, &options);
    let json = render.to_json()?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            eprintln!(
                "{}",
                formatter.success(&format!(
                    "Exported {} nodes and {} edges to {}",
                    render.nodes.len(),
                    render.edges.len(),
                    path.display()
                ))
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

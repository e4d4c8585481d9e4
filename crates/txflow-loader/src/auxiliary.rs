//! Optional secondary tables stored next to the main source
//!
//! Precomputed `nodes.csv` / `edges.csv` exports are read if present so they
//! can be reported, but nothing in the analysis depends on them.

use std::path::{Path, PathBuf};

/// File names probed next to the transaction source
pub const AUXILIARY_TABLES: [&str; 2] = ["nodes.csv", "edges.csv"];

/// Summary of an auxiliary table that was found and parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryTable {
    /// File name (e.g. `nodes.csv`)
    pub name: String,

    /// Full path of the file
    pub path: PathBuf,

    /// Header columns
    pub columns: Vec<String>,

    /// Number of data rows
    pub row_count: usize,
}

/// Read every auxiliary table present in the directory of `source`
///
/// Missing tables are skipped silently; unreadable ones are logged and skipped.
pub fn read_auxiliary_tables(source: &Path) -> Vec<AuxiliaryTable> {
    let directory = source.parent().unwrap_or_else(|| Path::new("."));

    AUXILIARY_TABLES
        .iter()
        .map(|name| directory.join(name))
        .filter(|path| path.is_file())
        .filter_map(|path| match summarize(&path) {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable auxiliary table");
                None
            }
        })
        .collect()
}

fn summarize(path: &Path) -> Result<AuxiliaryTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let columns = reader.headers()?.iter().map(str::to_string).collect();

    let mut row_count = 0;
    for row in reader.records() {
        row?;
        row_count += 1;
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(table = %name, rows = row_count, "Read auxiliary table");

    Ok(AuxiliaryTable {
        name,
        path: path.to_path_buf(),
        columns,
        row_count,
    })
}

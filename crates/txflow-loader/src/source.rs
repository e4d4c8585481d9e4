//! File-backed transaction sources (CSV, JSON and spreadsheets)

use crate::LoaderError;
use calamine::{Data, Reader};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use txflow_domain::{dedup_records, NodeKey, TransactionRecord, TransactionSource};

/// Columns every source must provide
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "type",
    "debitor_name",
    "debitor_bank",
    "sender_recipient_name",
    "sender_recipient_bank",
    "amount_tx_idr",
    "trx",
];

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values with a header row
    Csv,
    /// A JSON array of row objects
    Json,
    /// A spreadsheet workbook; the first sheet holds the table
    Xlsx,
}

impl SourceFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            "xlsx" | "xlsm" | "xls" => Ok(SourceFormat::Xlsx),
            _ => Err(LoaderError::UnsupportedFormat(extension)),
        }
    }
}

/// A transaction table stored in a file
///
/// # Examples
///
/// ```no_run
/// use txflow_domain::TransactionSource;
/// use txflow_loader::FileSource;
///
/// let source = FileSource::new("transactions.csv");
/// let records = source.load().unwrap();
/// println!("{} records", records.len());
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given path
    ///
    /// Nothing is read until [`TransactionSource::load`] is called.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, LoaderError> {
        File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoaderError::NotFound(self.path.clone()),
            _ => LoaderError::Unreadable {
                path: self.path.clone(),
                source: e,
            },
        })
    }

    fn read_rows(&self) -> Result<Vec<TransactionRecord>, LoaderError> {
        let format = SourceFormat::from_path(&self.path)?;
        let file = self.open()?;

        match format {
            SourceFormat::Csv => parse_csv(file),
            SourceFormat::Json => parse_json(BufReader::new(file)),
            SourceFormat::Xlsx => {
                let mut bytes = Vec::new();
                BufReader::new(file)
                    .read_to_end(&mut bytes)
                    .map_err(|e| LoaderError::Unreadable {
                        path: self.path.clone(),
                        source: e,
                    })?;
                parse_xlsx(Cursor::new(bytes))
            }
        }
    }
}

impl TransactionSource for FileSource {
    type Error = LoaderError;

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<TransactionRecord>, LoaderError> {
        let rows = self.read_rows()?;
        let total = rows.len();
        let records = dedup_records(rows);

        tracing::info!(
            source = %self.path.display(),
            rows = total,
            duplicates = total - records.len(),
            "Loaded transaction records"
        );

        Ok(records)
    }
}

/// Load and deduplicate the records of a file in one call
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<TransactionRecord>, LoaderError> {
    FileSource::new(path).load()
}

/// A CSV row with every required column as text
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "type")]
    tx_type: String,
    debitor_name: String,
    debitor_bank: String,
    sender_recipient_name: String,
    sender_recipient_bank: String,
    amount_tx_idr: String,
    trx: String,
}

/// Parse CSV text with a header row
pub(crate) fn parse_csv<R: io::Read>(reader: R) -> Result<Vec<TransactionRecord>, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    check_columns(headers.iter())?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let row = row.map_err(|e| LoaderError::MalformedRow {
            row: row_number,
            reason: e.to_string(),
        })?;

        let amount = parse_amount(&row.amount_tx_idr, row_number)?;
        records.push(TransactionRecord::new(
            NodeKey::new(row.debitor_name, row.debitor_bank),
            NodeKey::new(row.sender_recipient_name, row.sender_recipient_bank),
            amount,
            row.trx,
            row.tx_type,
        ));
    }

    Ok(records)
}

/// Parse a JSON array of row objects
pub(crate) fn parse_json<R: io::Read>(reader: R) -> Result<Vec<TransactionRecord>, LoaderError> {
    let rows: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;

    if let Some(first) = rows.first() {
        check_columns(first.keys().map(String::as_str))?;
    }

    rows.iter()
        .enumerate()
        .map(|(index, row)| json_row_to_record(row, index + 1))
        .collect()
}

fn json_row_to_record(row: &Map<String, Value>, row_number: usize) -> Result<TransactionRecord, LoaderError> {
    let text = |column: &str| -> Result<String, LoaderError> {
        match row.get(column) {
            Some(value) => json_text(value).ok_or_else(|| LoaderError::MalformedRow {
                row: row_number,
                reason: format!("column '{}' must be text or a number", column),
            }),
            None => Err(LoaderError::MissingColumns(vec![column.to_string()])),
        }
    };

    let amount = match row.get("amount_tx_idr") {
        Some(Value::Number(n)) => {
            let value = n.as_f64().unwrap_or(f64::NAN);
            validate_amount(value, row_number)?
        }
        Some(Value::String(s)) => parse_amount(s, row_number)?,
        Some(_) => {
            return Err(LoaderError::MalformedRow {
                row: row_number,
                reason: "amount_tx_idr must be a number".to_string(),
            })
        }
        None => return Err(LoaderError::MissingColumns(vec!["amount_tx_idr".to_string()])),
    };

    Ok(TransactionRecord::new(
        NodeKey::new(text("debitor_name")?, text("debitor_bank")?),
        NodeKey::new(text("sender_recipient_name")?, text("sender_recipient_bank")?),
        amount,
        text("trx")?,
        text("type")?,
    ))
}

/// Parse the first sheet of a workbook whose first row is the header
pub(crate) fn parse_xlsx<R: io::Read + io::Seek + Clone>(reader: R) -> Result<Vec<TransactionRecord>, LoaderError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoaderError::Parse("workbook has no sheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_text(cell).trim().to_string()).collect())
        .unwrap_or_default();
    check_columns(headers.iter().map(String::as_str))?;

    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| LoaderError::MissingColumns(vec![name.to_string()]))?;
    }
    let [tx_type, debitor_name, debitor_bank, recipient_name, recipient_bank, amount_column, trx] = columns;

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let row_number = index + 1;
        let text = |column: usize| row.get(column).map(cell_text).unwrap_or_default();

        let amount = match row.get(amount_column) {
            Some(Data::Float(value)) => validate_amount(*value, row_number)?,
            Some(Data::Int(value)) => validate_amount(*value as f64, row_number)?,
            _ => parse_amount(&text(amount_column), row_number)?,
        };

        records.push(TransactionRecord::new(
            NodeKey::new(text(debitor_name), text(debitor_bank)),
            NodeKey::new(text(recipient_name), text(recipient_bank)),
            amount,
            text(trx),
            text(tx_type),
        ));
    }

    Ok(records)
}

/// Render a spreadsheet cell as text; integral numbers lose their fraction
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Render a JSON scalar as text; integral numbers lose their fraction
fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn check_columns<'a, I>(present: I) -> Result<(), LoaderError>
where
    I: Iterator<Item = &'a str>,
{
    let present: Vec<&str> = present.map(str::trim).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !present.contains(*column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoaderError::MissingColumns(missing))
    }
}

fn parse_amount(raw: &str, row_number: usize) -> Result<f64, LoaderError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    let value = cleaned.trim().parse::<f64>().map_err(|_| LoaderError::MalformedRow {
        row: row_number,
        reason: format!("amount_tx_idr '{}' is not a number", raw),
    })?;
    validate_amount(value, row_number)
}

fn validate_amount(value: f64, row_number: usize) -> Result<f64, LoaderError> {
    if !value.is_finite() || value < 0.0 {
        return Err(LoaderError::MalformedRow {
            row: row_number,
            reason: format!("amount_tx_idr must be a finite non-negative number, got {}", value),
        });
    }
    Ok(value)
}

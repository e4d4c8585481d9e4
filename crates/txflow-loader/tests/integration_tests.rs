//! Integration tests for txflow-loader
//!
//! These tests exercise file-backed loading, deduplication, and caching.

use rust_xlsxwriter::Workbook;
use std::fs;
use tempfile::TempDir;
use txflow_domain::{NodeKey, TransactionSource};
use txflow_loader::{load_records, FileSource, LoaderError, RecordCache, REQUIRED_COLUMNS};

const CSV: &str = "\
type,debitor_name,debitor_bank,sender_recipient_name,sender_recipient_bank,amount_tx_idr,trx
OUTGOING,X,B1,Y,B2,100,1
INCOMING,X,B1,Z,B3,50,1
OUTGOING,Y,B2,Z,B3,200,1
OUTGOING,X,B1,Y,B2,100,1
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_csv_load_dedupes() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "transactions.csv", CSV);

    let records = load_records(&path).unwrap();
    assert_eq!(records.len(), 3, "Exact duplicate row should be dropped");
    assert_eq!(records[0].debitor_key(), NodeKey::new("X", "B1"));
    assert_eq!(records[2].amount_tx_idr, 200.0);
}

#[test]
fn test_loading_twice_yields_same_records() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "transactions.csv", CSV);

    let source = FileSource::new(&path);
    assert_eq!(source.load().unwrap(), source.load().unwrap());
}

#[test]
fn test_json_load() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "transactions.json",
        r#"[{"type": "OUTGOING", "debitor_name": "X", "debitor_bank": "B1",
             "sender_recipient_name": "Y", "sender_recipient_bank": "B2",
             "amount_tx_idr": 100.0, "trx": 1, "channel": "mobile"}]"#,
    );

    let records = load_records(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].trx, "1");
}

#[test]
fn test_xlsx_load_first_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transactions.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in REQUIRED_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let rows = [
        ("OUTGOING", "X", "B1", "Y", "B2"),
        ("INCOMING", "X ", "B1", "Z", "B3"),
    ];
    for (i, (tx_type, debitor, debitor_bank, counterparty, counterparty_bank)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *tx_type).unwrap();
        sheet.write_string(row, 1, *debitor).unwrap();
        sheet.write_string(row, 2, *debitor_bank).unwrap();
        sheet.write_string(row, 3, *counterparty).unwrap();
        sheet.write_string(row, 4, *counterparty_bank).unwrap();
        sheet.write_number(row, 6, row).unwrap();
    }
    sheet.write_number(1, 5, 100.0).unwrap();
    sheet.write_string(2, 5, "1,250.5").unwrap();
    workbook.save(&path).unwrap();

    let records = load_records(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].debitor_key(), NodeKey::new("X", "B1"));
    assert_eq!(records[0].amount_tx_idr, 100.0);
    assert_eq!(records[0].trx, "1");
    assert_eq!(records[1].debitor_name, "X ");
    assert_eq!(records[1].amount_tx_idr, 1250.5);
    assert_eq!(records[1].tx_type, "INCOMING");
}

#[test]
fn test_xlsx_missing_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transactions.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "type").unwrap();
    sheet.write_string(1, 0, "OUTGOING").unwrap();
    workbook.save(&path).unwrap();

    assert!(matches!(load_records(&path), Err(LoaderError::MissingColumns(_))));
}

#[test]
fn test_missing_source_is_data_unavailable() {
    let dir = TempDir::new().unwrap();
    let err = load_records(dir.path().join("absent.csv")).unwrap_err();

    assert!(matches!(err, LoaderError::NotFound(_)));
    assert!(err.to_string().starts_with("Data unavailable"));
}

#[test]
fn test_missing_columns_is_data_unavailable() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "transactions.csv", "type,amount_tx_idr\nOUTGOING,5\n");

    let err = load_records(&path).unwrap_err();
    assert!(matches!(err, LoaderError::MissingColumns(_)));
    assert!(err.to_string().contains("debitor_name"));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "transactions.parquet", "binary");

    assert!(matches!(load_records(&path), Err(LoaderError::UnsupportedFormat(_))));
}

#[test]
fn test_cache_refresh_picks_up_changes() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "transactions.csv", CSV);

    let mut cache = RecordCache::new(FileSource::new(&path));
    assert_eq!(cache.get_or_load().unwrap().len(), 3);

    // Source changes on disk; the cache keeps serving the old rows
    let extra = format!("{}INCOMING,W,B4,X,B1,10,1\n", CSV);
    fs::write(&path, extra).unwrap();
    assert_eq!(cache.get_or_load().unwrap().len(), 3);

    cache.invalidate();
    assert_eq!(cache.get_or_load().unwrap().len(), 4);
}

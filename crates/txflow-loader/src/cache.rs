//! Memoized access to a transaction source

use std::sync::Arc;
use txflow_domain::{TransactionRecord, TransactionSource};

/// Caches the records of a source for the lifetime of a session
///
/// The first [`get_or_load`](RecordCache::get_or_load) reads the source; later
/// calls return the same shared records until [`invalidate`](RecordCache::invalidate)
/// is called. Failed loads are not cached, so the next call retries.
///
/// # Examples
///
/// ```no_run
/// use txflow_loader::{FileSource, RecordCache};
///
/// let mut cache = RecordCache::new(FileSource::new("transactions.csv"));
/// let first = cache.get_or_load().unwrap();
/// let again = cache.get_or_load().unwrap(); // served from memory
/// assert!(std::sync::Arc::ptr_eq(&first, &again));
///
/// cache.invalidate(); // next call re-reads the file
/// ```
#[derive(Debug)]
pub struct RecordCache<S> {
    source: S,
    records: Option<Arc<Vec<TransactionRecord>>>,
    load_count: usize,
}

impl<S: TransactionSource> RecordCache<S> {
    /// Create an empty cache over `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            records: None,
            load_count: 0,
        }
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached records, loading them on first use
    pub fn get_or_load(&mut self) -> Result<Arc<Vec<TransactionRecord>>, S::Error> {
        if let Some(records) = &self.records {
            tracing::debug!(source = %self.source.describe(), "Record cache hit");
            return Ok(Arc::clone(records));
        }

        let records = Arc::new(self.source.load()?);
        self.load_count += 1;
        self.records = Some(Arc::clone(&records));
        Ok(records)
    }

    /// Drop the cached records so the next request re-reads the source
    pub fn invalidate(&mut self) {
        if self.records.take().is_some() {
            tracing::info!(source = %self.source.describe(), "Record cache invalidated");
        }
    }

    /// Whether records are currently cached
    pub fn is_loaded(&self) -> bool {
        self.records.is_some()
    }

    /// Number of successful loads performed so far
    pub fn load_count(&self) -> usize {
        self.load_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use txflow_domain::NodeKey;

    struct CountingSource {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail: Cell::new(false),
            }
        }
    }

    impl TransactionSource for CountingSource {
        type Error = String;

        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn load(&self) -> Result<Vec<TransactionRecord>, String> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err("offline".to_string());
            }
            Ok(vec![TransactionRecord::new(
                NodeKey::new("X", "B1"),
                NodeKey::new("Y", "B2"),
                1.0,
                "1",
                "OUTGOING",
            )])
        }
    }

    #[test]
    fn test_loads_once() {
        let mut cache = RecordCache::new(CountingSource::new());
        let a = cache.get_or_load().unwrap();
        let b = cache.get_or_load().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.source().calls.get(), 1);
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let mut cache = RecordCache::new(CountingSource::new());
        cache.get_or_load().unwrap();
        assert!(cache.is_loaded());

        cache.invalidate();
        assert!(!cache.is_loaded());

        cache.get_or_load().unwrap();
        assert_eq!(cache.source().calls.get(), 2);
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut cache = RecordCache::new(CountingSource::new());
        cache.source().fail.set(true);
        assert!(cache.get_or_load().is_err());
        assert!(!cache.is_loaded());

        cache.source().fail.set(false);
        assert_eq!(cache.get_or_load().unwrap().len(), 1);
        assert_eq!(cache.source().calls.get(), 2);
    }
}

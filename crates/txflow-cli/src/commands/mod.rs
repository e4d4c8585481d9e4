//! Command implementations.

pub mod analyze;
pub mod export;
pub mod overview;
pub mod profile;
pub mod recommend;
pub mod transactions;

pub use self::analyze::{execute_analyze, execute_rank};
pub use self::export::execute_export;
pub use self::overview::execute_overview;
pub use self::profile::execute_profile;
pub use self::recommend::execute_recommend;
pub use self::transactions::execute_transactions;

use crate::output::Formatter;
use crate::session::Dataset;

/// Tell the user the data source could not be read; the command goes on with no records.
fn report_unavailable(dataset: &Dataset, formatter: &Formatter) {
    if let Some(reason) = &dataset.unavailable {
        eprintln!("{}", formatter.error(reason));
    }
}

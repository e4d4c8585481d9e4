//! txflow CLI library.
//!
//! Configuration profiles, the analysis session that caches loaded records and
//! holds the current view parameters, command execution, and output formatting
//! for the `txflow` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::{Session, ViewParams};

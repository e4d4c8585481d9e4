//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use txflow_domain::MetricKind;

/// txflow - Rank the entities of a transaction network.
#[derive(Debug, Parser)]
#[command(name = "txflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TXFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Transaction table to analyze, overriding the profile's source
    #[arg(short, long, global = true)]
    pub source: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (entity ids only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Network overview, metric explanation and leaderboard
    Analyze(FilterArgs),

    /// Leaderboard only
    Rank(FilterArgs),

    /// Network overview, type mix and amount histogram
    Overview(FilterArgs),

    /// Largest transactions by amount
    Transactions(TransactionsArgs),

    /// Split the leaderboard into retention and acquisition candidates
    Recommend(RecommendArgs),

    /// Write the leaderboard subgraph as a render document
    Export(ExportArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Filters and ranking options shared by the analysis commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Smallest transaction amount to keep
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Largest transaction amount to keep
    #[arg(long)]
    pub max_amount: Option<f64>,

    /// Transaction type to keep (repeatable)
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Bank to keep, matched on either side of a transaction (repeatable)
    #[arg(long = "bank", value_name = "BANK")]
    pub banks: Vec<String>,

    /// Ranking metric
    #[arg(short, long, value_enum)]
    pub metric: Option<MetricArg>,

    /// Leaderboard size (5-1000)
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,
}

/// Arguments for the transactions command.
#[derive(Debug, Clone, Args)]
pub struct TransactionsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Number of transactions to list
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the recommend command.
#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Bank whose customers are retention candidates
    #[arg(long)]
    pub home_bank: Option<String>,
}

/// Arguments for the export command.
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Node size factor (10-1000)
    #[arg(long)]
    pub node_size: Option<f64>,

    /// Edge width factor (0.1-10)
    #[arg(long)]
    pub edge_width: Option<f64>,

    /// Bank to highlight
    #[arg(long)]
    pub home_bank: Option<String>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, PartialEq, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Transaction table path
        path: PathBuf,
        /// Home bank
        #[arg(long)]
        home_bank: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Ranking metric argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MetricArg {
    /// Distinct neighbours in either direction
    Degree,
    /// Distinct senders
    InDegree,
    /// Distinct recipients
    OutDegree,
    /// Shortest-path brokerage
    Betweenness,
    /// Influence by incoming links
    Pagerank,
    /// Sum of incoming and outgoing amounts
    TotalValue,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<MetricArg> for MetricKind {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::Degree => MetricKind::Degree,
            MetricArg::InDegree => MetricKind::InDegree,
            MetricArg::OutDegree => MetricKind::OutDegree,
            MetricArg::Betweenness => MetricKind::Betweenness,
            MetricArg::Pagerank => MetricKind::PageRank,
            MetricArg::TotalValue => MetricKind::TotalValue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_repl() {
        let cli = Cli::parse_from(["txflow"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_analyze_filters() {
        let cli = Cli::parse_from([
            "txflow",
            "analyze",
            "--min-amount",
            "100",
            "--type",
            "INCOMING",
            "--type",
            "OUTGOING",
            "--bank",
            "B1",
            "--metric",
            "total-value",
            "-n",
            "10",
        ]);
        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.min_amount, Some(100.0));
                assert_eq!(args.types, vec!["INCOMING", "OUTGOING"]);
                assert_eq!(args.banks, vec!["B1"]);
                assert_eq!(args.metric, Some(MetricArg::TotalValue));
                assert_eq!(args.top_n, Some(10));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_global_source_after_subcommand() {
        let cli = Cli::parse_from(["txflow", "rank", "--source", "march.csv", "--format", "json"]);
        assert_eq!(cli.source, Some(PathBuf::from("march.csv")));
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }

    #[test]
    fn test_export_output() {
        let cli = Cli::parse_from(["txflow", "export", "-o", "graph.json", "--node-size", "600"]);
        match cli.command {
            Some(Command::Export(args)) => {
                assert_eq!(args.output, Some(PathBuf::from("graph.json")));
                assert_eq!(args.node_size, Some(600.0));
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_profile_set() {
        let cli = Cli::parse_from(["txflow", "profile", "set", "march", "data/march.csv", "--home-bank", "B1"]);
        match cli.command {
            Some(Command::Profile(ProfileArgs {
                action: ProfileAction::Set { name, path, home_bank },
            })) => {
                assert_eq!(name, "march");
                assert_eq!(path, PathBuf::from("data/march.csv"));
                assert_eq!(home_bank.as_deref(), Some("B1"));
            }
            _ => panic!("Expected Profile Set command"),
        }
    }

    #[test]
    fn test_metric_conversion() {
        let metric: MetricKind = MetricArg::Pagerank.into();
        assert_eq!(metric, MetricKind::PageRank);
        let metric: MetricKind = MetricArg::InDegree.into();
        assert_eq!(metric.as_str(), "in-degree");
    }
}

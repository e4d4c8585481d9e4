//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::session::ViewParams;
use colored::*;
use txflow_analysis::{
    format_amount, Diameter, NetworkOverview, RankedEntity, Recommendations, TransactionInsights,
    ACQUISITION_ACTIONS, RETENTION_ACTIONS, STRATEGIC_ACTIONS,
};
use txflow_domain::{MetricKind, TransactionRecord};
use txflow_loader::AuxiliaryTable;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Width of the longest histogram bar, in characters.
const HISTOGRAM_WIDTH: usize = 40;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the leaderboard.
    pub fn format_leaderboard(&self, metric: MetricKind, ranked: &[RankedEntity]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&leaderboard_json(metric, ranked))?),
            OutputFormat::Quiet => Ok(ranked
                .iter()
                .map(|r| r.node.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if ranked.is_empty() {
                    return Ok(self.colorize("No entities to rank.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Entity", "Bank", metric.display_name()]);
                for (i, r) in ranked.iter().enumerate() {
                    builder.push_record([
                        (i + 1).to_string(),
                        r.node.name.clone(),
                        r.node.bank.clone(),
                        format_score(metric, r.score),
                    ]);
                }

                let title = self.colorize(&format!("Top {} entities by {}", ranked.len(), metric), "cyan");
                Ok(format!("{}\n{}", title, self.table(builder)))
            }
        }
    }

    /// Format overview, metric explanation and leaderboard as one report.
    pub fn format_analysis(
        &self,
        overview: &NetworkOverview,
        metric: MetricKind,
        ranked: &[RankedEntity],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "overview": overview_json(overview),
                "metric": metric_json(metric),
                "leaderboard": leaderboard_json(metric, ranked),
            }))?),
            OutputFormat::Quiet => self.format_leaderboard(metric, ranked),
            OutputFormat::Table => Ok([
                self.format_overview(overview)?,
                self.format_metric(metric)?,
                self.format_leaderboard(metric, ranked)?,
            ]
            .join("\n\n")),
        }
    }

    /// Format the network overview cards.
    pub fn format_overview(&self, overview: &NetworkOverview) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&overview_json(overview))?),
            OutputFormat::Quiet => Ok(format!(
                "{} {} {:.4} {}",
                overview.node_count, overview.transaction_count, overview.density, overview.diameter
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Nodes", "Transactions", "Connections", "Density", "Diameter"]);
                builder.push_record([
                    overview.node_count.to_string(),
                    overview.transaction_count.to_string(),
                    overview.connection_count.to_string(),
                    format!("{:.4}", overview.density),
                    overview.diameter.to_string(),
                ]);
                Ok(format!(
                    "{}\n{}",
                    self.colorize("Network Overview", "cyan"),
                    self.table(builder)
                ))
            }
        }
    }

    /// Format the network overview followed by record insights.
    pub fn format_network_report(
        &self,
        overview: &NetworkOverview,
        insights: &TransactionInsights,
        auxiliary: &[AuxiliaryTable],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "overview": overview_json(overview),
                "insights": insights_json(insights, auxiliary),
            }))?),
            OutputFormat::Quiet | OutputFormat::Table => Ok(format!(
                "{}\n\n{}",
                self.format_overview(overview)?,
                self.format_insights(insights, auxiliary)?
            )),
        }
    }

    /// Describe a metric and how to act on it.
    pub fn format_metric(&self, metric: MetricKind) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&metric_json(metric))?),
            OutputFormat::Quiet => Ok(metric.as_str().to_string()),
            OutputFormat::Table => Ok(format!(
                "{}\n  Description:    {}\n  Interpretation: {}\n  Strategy:       {}",
                self.colorize(metric.display_name(), "cyan"),
                metric.description(),
                metric.interpretation(),
                metric.strategy()
            )),
        }
    }

    /// Format type mix, amount histogram and auxiliary tables.
    pub fn format_insights(
        &self,
        insights: &TransactionInsights,
        auxiliary: &[AuxiliaryTable],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&insights_json(insights, auxiliary))?),
            OutputFormat::Quiet => Ok(format!(
                "{} {}",
                insights.record_count,
                format_amount(insights.total_amount)
            )),
            OutputFormat::Table => {
                let mut sections = vec![format!(
                    "{} {} transactions, {} IDR total",
                    self.colorize("Transaction Insights:", "cyan"),
                    insights.record_count,
                    format_amount(insights.total_amount)
                )];

                if !insights.type_distribution.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["Type", "Count", "Share"]);
                    for t in &insights.type_distribution {
                        let share = 100.0 * t.count as f64 / insights.record_count.max(1) as f64;
                        builder.push_record([t.tx_type.clone(), t.count.to_string(), format!("{:.1}%", share)]);
                    }
                    sections.push(self.table(builder));
                }

                if !insights.histogram.is_empty() {
                    let peak = insights.histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
                    let mut builder = Builder::default();
                    builder.push_record(["Amount (IDR)", "Count", ""]);
                    for bin in &insights.histogram {
                        let bar = "█".repeat(bin.count * HISTOGRAM_WIDTH / peak);
                        builder.push_record([
                            format!("{} - {}", format_amount(bin.lower), format_amount(bin.upper)),
                            bin.count.to_string(),
                            bar,
                        ]);
                    }
                    sections.push(self.table(builder));
                }

                for table in auxiliary {
                    sections.push(self.info(&format!(
                        "{}: {} rows ({})",
                        table.name,
                        table.row_count,
                        table.columns.join(", ")
                    )));
                }

                Ok(sections.join("\n"))
            }
        }
    }

    /// Format a list of transactions.
    pub fn format_transactions(&self, records: &[TransactionRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = records
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "type": r.tx_type,
                            "debitor_name": r.debitor_name,
                            "debitor_bank": r.debitor_bank,
                            "sender_recipient_name": r.sender_recipient_name,
                            "sender_recipient_bank": r.sender_recipient_bank,
                            "amount_tx_idr": r.amount_tx_idr,
                            "trx": r.trx,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| format!("{}", r.amount_tx_idr))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if records.is_empty() {
                    return Ok(self.colorize("No transactions found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Type", "Debitor", "Debitor Bank", "Counterparty", "Counterparty Bank", "Amount (IDR)", "Trx"]);
                for r in records {
                    builder.push_record([
                        r.tx_type.clone(),
                        r.debitor_name.clone(),
                        r.debitor_bank.clone(),
                        r.sender_recipient_name.clone(),
                        r.sender_recipient_bank.clone(),
                        format_amount(r.amount_tx_idr),
                        r.trx.clone(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format retention and acquisition candidates.
    pub fn format_recommendations(&self, metric: MetricKind, recs: &Recommendations) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "metric": metric.as_str(),
                    "home_bank": recs.home_bank,
                    "retention": entity_scores(&recs.retention),
                    "acquisition": entity_scores(&recs.acquisition),
                    "retention_actions": RETENTION_ACTIONS,
                    "acquisition_actions": ACQUISITION_ACTIONS,
                    "strategic_actions": STRATEGIC_ACTIONS,
                }))?)
            }
            OutputFormat::Quiet => {
                let lines: Vec<String> = recs
                    .retention
                    .iter()
                    .map(|r| format!("retain\t{}", r.node))
                    .chain(recs.acquisition.iter().map(|r| format!("acquire\t{}", r.node)))
                    .collect();
                Ok(lines.join("\n"))
            }
            OutputFormat::Table => {
                let sections = [
                    self.candidate_section(
                        &format!("Retention candidates ({})", recs.home_bank),
                        metric,
                        &recs.retention,
                        &RETENTION_ACTIONS,
                    ),
                    self.candidate_section(
                        &format!("Acquisition targets (outside {})", recs.home_bank),
                        metric,
                        &recs.acquisition,
                        &ACQUISITION_ACTIONS,
                    ),
                    format!(
                        "{}\n{}",
                        self.colorize("Strategic actions", "cyan"),
                        bullets(&STRATEGIC_ACTIONS)
                    ),
                ];
                Ok(sections.join("\n\n"))
            }
        }
    }

    /// Format the current view parameters.
    pub fn format_params(&self, params: &ViewParams, records: &[TransactionRecord]) -> Result<String> {
        let range = params.amount_range(records);
        let types = match &params.types {
            Some(types) => types.iter().cloned().collect::<Vec<_>>().join(", "),
            None => "(all)".to_string(),
        };
        let banks = if params.banks.is_empty() {
            "(all)".to_string()
        } else {
            params.banks.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        let home_bank = params.home_bank.clone().unwrap_or_else(|| "(none)".to_string());

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "metric": params.metric.as_str(),
                "top_n": params.top_n,
                "amount_min": range.min,
                "amount_max": range.max,
                "types": params.types,
                "banks": params.banks,
                "home_bank": params.home_bank,
                "node_size_factor": params.node_size_factor,
                "edge_width_factor": params.edge_width_factor,
            }))?),
            OutputFormat::Quiet | OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Parameter", "Value"]);
                builder.push_record(["metric".to_string(), params.metric.as_str().to_string()]);
                builder.push_record(["top".to_string(), params.top_n.to_string()]);
                builder.push_record([
                    "amount".to_string(),
                    format!("{} - {}", format_amount(range.min), format_amount(range.max)),
                ]);
                builder.push_record(["types".to_string(), types]);
                builder.push_record(["banks".to_string(), banks]);
                builder.push_record(["home-bank".to_string(), home_bank]);
                builder.push_record(["node-size".to_string(), params.node_size_factor.to_string()]);
                builder.push_record(["edge-width".to_string(), params.edge_width_factor.to_string()]);
                Ok(self.table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn candidate_section(
        &self,
        title: &str,
        metric: MetricKind,
        candidates: &[RankedEntity],
        actions: &[&str],
    ) -> String {
        let body = if candidates.is_empty() {
            "  (none)".to_string()
        } else {
            candidates
                .iter()
                .map(|r| format!("  {:<40} {}", r.node.to_string(), format_score(metric, r.score)))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!("{}\n{}\n{}", self.colorize(title, "cyan"), body, bullets(actions))
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Render a score the way its metric reads best.
pub fn format_score(metric: MetricKind, score: f64) -> String {
    if metric.is_value_based() {
        format!("{} IDR", format_amount(score))
    } else {
        format!("{:.4}", score)
    }
}

fn leaderboard_json(metric: MetricKind, ranked: &[RankedEntity]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| {
            serde_json::json!({
                "rank": i + 1,
                "entity": r.node.to_string(),
                "name": r.node.name,
                "bank": r.node.bank,
                "score": r.score,
            })
        })
        .collect();
    serde_json::json!({
        "metric": metric.as_str(),
        "ranked": entries,
    })
}

fn overview_json(overview: &NetworkOverview) -> serde_json::Value {
    let diameter = match overview.diameter {
        Diameter::Finite(d) => serde_json::json!(d),
        Diameter::NotApplicable => serde_json::Value::Null,
    };
    serde_json::json!({
        "nodes": overview.node_count,
        "transactions": overview.transaction_count,
        "connections": overview.connection_count,
        "density": overview.density,
        "diameter": diameter,
    })
}

fn insights_json(insights: &TransactionInsights, auxiliary: &[AuxiliaryTable]) -> serde_json::Value {
    let types: Vec<serde_json::Value> = insights
        .type_distribution
        .iter()
        .map(|t| serde_json::json!({ "type": t.tx_type, "count": t.count }))
        .collect();
    let bins: Vec<serde_json::Value> = insights
        .histogram
        .iter()
        .map(|b| serde_json::json!({ "lower": b.lower, "upper": b.upper, "count": b.count }))
        .collect();
    let tables: Vec<serde_json::Value> = auxiliary
        .iter()
        .map(|t| serde_json::json!({ "name": t.name, "columns": t.columns, "rows": t.row_count }))
        .collect();
    serde_json::json!({
        "records": insights.record_count,
        "total_amount": insights.total_amount,
        "types": types,
        "histogram": bins,
        "auxiliary_tables": tables,
    })
}

fn metric_json(metric: MetricKind) -> serde_json::Value {
    serde_json::json!({
        "metric": metric.as_str(),
        "name": metric.display_name(),
        "description": metric.description(),
        "interpretation": metric.interpretation(),
        "strategy": metric.strategy(),
    })
}

fn entity_scores(entities: &[RankedEntity]) -> Vec<serde_json::Value> {
    entities
        .iter()
        .map(|r| serde_json::json!({ "entity": r.node.to_string(), "score": r.score }))
        .collect()
}

fn bullets(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use txflow_analysis::{AnalysisConfig, TransactionGraph};
    use txflow_domain::NodeKey;

    fn ranked() -> Vec<RankedEntity> {
        vec![
            RankedEntity {
                node: NodeKey::new("Alice", "B1"),
                score: 0.75,
            },
            RankedEntity {
                node: NodeKey::new("Bob", "B2"),
                score: 0.5,
            },
        ]
    }

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new(NodeKey::new("Alice", "B1"), NodeKey::new("Bob", "B2"), 1500.0, "1", "OUTGOING"),
            TransactionRecord::new(NodeKey::new("Alice", "B1"), NodeKey::new("Cy", "B3"), 20.0, "2", "INCOMING"),
        ]
    }

    #[test]
    fn test_json_leaderboard() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_leaderboard(MetricKind::PageRank, &ranked()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["metric"], "pagerank");
        assert_eq!(value["ranked"][0]["entity"], "Alice (B1)");
        assert_eq!(value["ranked"][1]["rank"], 2);
    }

    #[test]
    fn test_quiet_leaderboard() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_leaderboard(MetricKind::Degree, &ranked()).unwrap();
        assert_eq!(output, "Alice (B1)\nBob (B2)");
    }

    #[test]
    fn test_table_leaderboard() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_leaderboard(MetricKind::Degree, &ranked()).unwrap();
        assert!(output.contains("Degree Centrality"));
        assert!(output.contains("0.7500"));
    }

    #[test]
    fn test_empty_leaderboard() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_leaderboard(MetricKind::Degree, &[]).unwrap();
        assert!(output.contains("No entities to rank"));
    }

    #[test]
    fn test_value_scores_use_currency() {
        assert_eq!(format_score(MetricKind::TotalValue, 1234.5), "1,234.50 IDR");
        assert_eq!(format_score(MetricKind::Betweenness, 0.5), "0.5000");
    }

    #[test]
    fn test_overview_disconnected() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let graph = TransactionGraph::from_records(&records());
        let output = formatter.format_overview(&NetworkOverview::of(&graph)).unwrap();
        assert!(output.contains("N/A (disconnected)"));

        let json = Formatter::new(OutputFormat::Json, false)
            .format_overview(&NetworkOverview::of(&graph))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["diameter"].is_null());
        assert_eq!(value["nodes"], 3);
    }

    #[test]
    fn test_insights_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let insights = TransactionInsights::of(&records(), &AnalysisConfig::default());
        let output = formatter.format_insights(&insights, &[]).unwrap();
        assert!(output.contains("1,520.00 IDR total"));
        assert!(output.contains("OUTGOING"));
        assert!(output.contains("50.0%"));
    }

    #[test]
    fn test_recommendations_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let recs = Recommendations::partition(&ranked(), "B1");
        let output = formatter.format_recommendations(MetricKind::Degree, &recs).unwrap();
        assert!(output.contains("Retention candidates (B1)"));
        assert!(output.contains("Bob (B2)"));
        assert!(output.contains("fraud"));
    }

    #[test]
    fn test_transactions_json_keeps_columns() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_transactions(&records()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["type"], "OUTGOING");
        assert_eq!(value[0]["amount_tx_idr"], 1500.0);
    }

    #[test]
    fn test_analysis_json_is_one_document() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let graph = TransactionGraph::from_records(&records());
        let output = formatter
            .format_analysis(&NetworkOverview::of(&graph), MetricKind::Degree, &ranked())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["overview"]["transactions"], 2);
        assert_eq!(value["metric"]["metric"], "degree");
        assert_eq!(value["leaderboard"]["ranked"][0]["name"], "Alice");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}

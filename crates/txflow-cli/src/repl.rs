//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::BTreeSet;
use std::path::PathBuf;
use txflow_domain::MetricKind;

/// Run the interactive REPL.
pub fn run_repl(session: &mut Session, config: &mut Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("txflow REPL - Type 'help' for commands, 'exit' to quit"));
    println!("{}", formatter.info(&format!("Data source: {}", session.source().display())));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = format!("txflow [{}]> ", session.params.metric.as_str());

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, session, config, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Params,
    Reset,
    Refresh,
    Set(Setting),
    Analyze,
    Rank,
    Overview,
    Transactions(Option<usize>),
    Recommend,
    Export(Option<PathBuf>),
    Profile(ProfileAction),
}

/// A single view parameter change.
#[derive(Debug, PartialEq)]
enum Setting {
    Metric(MetricKind),
    Top(usize),
    Types(Option<BTreeSet<String>>),
    Banks(BTreeSet<String>),
    Amount(f64, f64),
    HomeBank(Option<String>),
    NodeSize(f64),
    EdgeWidth(f64),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "params" => Ok(ReplCommand::Params),
        "reset" => Ok(ReplCommand::Reset),
        "refresh" => Ok(ReplCommand::Refresh),
        "set" => parse_set_command(&parts[1..]).map(ReplCommand::Set),
        "analyze" => Ok(ReplCommand::Analyze),
        "rank" => Ok(ReplCommand::Rank),
        "overview" => Ok(ReplCommand::Overview),
        "transactions" => {
            let limit = parts.get(1).map(|s| parse_number::<usize>("limit", s)).transpose()?;
            Ok(ReplCommand::Transactions(limit))
        }
        "recommend" => Ok(ReplCommand::Recommend),
        "export" => Ok(ReplCommand::Export(parts.get(1).map(PathBuf::from))),
        "profile" => parse_profile_command(&parts[1..]),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

fn parse_set_command(args: &[&str]) -> Result<Setting> {
    let usage = || {
        CliError::InvalidInput(
            "Usage: set <metric|top|types|banks|amount|home-bank|node-size|edge-width> <value...>"
                .to_string(),
        )
    };

    let (name, values) = args.split_first().ok_or_else(usage)?;
    if values.is_empty() {
        return Err(usage());
    }

    match *name {
        "metric" => {
            let text = values.join(" ");
            MetricKind::parse(&text)
                .map(Setting::Metric)
                .ok_or_else(|| CliError::InvalidInput(format!("Unknown metric: {}", text)))
        }
        "top" => Ok(Setting::Top(parse_number("top", values[0])?)),
        "types" => Ok(Setting::Types(match values {
            ["all"] => None,
            _ => Some(parse_list(values)),
        })),
        "banks" => Ok(Setting::Banks(match values {
            ["all"] => BTreeSet::new(),
            _ => parse_list(values),
        })),
        "amount" => match values {
            [min, max] => Ok(Setting::Amount(
                parse_number("amount", min)?,
                parse_number("amount", max)?,
            )),
            _ => Err(CliError::InvalidInput("Usage: set amount <min> <max>".to_string())),
        },
        "home-bank" => Ok(Setting::HomeBank(match values {
            ["none"] => None,
            _ => Some(values.join(" ")),
        })),
        "node-size" => Ok(Setting::NodeSize(parse_number("node-size", values[0])?)),
        "edge-width" => Ok(Setting::EdgeWidth(parse_number("edge-width", values[0])?)),
        other => Err(CliError::InvalidInput(format!("Unknown parameter: {}", other))),
    }
}

/// Split values on commas as well as whitespace, so `B1,B2` and `B1 B2` agree.
fn parse_list(values: &[&str]) -> BTreeSet<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .replace(['_', ','], "")
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("Invalid {}: {}", name, value)))
}

fn parse_profile_command(args: &[&str]) -> Result<ReplCommand> {
    if args.is_empty() {
        return Ok(ReplCommand::Profile(ProfileAction::Show));
    }

    let action = match args[0] {
        "list" => ProfileAction::List,
        "show" => ProfileAction::Show,
        "switch" => {
            if args.len() < 2 {
                return Err(CliError::InvalidInput("Usage: profile switch <name>".to_string()));
            }
            ProfileAction::Switch {
                name: args[1].to_string(),
            }
        }
        _ => return Err(CliError::InvalidInput(format!("Unknown profile action: {}", args[0]))),
    };

    Ok(ReplCommand::Profile(action))
}

/// Execute a REPL command.
fn execute_repl_command(
    cmd: ReplCommand,
    session: &mut Session,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Exit | ReplCommand::Help => {}
        ReplCommand::Params => {
            let dataset = session.dataset();
            println!("{}", formatter.format_params(&session.params, &dataset.records)?);
        }
        ReplCommand::Reset => {
            session.reset();
            println!("{}", formatter.success("Parameters reset"));
        }
        ReplCommand::Refresh => {
            session.refresh();
            let dataset = session.dataset();
            match &dataset.unavailable {
                Some(reason) => eprintln!("{}", formatter.error(reason)),
                None => println!(
                    "{}",
                    formatter.success(&format!("Reloaded {} records", dataset.records.len()))
                ),
            }
        }
        ReplCommand::Set(setting) => {
            apply_setting(session, setting)?;
            println!("{}", formatter.success("Updated"));
        }
        ReplCommand::Analyze => commands::execute_analyze(session, formatter)?,
        ReplCommand::Rank => commands::execute_rank(session, formatter)?,
        ReplCommand::Overview => commands::execute_overview(session, formatter)?,
        ReplCommand::Transactions(limit) => commands::execute_transactions(session, limit, formatter)?,
        ReplCommand::Recommend => commands::execute_recommend(session, formatter)?,
        ReplCommand::Export(path) => commands::execute_export(session, path.as_deref(), formatter)?,
        ReplCommand::Profile(action) => {
            let switched = matches!(action, ProfileAction::Switch { .. });
            commands::execute_profile(ProfileArgs { action }, config, formatter)?;

            if switched {
                let profile = config.get_active_profile()?.clone();
                session.switch_source(&profile.source, profile.home_bank);
                println!(
                    "{}",
                    formatter.info(&format!("Data source: {}", session.source().display()))
                );
            }
        }
    }

    Ok(())
}

fn apply_setting(session: &mut Session, setting: Setting) -> Result<()> {
    match setting {
        Setting::Metric(metric) => session.params.metric = metric,
        Setting::Top(top_n) => session.params.set_top_n(top_n)?,
        Setting::Types(types) => session.params.types = types,
        Setting::Banks(banks) => session.params.banks = banks,
        Setting::Amount(min, max) => {
            let dataset = session.dataset();
            session
                .params
                .set_amount_bounds(Some(min), Some(max), &dataset.records)?;
        }
        Setting::HomeBank(bank) => session.params.home_bank = bank,
        Setting::NodeSize(factor) => session.params.set_node_size_factor(factor)?,
        Setting::EdgeWidth(factor) => session.params.set_edge_width_factor(factor)?,
    }
    Ok(())
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let txflow_dir = home.join(".txflow");
    std::fs::create_dir_all(&txflow_dir)?;
    Ok(txflow_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  analyze                        - Overview, metric explanation and leaderboard");
    println!("  rank                           - Leaderboard only");
    println!("  overview                       - Network overview, type mix and histogram");
    println!("  transactions [n]               - Largest transactions by amount");
    println!("  recommend                      - Retention and acquisition candidates");
    println!("  export [file]                  - Write the render document (stdout if no file)");
    println!("  set metric <name>              - degree|in-degree|out-degree|betweenness|pagerank|total-value");
    println!("  set top <n>                    - Leaderboard size (5-1000)");
    println!("  set types <t...>|all           - Transaction types to keep");
    println!("  set banks <b...>|all           - Banks to keep (either side)");
    println!("  set amount <min> <max>         - Amount range in IDR");
    println!("  set home-bank <bank>|none      - Bank for recommendations and highlighting");
    println!("  set node-size <f>              - Render node size factor (10-1000)");
    println!("  set edge-width <f>             - Render edge width factor (0.1-10)");
    println!("  params                         - Show current parameters");
    println!("  reset                          - Restore starting parameters");
    println!("  refresh                        - Re-read the data source");
    println!("  profile [list|show|switch]     - Manage profiles");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}

//! txflow - Command-line interface for transaction network analysis.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use txflow_cli::commands;
use txflow_cli::repl;
use txflow_cli::{Cli, Command, Config, Formatter, Session};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> txflow_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Using default configuration");
            Config::default()
        }),
    };

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    if let Some(Command::Profile(args)) = cli.command {
        return commands::execute_profile(args, &mut config, &formatter);
    }

    let mut session = Session::from_config(&config, cli.source)?;

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut session, &mut config, &formatter)?;
        }
        Some(Command::Analyze(args)) => {
            session.apply(&args)?;
            commands::execute_analyze(&mut session, &formatter)?;
        }
        Some(Command::Rank(args)) => {
            session.apply(&args)?;
            commands::execute_rank(&mut session, &formatter)?;
        }
        Some(Command::Overview(args)) => {
            session.apply(&args)?;
            commands::execute_overview(&mut session, &formatter)?;
        }
        Some(Command::Transactions(args)) => {
            session.apply(&args.filter)?;
            commands::execute_transactions(&mut session, args.limit, &formatter)?;
        }
        Some(Command::Recommend(args)) => {
            session.apply(&args.filter)?;
            if args.home_bank.is_some() {
                session.params.home_bank = args.home_bank;
            }
            commands::execute_recommend(&mut session, &formatter)?;
        }
        Some(Command::Export(args)) => {
            session.apply(&args.filter)?;
            if let Some(factor) = args.node_size {
                session.params.set_node_size_factor(factor)?;
            }
            if let Some(factor) = args.edge_width {
                session.params.set_edge_width_factor(factor)?;
            }
            if args.home_bank.is_some() {
                session.params.home_bank = args.home_bank;
            }
            commands::execute_export(&mut session, args.output.as_deref(), &formatter)?;
        }
        Some(Command::Profile(_)) => {}
    }

    Ok(())
}

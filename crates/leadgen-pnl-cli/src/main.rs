mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use leadgen_pnl_core::history::DirStore;

use commands::config::ConfigCommand;
use commands::evaluate::EvaluateArgs;
use commands::history::HistoryCommand;
use commands::matrix::MatrixArgs;
use commands::narrate::NarrateArgs;

/// Environment variable holding the log filter (e.g. `debug`, `leadgen_pnl_core=trace`)
const LOG_ENV: &str = "LGP_LOG";

/// Lead-generation profit projections
#[derive(Parser)]
#[command(
    name = "lgp",
    version,
    about = "Lead-generation profit projections and break-even matrices",
    long_about = "Projects monthly revenue, cost and gross profit for a three-line \
                  lead-generation business, scans cost x volume grids for break-even \
                  points, and keeps a local history of saved scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Directory holding the working configuration and history
    #[arg(long, default_value = ".leadgen-pnl", global = true)]
    store: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the monthly P&L for a parameter set
    Evaluate(EvaluateArgs),
    /// Scan a cost-per-lead x daily-leads grid for break-even points
    Matrix(MatrixArgs),
    /// Inspect or change the stored working configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Save, list, delete and export scenario snapshots
    #[command(subcommand)]
    History(HistoryCommand),
    /// Ask the text-generation service for a diagnostic report
    Narrate(NarrateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let mut store = DirStore::new(&cli.store);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::evaluate::run_evaluate(args, &store),
        Commands::Matrix(args) => commands::matrix::run_matrix(args, &store),
        Commands::Config(cmd) => commands::config::run_config(cmd, &mut store),
        Commands::History(cmd) => commands::history::run_history(cmd, &mut store),
        Commands::Narrate(args) => commands::narrate::run_narrate(args, &store),
        Commands::Version => {
            println!("lgp {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        // Already written to stdout by the command
        Ok(serde_json::Value::Null) => process::exit(0),
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

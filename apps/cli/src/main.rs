//! # Gerüst ERP Command Line
//!
//! Quotes ("Angebote") and invoices ("Rechnungen") from the terminal.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         geruest (this binary)                           │
//! │                                                                         │
//! │   clap ──► Commands ──► commands::<name>::run(args, &ctx)               │
//! │                               │                                         │
//! │               ┌───────────────┴───────────────┐                         │
//! │               ▼                               ▼                         │
//! │        geruest-core                     geruest-db                      │
//! │   (totals, lifecycle rules)       (SQLite, version checks)              │
//! │                                                                         │
//! │   Errors ──► CliError ──► stderr "[CODE] message" + exit status         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```bash
//! geruest calc lines.json --discount-percent 10 --exclude rental
//! geruest net 119,00 --vat 19
//! geruest doc new quote --customer <ID>
//! geruest doc add-line A-2026-0001 --template EINR --quantity 420
//! geruest doc show A-2026-0001
//! geruest -v doc status A-2026-0001 accepted
//! ```

mod commands;
mod config;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{calc, customer, document, template, Context};
use config::AppConfig;
use error::CliError;

/// Gerüst ERP: quotes, invoices and their totals
#[derive(Parser)]
#[command(name = "geruest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Database file (overrides GERUEST_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute totals for line items read from a JSON file
    Calc(calc::CalcArgs),

    /// Split a gross amount into net and VAT
    Net(calc::NetArgs),

    /// Create, edit and bill quotes and invoices
    #[command(name = "doc")]
    Document(document::DocumentArgs),

    /// Browse customers and their projects
    Customer(customer::CustomerArgs),

    /// Manage text and position templates
    Template(template::TemplateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = AppConfig::from_env().with_db_override(cli.db);
    tracing::debug!(db = %config.db_path.display(), "Configuration loaded");

    let ctx = Context::new(config, cli.json);

    let result = match cli.command {
        Commands::Calc(args) => calc::run(args, &ctx),
        Commands::Net(args) => calc::run_net(args, &ctx),
        Commands::Document(args) => document::run(args, &ctx).await,
        Commands::Customer(args) => customer::run(args, &ctx).await,
        Commands::Template(args) => template::run(args, &ctx).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, cli.json);
            ExitCode::from(err.code.exit_code())
        }
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info,geruest=debug,sqlx=warn",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{}", err);
    }
}

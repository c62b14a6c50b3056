//! checkrun CLI - Main Entry Point
//!
//! Runs the API or UI track and exits with 0 when every case passed,
//! 1 when any case failed and 2 when the run itself could not complete.

use clap::{Parser, Subcommand};

use checkrun_cli::commands::{cases, run};
use checkrun_cli::output::{self, OutputFormat};
use checkrun_cli::settings::ConfigArgs;
use checkrun_common::Track;

/// checkrun - data-driven API and browser test harness
#[derive(Parser)]
#[command(name = "checkrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API track against the configured base endpoint
    Api,

    /// Run the UI track through a WebDriver endpoint
    Ui,

    /// List built-in case sets or print one set's tuples
    Cases(cases::CasesArgs),
}

async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Api => {
            let config = cli.config.resolve()?;
            run::execute(Track::Api, &config, cli.format).await
        }
        Commands::Ui => {
            let config = cli.config.resolve()?;
            run::execute(Track::Ui, &config, cli.format).await
        }
        Commands::Cases(args) => {
            cases::execute(args, cli.format)?;
            Ok(run::EXIT_OK)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            run::EXIT_FATAL
        }
    };
    std::process::exit(code);
}

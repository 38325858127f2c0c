//! speedcams CLI
//!
//! Looks up today's León speed camera bulletin and prints or delivers the report.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use speedcams::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, RunOutcome, Scheduler},
    services::{ConsoleNotifier, HttpFetcher, Notifier, TelegramNotifier},
    utils::http,
};

/// speedcams - León speed camera bulletin
#[derive(Parser, Debug)]
#[command(
    name = "speedcams",
    version,
    about = "Daily León speed camera report with watched-street alerts"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the bulletin and report on one day
    Run {
        /// Day to report on (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print only, even if Telegram is configured
        #[arg(long)]
        no_notify: bool,

        /// Print the day report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run on the configured interval until Ctrl-C
    Watch,

    /// Extract rows from a saved bulletin page
    Parse {
        /// Saved bulletin HTML
        file: PathBuf,

        /// Day to report on (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging; RUST_LOG wins over the default filter.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = Config::load_or_default(&cli.config);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug",
        (Ok(config), false) => config.logging.level.as_str(),
        (Err(_), false) => "info",
    };
    init_logging(level);

    if loaded.is_ok() && !cli.config.exists() {
        log::warn!("No config at {}, using defaults", cli.config.display());
    }

    match execute(cli, loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", pipeline::error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli, loaded: Result<Config>) -> Result<()> {
    match cli.command {
        Command::Run {
            date,
            no_notify,
            json,
        } => {
            let config = usable_config(loaded)?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let fetcher = HttpFetcher::new(&config.source)?;
            let outcome = pipeline::run_once(&fetcher, &config, today).await?;

            print_outcome(&outcome, json)?;

            if config.telegram.is_enabled() && !no_notify {
                let notifier = telegram(&config)?;
                pipeline::deliver(&notifier, &config.telegram.chat_id, &outcome).await?;
                log::info!("Report delivered to Telegram");
            }
        }

        Command::Watch => {
            let config = usable_config(loaded)?;
            let fetcher = HttpFetcher::new(&config.source)?;
            let notifier: Box<dyn Notifier> = if config.telegram.is_enabled() {
                Box::new(telegram(&config)?)
            } else {
                log::warn!("Telegram not configured, reports go to stdout");
                Box::new(ConsoleNotifier)
            };
            let destination = if config.telegram.is_enabled() {
                config.telegram.chat_id.as_str()
            } else {
                "stdout"
            };

            Scheduler::new(&fetcher, notifier.as_ref(), destination, &config)
                .run()
                .await?;
        }

        Command::Parse { file, date } => {
            let config = usable_config(loaded)?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let markup = tokio::fs::read_to_string(&file).await?;
            let source = file.display().to_string();

            let outcome = pipeline::run_offline(&markup, &source, &config, today)?;
            log::info!("{} row(s) in {}", outcome.row_count, source);
            print_outcome(&outcome, false)?;
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());
            if !cli.config.exists() {
                return Err(AppError::config(format!(
                    "{} not found",
                    cli.config.display()
                )));
            }
            let config = loaded?;
            config.validate()?;
            log::info!(
                "✓ Config OK ({} watched street(s))",
                config.watch.streets.len()
            );
        }
    }

    Ok(())
}

fn usable_config(loaded: Result<Config>) -> Result<Config> {
    let config = loaded?;
    config.validate()?;
    Ok(config)
}

fn telegram(config: &Config) -> Result<TelegramNotifier> {
    let client = http::create_async_client(&config.source)?;
    Ok(TelegramNotifier::new(client, &config.telegram))
}

fn print_outcome(outcome: &RunOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print!("{}", outcome.text);
    }
    Ok(())
}

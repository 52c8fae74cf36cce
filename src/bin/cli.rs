//! jobwatch CLI
//!
//! Watches a tutoring marketplace jobs page and announces new listings.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use jobwatch::{
    driver::{HttpSession, PageDriver},
    error::Result,
    models::{Config, Credentials},
    notify::MultiNotifier,
    pipeline::Watcher,
};

/// jobwatch - tutoring marketplace job watcher
#[derive(Parser, Debug)]
#[command(
    name = "jobwatch",
    version,
    about = "Watches a tutoring marketplace for new job listings"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "jobwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch the listings page until interrupted
    Watch,

    /// Log in, run a single scrape cycle to smoke-test selectors, and exit
    Once,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;
    let config = Arc::new(config);

    match cli.command {
        Command::Watch => {
            let credentials = Credentials::from_env()?;
            let notifier = MultiNotifier::from_config(&config.notify)?;
            if notifier.is_empty() {
                log::warn!("no notification channels configured; new listings will only be logged");
            }

            let mut watcher = Watcher::new(Arc::clone(&config), credentials, notifier);
            let site = config.site.clone();
            let timeout_secs = config.watcher.timeout_secs;

            log::info!("watching {}", config.site.jobs_url);
            tokio::select! {
                result = watcher.run(move || HttpSession::new(&site, timeout_secs)) => result?,
                _ = tokio::signal::ctrl_c() => {
                    // Notifiers flush per write; nothing left to drain.
                    log::info!("interrupted; shutting down");
                }
            }
        }

        Command::Once => {
            let credentials = Credentials::from_env()?;
            let notifier = MultiNotifier::from_config(&config.notify)?;

            let mut session = HttpSession::new(&config.site, config.watcher.timeout_secs)?;
            let mut watcher = Watcher::new(Arc::clone(&config), credentials.clone(), notifier);

            session.login(&credentials).await?;
            log::info!("logged in; running one scrape cycle");

            let announced = watcher.poll_cycle(&mut session).await?;
            log::info!(
                "cycle complete; {} new listing(s) (the first cycle only establishes the baseline)",
                announced.len()
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            log::info!("✓ Config OK (site, watcher, notify sections)");
            log::info!("  policy: {:?}", config.watcher.policy);
            log::info!("  poll interval: {}s", config.watcher.poll_interval_secs);
            match config.watcher.max_age_minutes {
                Some(minutes) => log::info!("  age threshold: {minutes}m"),
                None => log::info!("  age threshold: none"),
            }
            if Credentials::from_env().is_err() {
                log::warn!("JOBWATCH_USERNAME / JOBWATCH_PASSWORD are not set");
            }
        }
    }

    Ok(())
}

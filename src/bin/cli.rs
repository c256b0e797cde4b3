//! Course Dashboard CLI
//!
//! Local execution entry point: serve the HTTP surface or run one-shot jobs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use course_dashboard::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    server,
    storage::LocalStorage,
    utils::http::{PortalClient, SessionCookie},
};

/// Course Dashboard - student portal scraper
#[derive(Parser, Debug)]
#[command(
    name = "course-dashboard",
    version,
    about = "Scrapes a student portal into a course/grade dashboard"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session cookie (overrides PORTAL_COOKIE and the config file)
    #[arg(long)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Bind address (default: server.bind from config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the parsed course listing as JSON
    Courses,

    /// Sync every course and write the dashboard
    Generate,

    /// Validate configuration and template
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

    let mut config = Config::load_or_default(&cli.config);
    log::info!("Loaded configuration from {}", cli.config.display());

    let cookie = SessionCookie::new(cli.cookie.clone().or_else(|| config.initial_cookie()));
    if cookie.get().is_none() {
        log::warn!("No session cookie set; portal pages will likely require login");
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate()?;
            server::serve(config, cookie).await?;
        }

        Command::Courses => {
            let client = PortalClient::new(&config.http)?;
            let listing = pipeline::fetch_listing(&config, &client, &cookie).await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }

        Command::Generate => {
            let client = PortalClient::new(&config.http)?;
            let storage = LocalStorage::from_config(&config.paths);
            let report = pipeline::run_generation(&config, &client, &storage, &cookie).await?;
            log::info!(
                "Dashboard written to {} ({} courses)",
                config.paths.index_html.display(),
                report.courses_count
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let template = config.paths.template_path();
            if !template.exists() {
                log::error!("Template not found at {}", template.display());
                return Err(AppError::template(format!(
                    "not found at {}",
                    template.display()
                )));
            }
            log::info!("✓ Template found at {}", template.display());

            log::info!("All validations passed!");
        }
    }

    Ok(())
}

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use cellguard_config::{CellGuardConfig, ConfigLoader};
use cellguard_core::{CellGuardError, ClockSource};

mod auth;
pub mod simulate;

/// cellguard — two-factor manual override with presence watchdog
#[derive(Parser)]
#[command(name = "cellguard", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to cellguard.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the two-factor handshake for an identity
    Auth {
        /// Badge identifier
        identity: String,
        /// Transcribed voice phrase used as the secondary factor
        #[arg(short, long, conflicts_with = "confirmed")]
        phrase: Option<String>,
        /// Treat the secondary factor as already confirmed
        #[arg(long)]
        confirmed: bool,
        /// Output the resulting snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scripted audit: badge in, pulse presence, walk away, watch the watchdog trip
    Simulate {
        /// Badge identifier to authenticate with
        #[arg(long, default_value = "ARCH-001")]
        identity: String,
        /// Voice phrase to authenticate with
        #[arg(long, default_value = "admin override")]
        phrase: String,
        /// Multiplier applied to the real-time pauses (0 runs without pausing)
        #[arg(long, default_value = "1.0")]
        pace: f64,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Audit configuration for issues
    Doctor,
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub async fn run(self) -> cellguard_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(config.logging.level.as_str())
        };
        init_tracing(&config.logging.format, log_level);

        // A missing clock is fatal before any command runs.
        let clock = ClockSource::open(&config.clock.source)?;

        match self.command {
            Commands::Auth {
                identity,
                phrase,
                confirmed,
                json,
            } => auth::cmd_auth(&config, clock.as_ref(), &identity, phrase, confirmed, json),
            Commands::Simulate {
                identity,
                phrase,
                pace,
            } => simulate::cmd_simulate(&config, &identity, &phrase, pace)
                .await
                .map(|_| ()),
            Commands::Config { json } => Self::cmd_config(&config, json),
            Commands::Doctor => Self::cmd_doctor(&config),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_config(config: &CellGuardConfig, json: bool) -> cellguard_core::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| CellGuardError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_doctor(config: &CellGuardConfig) -> cellguard_core::Result<()> {
        // Loading already rejected hard errors; anything left is advisory.
        let warnings = config.validate().map_err(CellGuardError::Config)?;
        if warnings.is_empty() {
            println!("✅ No issues found");
        } else {
            for w in &warnings {
                println!("{w}");
            }
        }
        println!(
            "   {} identities registered, watchdog {:.1}s",
            config.registry.len(),
            config.watchdog.timeout_secs
        );
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> cellguard_core::Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "cellguard", &mut std::io::stdout());
        Ok(())
    }
}

fn init_tracing(format: &str, log_level: &str) {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level))
    };
    match format {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .json()
            .with_target(true)
            .init(),
        "compact" => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .compact()
            .with_target(false)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .init(),
    }
}

mod cli;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use creditwatch::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "cw", about = "Exaroton credit spending tracker", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show credit spending windows and the recent daily breakdown
    History,
    /// Take a manual snapshot of the current balance
    Record,
    /// Remove old snapshots
    Prune {
        /// Keep this many days (default: store.retention_days)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Run the HTTP API and the scheduled recorder
    Serve {
        /// Listen address (default: server.bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "creditwatch=debug,cw=debug"
    } else {
        "creditwatch=warn,cw=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Init => cli::config_cmd::init(),
            ConfigAction::Check => cli::config_cmd::check(),
        };
    }

    let config = AppConfig::load().with_context(|| {
        format!(
            "Failed to load config from {}",
            AppConfig::config_path().display()
        )
    })?;

    let output_opts = cli::output::OutputOptions {
        format: cli::output::OutputFormat::resolve(
            cli.json,
            cli.format.as_deref(),
            &config.settings,
        ),
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color, &config.settings.color),
    };

    match cli.command {
        None | Some(Commands::History) => cli::history_cmd::run(&config, &output_opts).await?,
        Some(Commands::Record) => cli::record_cmd::run(&config, &output_opts).await?,
        Some(Commands::Prune { days }) => cli::prune_cmd::run(&config, days).await?,
        Some(Commands::Serve { bind }) => cli::serve_cmd::run(&config, bind).await?,
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}

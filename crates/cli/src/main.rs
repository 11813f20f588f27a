mod skill_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "jovhub", about = "jovhub: skill document tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (toml, yaml or json).
    #[arg(long, global = true, env = "JOVHUB_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parsed header and resolved metadata of a skill.
    Inspect {
        /// Path to a SKILL.md file or the directory containing it.
        path: PathBuf,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the embedding text for a skill package directory.
    EmbedText {
        /// Skill package directory.
        dir: PathBuf,
        /// Character budget (overrides config value).
        #[arg(long)]
        max_chars: Option<usize>,
    },
    /// Print per-file hashes and the file-set digest of a skill package.
    Hash {
        /// Skill package directory.
        dir: PathBuf,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check whether a skill's requirements are met on this host.
    Check {
        /// Path to a SKILL.md file or the directory containing it.
        path: PathBuf,
        /// OS identifier to check against instead of the current one.
        #[arg(long)]
        os: Option<String>,
    },
}

/// Initialise tracing. Logs go to stderr so command output stays clean.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "jovhub starting");
    let config = jovhub_config::load_or_default(cli.config.as_deref());

    match cli.command {
        Commands::Inspect { path, json } => skill_commands::inspect(&path, json),
        Commands::EmbedText { dir, max_chars } => {
            skill_commands::embed_text(&dir, max_chars, &config)
        },
        Commands::Hash { dir, json } => skill_commands::hash(&dir, json),
        Commands::Check { path, os } => skill_commands::check(&path, os.as_deref()),
    }
}

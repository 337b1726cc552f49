mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::ProjectOverrides;

#[derive(Parser)]
#[command(name = "prerender-kit")]
#[command(version, about = "Per-route metadata prerendering for single-page app builds", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create prerender.toml and a sample metadata table
    Init {
        /// Project directory
        path: PathBuf,
    },

    /// Check template, metadata table and preview images without writing
    Validate {
        /// Project directory containing prerender.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        overrides: ProjectOverrides,
    },

    /// Write one static HTML file per route into the build directory
    Prerender {
        /// Project directory containing prerender.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        overrides: ProjectOverrides,

        /// Render every route but write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `RUST_LOG`, when set, wins outright; otherwise WARN, or DEBUG with `--verbose`
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ if verbose => EnvFilter::new("debug"),
        _ => EnvFilter::new("warn"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Validate { path, overrides } => commands::validate::run(path, overrides).await,
        Command::Prerender {
            path,
            overrides,
            dry_run,
        } => commands::prerender::run(path, overrides, dry_run).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "prerender-kit", &mut io::stdout());
            Ok(())
        }
    }
}

//! # TokenForge Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `tokenforge` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`render`, `render-dir`, `getopt`) is a variant in
//!   the `Commands` enum, mapped to a handler in `commands`
//! - `--config` and `-v` are global and may appear anywhere on the line
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! tokenforge --help
//!
//! # Render with debug logging and an explicit configuration file
//! tokenforge -vv --config ./forge.toml render page.tmpl -o page.html
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (render, render-dir, getopt)
mod common; // Shared utilities (fs)
mod core; // Core infrastructure (errors, config, templating)

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "tokenforge",
    about = "TokenForge: token replacement and getopt-style option parsing",
    long_about = "Render templates containing {name} and {name(arg,...)} tokens, whole\n\
                  template directories, and normalise shell command lines like getopt(1).",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Read configuration from this file only.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// All available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Render a single template from a file or stdin.
    #[command(alias = "r")]
    Render(commands::render::RenderArgs),
    /// Render a directory tree of templates.
    #[command(alias = "d")]
    RenderDir(commands::render_dir::RenderDirArgs),
    /// Parse and normalise command-line options for shell scripts.
    Getopt(commands::getopt::GetoptArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Render(args) => commands::render::handle_render(args, config_path),
        Commands::RenderDir(args) => commands::render_dir::handle_render_dir(args, config_path),
        Commands::Getopt(args) => match commands::getopt::handle_getopt(args) {
            Ok(0) => Ok(()),
            Ok(errors) => {
                tracing::debug!("getopt reported {} error(s)", errors);
                std::process::exit(1);
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

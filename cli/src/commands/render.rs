//! # TokenForge Render Command
//!
//! File: cli/src/commands/render.rs
//!
//! ## Overview
//!
//! Implements `tokenforge render`: read one template, substitute its tokens and
//! write the result.
//!
//! ## Architecture
//!
//! 1. Load the configuration and build a configured replacer from it.
//! 2. Apply command-line overrides (`--tolerant`, `--cache`, `--builtins`).
//! 3. Register tokens: configuration first, then `--positional` values
//!    (`{0}`, `{1}`, ...), then `--set` pairs, so later sources win.
//! 4. Render the input (a file, or stdin for `-`/no argument) and write it to
//!    `--output` or stdout.
//!
//! ## Examples
//!
//! ```bash
//! echo 'Hello {name}!' | tokenforge render --set name=World
//! tokenforge render greeting.txt -p Alice -p Bob -o out.txt
//! tokenforge render --builtins --tolerant report.tmpl
//! ```
//!
use super::parse_key_val;
use crate::common::fs::io;
use crate::core::config;
use crate::core::error::{ForgeError, Result};
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokenforge::replace::Replacer;
use tracing::{debug, info};

/// Arguments for `tokenforge render`.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Template file to render. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Write the result to this file instead of stdout.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Registers a token: `--set name=value`. Can be specified multiple times.
    #[arg(long = "set", short = 's', value_parser = parse_key_val, action = clap::ArgAction::Append)]
    set: Vec<(String, String)>,

    /// Registers positional tokens `{0}`, `{1}`, ... in the order given.
    #[arg(long = "positional", short = 'p', action = clap::ArgAction::Append)]
    positional: Vec<String>,

    /// Leave unknown tokens in the output instead of failing.
    #[arg(long)]
    tolerant: bool,

    /// Evaluate each distinct token at most once.
    #[arg(long)]
    cache: bool,

    /// Enable the built-in `counter`, `now` and `env` generators.
    #[arg(long)]
    builtins: bool,
}

/// Builds the replacer for a render: configuration, then flags, then tokens.
///
/// `--builtins` goes through the configuration so `[tokens]` entries named
/// `counter`, `now` or `env` still override the built-ins.
fn prepare_replacer(args: &RenderArgs, cfg: &config::Config) -> Result<Replacer> {
    let mut cfg = cfg.clone();
    if args.builtins {
        cfg.engine.builtins = Some(true);
    }
    let mut replacer = cfg.build_replacer()?;
    if args.tolerant {
        replacer.tolerant();
    }
    if args.cache {
        replacer.enable_value_caching();
    }

    replacer.register_all(args.positional.iter().cloned());
    for (name, value) in &args.set {
        replacer
            .register(name.as_str(), value.as_str())
            .map_err(ForgeError::from)
            .with_context(|| format!("Invalid token '{}'", name))?;
    }
    Ok(replacer)
}

/// Handles `tokenforge render`.
pub fn handle_render(args: RenderArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling render command...");
    let cfg = config::load_config(config_path).context("Failed to load TokenForge configuration")?;
    let mut replacer = prepare_replacer(&args, &cfg)?;

    let source = args
        .input
        .as_deref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    let text = io::read_input(args.input.as_deref())?;
    debug!("Read {} bytes from {}", text.len(), source);

    let rendered = replacer
        .execute(&text)
        .map_err(ForgeError::from)
        .with_context(|| format!("Failed to render '{}'", source))?;

    io::write_output(args.output.as_deref(), &rendered)?;
    if let Some(output) = &args.output {
        info!("Rendered '{}' to '{}'", source, output.display());
    }
    Ok(())
}

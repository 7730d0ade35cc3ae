//! # TokenForge Render-Dir Command
//!
//! File: cli/src/commands/render_dir.rs
//!
//! ## Overview
//!
//! Implements `tokenforge render-dir`, which renders a whole template tree into
//! a target directory. Files whose names end in a configured template
//! extension are rendered and lose that extension; all other files are copied.
//!
//! ## Architecture
//!
//! 1. Load the configuration and build the replacer; register `--set` pairs.
//! 2. Resolve SOURCE: an existing path is used as is, otherwise it names a
//!    template tree inside the configured templates directory.
//! 3. Hand off to `core::templating::render_template_directory`.
//!
//! ## Examples
//!
//! ```bash
//! # Render ./skeleton into ./out
//! tokenforge render-dir ./skeleton ./out --set project=demo
//!
//! # Render the "rust-lib" tree from ~/.config/tokenforge/templates
//! tokenforge render-dir rust-lib ./my-lib --set name=my-lib --force
//! ```
//!
use super::parse_key_val;
use crate::core::config;
use crate::core::error::{ForgeError, Result};
use crate::core::templating;
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments for `tokenforge render-dir`.
#[derive(Parser, Debug)]
pub struct RenderDirArgs {
    /// Template directory, or the name of a template tree in the configured
    /// templates directory.
    source: String,

    /// Directory to write the rendered tree into.
    target: PathBuf,

    /// Overwrite files that already exist in the target.
    #[arg(long, short = 'f')]
    force: bool,

    /// Registers a token: `--set name=value`. Can be specified multiple times.
    #[arg(long = "set", short = 's', value_parser = parse_key_val, action = clap::ArgAction::Append)]
    set: Vec<(String, String)>,
}

/// Resolves SOURCE against the filesystem, then the templates directory.
fn resolve_source(source: &str, templates_dir: &Path) -> Result<PathBuf> {
    let direct = PathBuf::from(source);
    if direct.exists() {
        debug!("Using template source path '{}'", direct.display());
        return Ok(direct);
    }
    let named = templates_dir.join(source);
    if named.is_dir() {
        debug!("Resolved template '{}' to '{}'", source, named.display());
        return Ok(named);
    }
    Err(anyhow!(ForgeError::FileSystem(format!(
        "Template '{}' not found (also looked in '{}').",
        source,
        templates_dir.display()
    ))))
}

/// Handles `tokenforge render-dir`.
pub fn handle_render_dir(args: RenderDirArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling render-dir command...");
    let cfg = config::load_config(config_path).context("Failed to load TokenForge configuration")?;

    let source = resolve_source(&args.source, Path::new(&cfg.templates.directory))?;
    let mut replacer = cfg.build_replacer()?;
    for (name, value) in &args.set {
        replacer
            .register(name.as_str(), value.as_str())
            .map_err(ForgeError::from)
            .with_context(|| format!("Invalid token '{}'", name))?;
    }

    let extensions: Vec<&str> = cfg.templates.extensions.iter().map(String::as_str).collect();
    let summary = templating::render_template_directory(
        &source,
        &args.target,
        &mut replacer,
        &extensions,
        args.force,
    )
    .context("Template directory rendering failed")?;

    println!(
        "Rendered {} template(s) and copied {} file(s) into '{}'.",
        summary.rendered,
        summary.copied,
        args.target.display()
    );
    Ok(())
}

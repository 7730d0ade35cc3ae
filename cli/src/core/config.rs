//! # TokenForge Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges and validates the TOML configuration that shapes the
//! replacement engine: delimiters, strict/tolerant mode, caching, built-in
//! generators, static tokens and the template directory used by `render-dir`.
//!
//! ## Architecture
//!
//! Configuration sources:
//! 1. `--config PATH`, when given, is the only source.
//! 2. Otherwise the project-specific `.tokenforge.toml` in the current directory
//!    or its ancestors (the search stops at a `.git` directory) overrides
//! 3. the user-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/tokenforge/config.toml`), which overrides
//! 4. the defaults defined in this module.
//!
//! Token tables are merged entry by entry; for every other setting the more
//! specific source wins.
//!
//! ## Examples
//!
//! ```toml
//! [engine]
//! token_start = "["
//! token_end = "]"
//! tolerant = true
//! builtins = true
//!
//! [tokens]
//! author = "Jane Doe"
//!
//! [templates]
//! directory = "~/templates"
//! extensions = [".tmpl"]
//! ```
//!
//! ```rust
//! let cfg = config::load_config(None)?;
//! let mut replacer = cfg.build_replacer()?;
//! let text = replacer.execute("{author}")?;
//! ```
//!
use crate::core::error::{ForgeError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokenforge::replace::{
    register_builtins, Replacer, ARGS_END, ARGS_SEPARATOR, ARGS_START, TOKEN_END, TOKEN_START,
};
use tracing::{debug, info, warn};

/// Main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Static tokens registered before rendering.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// Replacement engine settings. Unset fields keep the engine defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub token_start: Option<String>,
    pub token_end: Option<String>,
    pub argument_start: Option<String>,
    pub argument_end: Option<String>,
    pub argument_separator: Option<String>,
    pub tolerant: Option<bool>,
    pub caching: Option<bool>,
    /// Registers the `counter`, `now` and `env` generators.
    pub builtins: Option<bool>,
}

/// Settings for `tokenforge render-dir`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Directory holding named template trees (can use ~). Will be expanded.
    #[serde(default = "default_template_dir")]
    pub directory: String,
    /// File name suffixes that mark a file for rendering.
    #[serde(default = "default_template_extensions")]
    pub extensions: Vec<String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            directory: default_template_dir(),
            extensions: default_template_extensions(),
        }
    }
}

fn default_template_dir() -> String {
    "~/.config/tokenforge/templates".to_string()
}

fn default_template_extensions() -> Vec<String> {
    vec![".template".to_string(), ".tmpl".to_string()]
}

impl EngineConfig {
    /// Each delimiter key with its configured value and the engine default.
    fn delimiters(&self) -> [(&'static str, Option<&str>, char); 5] {
        [
            ("token_start", self.token_start.as_deref(), TOKEN_START),
            ("token_end", self.token_end.as_deref(), TOKEN_END),
            ("argument_start", self.argument_start.as_deref(), ARGS_START),
            ("argument_end", self.argument_end.as_deref(), ARGS_END),
            (
                "argument_separator",
                self.argument_separator.as_deref(),
                ARGS_SEPARATOR,
            ),
        ]
    }

    /// Applies these settings to `replacer`.
    pub fn apply(&self, replacer: &mut Replacer) -> Result<()> {
        if let Some(start) = &self.token_start {
            replacer.token_start(start).map_err(ForgeError::from)?;
        }
        if let Some(end) = &self.token_end {
            replacer.token_end(end).map_err(ForgeError::from)?;
        }
        if let Some(start) = &self.argument_start {
            replacer.argument_start(start).map_err(ForgeError::from)?;
        }
        if let Some(end) = &self.argument_end {
            replacer.argument_end(end).map_err(ForgeError::from)?;
        }
        if let Some(separator) = &self.argument_separator {
            replacer
                .argument_separator(separator)
                .map_err(ForgeError::from)?;
        }
        match self.tolerant {
            Some(true) => replacer.tolerant(),
            _ => replacer.strict(),
        };
        match self.caching {
            Some(true) => replacer.enable_value_caching(),
            _ => replacer.disable_value_caching(),
        };
        if self.builtins.unwrap_or(false) {
            register_builtins(replacer).map_err(ForgeError::from)?;
        }
        Ok(())
    }

    fn merge(user: Self, project: Self) -> Self {
        Self {
            token_start: project.token_start.or(user.token_start),
            token_end: project.token_end.or(user.token_end),
            argument_start: project.argument_start.or(user.argument_start),
            argument_end: project.argument_end.or(user.argument_end),
            argument_separator: project.argument_separator.or(user.argument_separator),
            tolerant: project.tolerant.or(user.tolerant),
            caching: project.caching.or(user.caching),
            builtins: project.builtins.or(user.builtins),
        }
    }
}

impl Config {
    /// A replacer configured from the `[engine]` table with the `[tokens]` registered.
    pub fn build_replacer(&self) -> Result<Replacer> {
        let mut replacer = Replacer::new();
        self.engine.apply(&mut replacer)?;
        for (name, value) in &self.tokens {
            replacer
                .register(name.as_str(), value.as_str())
                .map_err(ForgeError::from)
                .with_context(|| format!("Invalid token '{}' in configuration", name))?;
        }
        debug!(
            "Built replacer with {} configured token(s)",
            self.tokens.len()
        );
        Ok(replacer)
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".tokenforge.toml";

/// Loads the effective configuration.
///
/// With `explicit` set, only that file is read and it must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "TokenForge", "tokenforge") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.tokenforge.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Searches `start` and its ancestors for `.tokenforge.toml`, stopping at a
/// directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };

    let mut tokens = user.tokens;
    tokens.extend(project_cfg.tokens);

    let templates = TemplatesConfig {
        directory: if project_cfg.templates.directory != default_template_dir() {
            project_cfg.templates.directory
        } else {
            user.templates.directory
        },
        extensions: if project_cfg.templates.extensions != default_template_extensions() {
            project_cfg.templates.extensions
        } else {
            user.templates.extensions
        },
    };

    Config {
        engine: EngineConfig::merge(user.engine, project_cfg.engine),
        tokens,
        templates,
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.templates.directory = shellexpand::tilde(&config.templates.directory).into_owned();
    debug!(
        "Expanded template directory: {}",
        config.templates.directory
    );
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");

    let mut seen: Vec<(&str, char)> = Vec::new();
    for (key, value, default) in config.engine.delimiters() {
        let c = match value.map(|v| (v, v.chars().collect::<Vec<_>>())) {
            None => default,
            Some((_, chars)) if chars.len() == 1 => chars[0],
            Some((value, _)) => {
                return Err(anyhow!(ForgeError::Config(format!(
                    "engine.{} must be exactly one character, got '{}'.",
                    key, value
                ))))
            }
        };
        if let Some((other, _)) = seen.iter().find(|(_, prev)| *prev == c) {
            return Err(anyhow!(ForgeError::Config(format!(
                "engine.{} and engine.{} both use '{}'.",
                other, key, c
            ))));
        }
        seen.push((key, c));
    }

    for name in config.tokens.keys() {
        if name.is_empty() {
            return Err(anyhow!(ForgeError::Config(
                "Token names in [tokens] must not be empty.".to_string()
            )));
        }
    }

    if let Some(ext) = config.templates.extensions.iter().find(|e| e.is_empty()) {
        return Err(anyhow!(ForgeError::Config(format!(
            "Template extensions must not be empty (got '{}').",
            ext
        ))));
    }

    let template_dir = PathBuf::from(&config.templates.directory);
    if !template_dir.exists() {
        debug!(
            "Configured template directory '{}' does not exist.",
            template_dir.display()
        );
    } else if !template_dir.is_dir() {
        return Err(anyhow!(ForgeError::Config(format!(
            "Configured template path '{}' exists but is not a directory.",
            template_dir.display()
        ))));
    }
    debug!("Configuration validation successful.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [engine]
            token_start = "["
            token_end = "]"
            tolerant = true

            [tokens]
            author = "Jane"
            year = "2024"

            [templates]
            directory = "~/my_templates"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.engine.token_start.as_deref(), Some("["));
        assert_eq!(config.engine.token_end.as_deref(), Some("]"));
        assert_eq!(config.engine.tolerant, Some(true));
        assert_eq!(config.engine.caching, None);
        assert_eq!(config.tokens["author"], "Jane");
        assert_eq!(config.tokens.len(), 2);
        assert_eq!(config.templates.directory, "~/my_templates"); // Not yet expanded
        assert_eq!(config.templates.extensions, default_template_extensions());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[engine]\ncolour = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            templates: TemplatesConfig {
                directory: "~/tpl_test".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        expand_config_paths(&mut config).unwrap();

        let home_dir = directories::BaseDirs::new().unwrap().home_dir().to_path_buf();
        assert_eq!(
            config.templates.directory,
            home_dir.join("tpl_test").to_string_lossy()
        );
    }

    #[test]
    fn test_merge_prefers_project_values() {
        let user = Config {
            engine: EngineConfig {
                token_start: Some("[".into()),
                tolerant: Some(true),
                ..Default::default()
            },
            tokens: BTreeMap::from([
                ("a".to_string(), "user-a".to_string()),
                ("b".to_string(), "user-b".to_string()),
            ]),
            templates: TemplatesConfig {
                directory: "/user/templates".into(),
                ..Default::default()
            },
        };
        let project = Config {
            engine: EngineConfig {
                tolerant: Some(false),
                caching: Some(true),
                ..Default::default()
            },
            tokens: BTreeMap::from([("b".to_string(), "project-b".to_string())]),
            ..Default::default()
        };

        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.engine.token_start.as_deref(), Some("["));
        assert_eq!(merged.engine.tolerant, Some(false));
        assert_eq!(merged.engine.caching, Some(true));
        assert_eq!(merged.tokens["a"], "user-a");
        assert_eq!(merged.tokens["b"], "project-b");
        assert_eq!(merged.templates.directory, "/user/templates");
    }

    #[test]
    fn test_find_project_config_stops_at_git() -> Result<()> {
        let root = tempdir()?;
        let repo = root.path().join("repo");
        let nested = repo.join("a/b");
        fs::create_dir_all(&nested)?;
        fs::create_dir(repo.join(".git"))?;
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "")?;

        assert_eq!(find_project_config_path(&nested), None);

        fs::write(repo.join("a").join(PROJECT_CONFIG_FILENAME), "")?;
        assert_eq!(
            find_project_config_path(&nested),
            Some(repo.join("a").join(PROJECT_CONFIG_FILENAME))
        );
        Ok(())
    }

    #[test]
    fn test_load_explicit_config() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("forge.toml");
        fs::write(&path, "[tokens]\nname = \"World\"\n")?;

        let config = load_config(Some(path.as_path()))?;
        let mut replacer = config.build_replacer()?;
        assert_eq!(replacer.execute("Hello {name}")?, "Hello World");
        Ok(())
    }

    #[test]
    fn test_load_explicit_config_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(dir.path().join("missing.toml").as_path()));
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to read configuration file"));
    }

    #[test]
    fn test_build_replacer_applies_engine() -> Result<()> {
        let config = Config {
            engine: EngineConfig {
                token_start: Some("<".into()),
                token_end: Some(">".into()),
                tolerant: Some(true),
                builtins: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut replacer = config.build_replacer()?;
        assert!(replacer.is_tolerant());
        assert!(!replacer.is_caching());
        assert_eq!(replacer.execute("<counter> <missing> {x}")?, "1 <missing> {x}");
        Ok(())
    }

    #[test]
    fn test_validate_config_valid() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("tpl")).unwrap();

        let config = Config {
            engine: EngineConfig {
                token_start: Some("[".into()),
                token_end: Some("]".into()),
                ..Default::default()
            },
            templates: TemplatesConfig {
                directory: temp_dir.path().join("tpl").to_string_lossy().to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_delimiter_length() {
        let config = Config {
            engine: EngineConfig {
                token_start: Some("{{".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be exactly one character"));
    }

    #[test]
    fn test_validate_config_duplicate_delimiters() {
        let config = Config {
            engine: EngineConfig {
                token_start: Some("|".into()),
                token_end: Some("|".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("engine.token_start and engine.token_end"));
    }

    #[test]
    fn test_validate_config_collision_with_default() {
        let config = Config {
            engine: EngineConfig {
                token_end: Some("(".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("engine.token_end and engine.argument_start"));
    }

    #[test]
    fn test_validate_config_template_path_is_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("not_a_dir");
        fs::write(&file_path, "").unwrap();

        let config = Config {
            templates: TemplatesConfig {
                directory: file_path.to_string_lossy().to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("is not a directory"));
    }
}

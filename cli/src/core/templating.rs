//! # TokenForge Template Directory Rendering
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Renders a whole directory tree of templates with a configured [`Replacer`].
//! Used by `tokenforge render-dir` to stamp out files from a template tree.
//!
//! ## Architecture
//!
//! 1. Recursively walk the source directory.
//! 2. For each file:
//!    - If its name ends with a template extension (case-insensitive), run its
//!      content through the replacer and write it without that extension.
//!    - Otherwise copy it unchanged.
//! 3. Mirror the directory structure in the target.
//!
//! Hidden files and directories (starting with `.`) are skipped. Existing
//! target files are only overwritten when `force` is set; the check happens
//! before anything is written so a refused run leaves the target untouched.
//!
//! ## Examples
//!
//! ```rust
//! let mut replacer = config.build_replacer()?;
//! replacer.register("project_name", "my-awesome-app")?;
//!
//! let summary = templating::render_template_directory(
//!     &source_path,
//!     &target_path,
//!     &mut replacer,
//!     &[".template", ".tmpl"],
//!     false,
//! )?;
//! println!("{} rendered, {} copied", summary.rendered, summary.copied);
//! ```
//!
use crate::core::error::{ForgeError, Result};
use anyhow::{anyhow, Context};
use std::fs;
use std::path::{Path, PathBuf};
use tokenforge::replace::Replacer;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What a directory render produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub copied: usize,
}

/// One file to produce in the target tree.
enum Job {
    Render { source: PathBuf, target: PathBuf },
    Copy { source: PathBuf, target: PathBuf },
}

impl Job {
    fn target(&self) -> &Path {
        match self {
            Job::Render { target, .. } | Job::Copy { target, .. } => target,
        }
    }
}

/// Returns the matching template extension of `file_name`, if any.
fn template_extension<'a>(file_name: &str, extensions: &'a [&str]) -> Option<&'a str> {
    let lower = file_name.to_lowercase();
    extensions
        .iter()
        .copied()
        .find(|ext| {
            file_name.len() > ext.len()
                && file_name.is_char_boundary(file_name.len() - ext.len())
                && lower.ends_with(&ext.to_lowercase())
        })
}

/// Walks `source_dir` and collects the directories to create and files to produce.
fn plan(
    source_dir: &Path,
    target_dir: &Path,
    template_extensions: &[&str],
) -> (Vec<PathBuf>, Vec<Job>) {
    let mut dirs = Vec::new();
    let mut jobs = Vec::new();

    for entry_result in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    "Failed to access entry during walk in '{}': {}",
                    source_dir.display(),
                    e
                );
                continue;
            }
        };
        let src_path = entry.path();
        let Ok(relative_path) = src_path.strip_prefix(source_dir) else {
            warn!(
                "Could not determine relative path for '{}' based on '{}'",
                src_path.display(),
                source_dir.display()
            );
            continue;
        };
        if relative_path.as_os_str().is_empty() {
            continue;
        }
        if relative_path
            .components()
            .any(|comp| comp.as_os_str().to_string_lossy().starts_with('.'))
        {
            debug!("Skipping hidden path: {}", src_path.display());
            continue;
        }
        let target_path = target_dir.join(relative_path);

        if src_path.is_dir() {
            dirs.push(target_path);
        } else if src_path.is_file() {
            let Some(file_name) = src_path.file_name().map(|n| n.to_string_lossy()) else {
                warn!("Skipping file without a name: {}", src_path.display());
                continue;
            };
            match template_extension(&file_name, template_extensions) {
                Some(ext) => {
                    let stripped = &file_name[..file_name.len() - ext.len()];
                    jobs.push(Job::Render {
                        source: src_path.to_path_buf(),
                        target: target_path.with_file_name(stripped),
                    });
                }
                None => jobs.push(Job::Copy {
                    source: src_path.to_path_buf(),
                    target: target_path,
                }),
            }
        } else {
            warn!(
                "Skipping unsupported file system entry type at '{}'",
                src_path.display()
            );
        }
    }
    (dirs, jobs)
}

/// Renders every template below `source_dir` into `target_dir`.
///
/// # Errors
///
/// - `source_dir` is not a directory.
/// - A target file exists and `force` is false (nothing is written).
/// - A template fails to render; the replacer error is wrapped in
///   [`ForgeError::Template`] with the offending file as context.
pub fn render_template_directory(
    source_dir: &Path,
    target_dir: &Path,
    replacer: &mut Replacer,
    template_extensions: &[&str],
    force: bool,
) -> Result<RenderSummary> {
    info!(
        "Starting template processing from '{}' to '{}'",
        source_dir.display(),
        target_dir.display()
    );
    if !source_dir.is_dir() {
        return Err(anyhow!(ForgeError::FileSystem(format!(
            "Template source '{}' is not a directory.",
            source_dir.display()
        ))));
    }

    let (dirs, jobs) = plan(source_dir, target_dir, template_extensions);

    if !force {
        if let Some(existing) = jobs.iter().map(Job::target).find(|t| t.exists()) {
            return Err(anyhow!(ForgeError::FileSystem(format!(
                "Target file '{}' already exists. Use --force to overwrite.",
                existing.display()
            ))));
        }
    }

    fs::create_dir_all(target_dir).with_context(|| {
        format!(
            "Failed to create target directory '{}'",
            target_dir.display()
        )
    })?;
    for dir in &dirs {
        fs::create_dir_all(dir).with_context(|| {
            format!("Failed to create target subdirectory '{}'", dir.display())
        })?;
        debug!("Created directory: {}", dir.display());
    }

    let mut summary = RenderSummary::default();
    for job in jobs {
        match job {
            Job::Render { source, target } => {
                debug!("Rendering template file: {}", source.display());
                let template_content = fs::read_to_string(&source).with_context(|| {
                    format!("Failed to read template file '{}'", source.display())
                })?;
                let rendered_content = replacer
                    .execute(&template_content)
                    .map_err(|e| {
                        anyhow!(ForgeError::Template { source: e }).context(format!(
                            "Rendering failed for template file '{}'",
                            source.display()
                        ))
                    })?;
                fs::write(&target, rendered_content).with_context(|| {
                    format!("Failed to write rendered file '{}'", target.display())
                })?;
                info!(
                    "Rendered template '{}' to '{}'",
                    source.display(),
                    target.display()
                );
                summary.rendered += 1;
            }
            Job::Copy { source, target } => {
                fs::copy(&source, &target).with_context(|| {
                    format!(
                        "Failed to copy file '{}' to '{}'",
                        source.display(),
                        target.display()
                    )
                })?;
                debug!("Copied file '{}' to '{}'", source.display(), target.display());
                summary.copied += 1;
            }
        }
    }
    info!(
        "Template processing completed: {} rendered, {} copied.",
        summary.rendered, summary.copied
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn replacer() -> Replacer {
        let mut replacer = Replacer::new();
        replacer
            .register("project_name", "MyAwesomeApp")
            .unwrap()
            .register("version", "0.1.0")
            .unwrap();
        replacer
    }

    #[test]
    fn test_render_and_copy() -> Result<()> {
        let source = tempdir()?;
        let target = tempdir()?;

        create_file(
            &source.path().join("README.md.template"),
            "# {project_name}\nVersion: {version}",
        );
        create_file(&source.path().join("src/main.rs"), "fn main() {}");
        create_file(&source.path().join("config/settings.toml"), "# Basic");
        create_file(&source.path().join(".gitignore"), "target/\n*.log");
        create_file(&source.path().join(".hidden_dir/secret.txt"), "secret");

        let summary = render_template_directory(
            source.path(),
            target.path(),
            &mut replacer(),
            &[".template", ".tmpl"],
            false,
        )?;
        assert_eq!(summary, RenderSummary { rendered: 1, copied: 2 });

        let readme_content = fs::read_to_string(target.path().join("README.md"))?;
        assert_eq!(readme_content, "# MyAwesomeApp\nVersion: 0.1.0");
        // Copied files are not rendered, so braces survive.
        assert_eq!(
            fs::read_to_string(target.path().join("src/main.rs"))?,
            "fn main() {}"
        );
        assert!(target.path().join("config/settings.toml").exists());
        assert!(!target.path().join(".gitignore").exists());
        assert!(!target.path().join(".hidden_dir").exists());
        Ok(())
    }

    #[test]
    fn test_render_empty_dir() -> Result<()> {
        let source = tempdir()?;
        let target = tempdir()?;
        let summary = render_template_directory(
            source.path(),
            target.path(),
            &mut Replacer::new(),
            &[".template"],
            false,
        )?;
        assert_eq!(summary, RenderSummary::default());
        assert_eq!(fs::read_dir(target.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_render_unresolved_token_fails() -> Result<()> {
        let source = tempdir()?;
        let target = tempdir()?;
        create_file(&source.path().join("broken.tmpl"), "Hello {name}");

        let result = render_template_directory(
            source.path(),
            target.path(),
            &mut Replacer::new(),
            &[".tmpl"],
            false,
        );
        let error = result.unwrap_err();
        assert!(error.to_string().contains("Rendering failed"));
        assert!(error.to_string().contains("broken.tmpl"));
        assert!(matches!(
            error.downcast_ref::<ForgeError>(),
            Some(ForgeError::Template { .. })
        ));
        assert!(!target.path().join("broken").exists());
        Ok(())
    }

    #[test]
    fn test_render_case_insensitive_extension() -> Result<()> {
        let source = tempdir()?;
        let target = tempdir()?;
        create_file(&source.path().join("UPPER.TEMPLATE"), "Hello {project_name}");

        render_template_directory(
            source.path(),
            target.path(),
            &mut replacer(),
            &[".template"],
            false,
        )?;
        let content = fs::read_to_string(target.path().join("UPPER"))?;
        assert_eq!(content, "Hello MyAwesomeApp");
        Ok(())
    }

    #[test]
    fn test_existing_target_requires_force() -> Result<()> {
        let source = tempdir()?;
        let target = tempdir()?;
        create_file(&source.path().join("a.txt.tmpl"), "{version}");
        create_file(&source.path().join("b.txt"), "new");
        create_file(&target.path().join("b.txt"), "old");

        let result = render_template_directory(
            source.path(),
            target.path(),
            &mut replacer(),
            &[".tmpl"],
            false,
        );
        assert!(result.unwrap_err().to_string().contains("already exists"));
        assert!(!target.path().join("a.txt").exists());
        assert_eq!(fs::read_to_string(target.path().join("b.txt"))?, "old");

        render_template_directory(
            source.path(),
            target.path(),
            &mut replacer(),
            &[".tmpl"],
            true,
        )?;
        assert_eq!(fs::read_to_string(target.path().join("a.txt"))?, "0.1.0");
        assert_eq!(fs::read_to_string(target.path().join("b.txt"))?, "new");
        Ok(())
    }

    #[test]
    fn test_extension_alone_is_not_a_template() {
        assert_eq!(template_extension(".tmpl", &[".tmpl"]), None);
        assert_eq!(template_extension("x.TMPL", &[".tmpl"]), Some(".tmpl"));
        assert_eq!(template_extension("x.txt", &[".tmpl"]), None);
    }
}

//! Sass compilation.
//!
//! Each configured entry point compiles to a CSS file of the same stem in
//! the output assets directory (`css/main.scss` → `_site/assets/main.css`).
//! Release builds are compressed; dev builds keep the expanded output so the
//! CSS is readable in the browser.

use crate::config::SiteConfig;
use crate::lifecycle::BuildMode;
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stylesheet entry point not found: {0}")]
    EntryNotFound(PathBuf),
    #[error("Sass compilation failed for {path}: {message}")]
    Compile { path: PathBuf, message: String },
}

/// A compiled stylesheet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStylesheet {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Output file for an entry point: `<assets>/<stem>.css`.
pub fn output_path(entry_point: &Path, assets_dir: &Path) -> PathBuf {
    let stem = entry_point
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    // Sass partial naming (_base.scss) does not apply to entry points.
    assets_dir.join(format!("{stem}.css"))
}

/// Compile one Sass file to a CSS string.
pub fn compile_file(
    entry_point: &Path,
    load_paths: &[PathBuf],
    mode: BuildMode,
) -> Result<String, StyleError> {
    if !entry_point.is_file() {
        return Err(StyleError::EntryNotFound(entry_point.to_path_buf()));
    }

    let style = match mode {
        BuildMode::Release => grass::OutputStyle::Compressed,
        BuildMode::Dev => grass::OutputStyle::Expanded,
    };
    let options = load_paths
        .iter()
        .fold(grass::Options::default().style(style), |opts, p| {
            opts.load_path(p)
        });

    grass::from_path(entry_point, &options).map_err(|e| StyleError::Compile {
        path: entry_point.to_path_buf(),
        message: e.to_string(),
    })
}

/// Compile every configured entry point into the assets directory.
pub fn compile_stylesheets(
    config: &SiteConfig,
    root: &Path,
    mode: BuildMode,
) -> Result<Vec<CompiledStylesheet>, StyleError> {
    let paths = config.resolve_paths(root);
    let load_paths: Vec<PathBuf> = config
        .styles
        .load_paths
        .iter()
        .map(|p| root.join(p))
        .collect();

    std::fs::create_dir_all(&paths.assets_output)?;

    let mut compiled = Vec::new();
    for entry in &config.styles.entry_points {
        let source = root.join(entry);
        let css = compile_file(&source, &load_paths, mode)?;
        let output = output_path(&source, &paths.assets_output);
        std::fs::write(&output, &css)?;
        info!("Compiled {} → {}", entry, output.display());
        compiled.push(CompiledStylesheet {
            source,
            output,
            bytes: css.len(),
        });
    }
    Ok(compiled)
}

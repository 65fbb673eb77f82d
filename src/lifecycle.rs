//! Build lifecycle glue.
//!
//! The external site generator writes HTML into the output directory; this
//! module runs everything that has to happen around it, one stage at a time:
//!
//! ```text
//! build:        passthrough → HTML minify → after_build
//! after_build:  Sass compile → CSS purge (release only) → thumbnails
//! ```
//!
//! A stage starts only after the previous one has finished, and the first
//! failing stage aborts the run. The purge needs the compiled CSS and the
//! final HTML, so reordering is not an option.

use crate::config::{ConfigError, SiteConfig};
use crate::html::{self, HtmlError, MinifySummary};
use crate::imaging::{ImageBackend, RustBackend};
use crate::passthrough::{self, PassthroughError};
use crate::purge::{self, PurgeError, PurgeResult};
use crate::styles::{self, CompiledStylesheet, StyleError};
use crate::thumbnails::{self, ThumbnailError, ThumbnailEvent, ThumbnailSummary};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Release builds compress and purge CSS; dev builds keep it readable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    #[default]
    Release,
    Dev,
}

impl BuildMode {
    pub fn from_dev_flag(dev: bool) -> Self {
        if dev { Self::Dev } else { Self::Release }
    }

    pub fn purges_css(self) -> bool {
        self == Self::Release
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release => write!(f, "release"),
            Self::Dev => write!(f, "dev"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Passthrough copy failed: {0}")]
    Passthrough(#[from] PassthroughError),
    #[error("HTML minification failed: {0}")]
    Html(#[from] HtmlError),
    #[error("Stylesheet compilation failed: {0}")]
    Style(#[from] StyleError),
    #[error("CSS purge failed: {0}")]
    Purge(#[from] PurgeError),
    #[error("Thumbnail generation failed: {0}")]
    Thumbnail(#[from] ThumbnailError),
}

/// Output of the CSS stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssReport {
    pub compiled: Vec<CompiledStylesheet>,
    /// Empty in dev mode.
    pub purged: Vec<PurgeResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AfterBuildReport {
    pub css: CssReport,
    pub thumbnails: ThumbnailSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub copied: Vec<PathBuf>,
    pub html: MinifySummary,
    pub after_build: AfterBuildReport,
}

/// Compile the Sass entry points, then purge them in release mode.
pub fn compile_css(
    config: &SiteConfig,
    root: &Path,
    mode: BuildMode,
) -> Result<CssReport, BuildError> {
    info!("Compiling stylesheets ({mode})");
    let compiled = styles::compile_stylesheets(config, root, mode)?;

    let purged = if mode.purges_css() {
        let output = config.resolve_paths(root).output;
        let files: Vec<PathBuf> = compiled.iter().map(|c| c.output.clone()).collect();
        purge::purge_stylesheets(&output, &files, &config.purge.safelist)?
    } else {
        info!("Dev build, skipping CSS purge");
        Vec::new()
    };

    Ok(CssReport { compiled, purged })
}

/// CSS compile → purge → thumbnails.
pub fn after_build(
    config: &SiteConfig,
    root: &Path,
    mode: BuildMode,
    progress: Option<Sender<ThumbnailEvent>>,
) -> Result<AfterBuildReport, BuildError> {
    after_build_with_backend(&RustBackend::new(), config, root, mode, progress)
}

pub fn after_build_with_backend(
    backend: &impl ImageBackend,
    config: &SiteConfig,
    root: &Path,
    mode: BuildMode,
    progress: Option<Sender<ThumbnailEvent>>,
) -> Result<AfterBuildReport, BuildError> {
    let css = compile_css(config, root, mode)?;
    let thumbnails = thumbnails::generate_with_backend(backend, config, root, progress)?;
    Ok(AfterBuildReport { css, thumbnails })
}

/// Passthrough copy → HTML minify → [`after_build`].
pub fn build(
    config: &SiteConfig,
    root: &Path,
    mode: BuildMode,
    progress: Option<Sender<ThumbnailEvent>>,
) -> Result<BuildReport, BuildError> {
    build_with_backend(&RustBackend::new(), config, root, mode, progress)
}

pub fn build_with_backend(
    backend: &impl ImageBackend,
    config: &SiteConfig,
    root: &Path,
    mode: BuildMode,
    progress: Option<Sender<ThumbnailEvent>>,
) -> Result<BuildReport, BuildError> {
    config.validate()?;
    let output = config.resolve_paths(root).output;

    info!("Copying passthrough files");
    let copied = passthrough::copy_all(root, &output, &config.passthrough)?;

    info!("Minifying HTML in {}", output.display());
    let html = html::minify_site(&output)?;

    let after_build = after_build_with_backend(backend, config, root, mode, progress)?;
    Ok(BuildReport {
        copied,
        html,
        after_build,
    })
}

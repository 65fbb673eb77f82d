//! Project configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! describe the usual site layout, so a project that follows it needs no
//! config file at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! manifest = "_maps.json"   # Maps manifest (JSON)
//! images = "map_images"     # Source map screenshots
//! output = "_site"          # Output of the site generator
//! maps_dir = "maps"         # Thumbnails go to <output>/<maps_dir>
//! assets_dir = "assets"     # Compiled CSS goes to <output>/<assets_dir>
//!
//! [maps]
//! extension = "avif"        # Only files ending in .<extension> are images
//! placeholder = "placeholder.avif"
//! enrich_ports = false      # Also attach images to the `ports` category
//!
//! [thumbnails]
//! width = 400               # Thumbnail width in pixels
//! featured_width = 600      # Width for images of featured maps
//! quality = 50              # Encoding quality (1-100)
//!
//! [styles]
//! entry_points = ["css/main.scss", "css/blog.scss", "css/front.scss"]
//! load_paths = ["css"]
//!
//! [purge]
//! safelist = []             # Class/id names that are never purged
//!
//! [[passthrough]]
//! from = "misc/CNAME"
//! to = "CNAME"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the project root when no explicit path is given.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub paths: PathsConfig,
    pub maps: MapsConfig,
    pub thumbnails: ThumbnailsConfig,
    pub styles: StylesConfig,
    pub purge: PurgeConfig,
    /// Static files copied verbatim into the output directory.
    pub passthrough: Vec<CopyRule>,
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            maps: MapsConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            styles: StylesConfig::default(),
            purge: PurgeConfig::default(),
            passthrough: default_passthrough(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.width == 0 || self.thumbnails.featured_width == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.width and thumbnails.featured_width must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.maps.extension.is_empty() || self.maps.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "maps.extension must be a bare extension like \"avif\"".into(),
            ));
        }
        if self.maps.placeholder.is_empty() {
            return Err(ConfigError::Validation(
                "maps.placeholder must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve every configured path against the project root.
    pub fn resolve_paths(&self, root: &Path) -> ProjectPaths {
        let output = root.join(&self.paths.output);
        ProjectPaths {
            manifest: root.join(&self.paths.manifest),
            images: root.join(&self.paths.images),
            maps_output: output.join(&self.paths.maps_dir),
            assets_output: output.join(&self.paths.assets_dir),
            output,
        }
    }
}

/// Locations of inputs and outputs, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub manifest: String,
    pub images: String,
    pub output: String,
    pub maps_dir: String,
    pub assets_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: "_maps.json".to_string(),
            images: "map_images".to_string(),
            output: "_site".to_string(),
            maps_dir: "maps".to_string(),
            assets_dir: "assets".to_string(),
        }
    }
}

/// Absolute-or-root-relative paths derived from [`PathsConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub manifest: PathBuf,
    pub images: PathBuf,
    pub output: PathBuf,
    pub maps_output: PathBuf,
    pub assets_output: PathBuf,
}

/// Manifest enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapsConfig {
    /// Image file extension without the dot.
    pub extension: String,
    /// Full-size image used for entries without any matching file.
    pub placeholder: String,
    /// Attach images to `ports` entries too. Off by default: historically only
    /// featured, collaborations and crap were enriched.
    pub enrich_ports: bool,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            extension: "avif".to_string(),
            placeholder: "placeholder.avif".to_string(),
            enrich_ports: false,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub width: u32,
    pub featured_width: u32,
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            width: 400,
            featured_width: 600,
            quality: 50,
        }
    }
}

/// Sass compilation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// Sass entry points, relative to the project root. Each compiles to
    /// `<assets>/<stem>.css`.
    pub entry_points: Vec<String>,
    /// Extra directories searched by `@use` / `@import`.
    pub load_paths: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            entry_points: vec![
                "css/main.scss".to_string(),
                "css/blog.scss".to_string(),
                "css/front.scss".to_string(),
            ],
            load_paths: vec!["css".to_string()],
        }
    }
}

/// CSS purge settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PurgeConfig {
    /// Class or id names kept even when no HTML page uses them.
    pub safelist: Vec<String>,
}

/// A single passthrough copy: `<root>/<from>` → `<output>/<to>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyRule {
    pub from: String,
    pub to: String,
}

fn default_passthrough() -> Vec<CopyRule> {
    [
        ("misc/CNAME", "CNAME"),
        ("misc/.nojekyll", ".nojekyll"),
        ("misc/robots.txt", "robots.txt"),
    ]
    .into_iter()
    .map(|(from, to)| CopyRule {
        from: from.to_string(),
        to: to.to_string(),
    })
    .collect()
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a user
///   `[[passthrough]]` list replaces the stock list.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` when it doesn't exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the project root, falling back to stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILENAME))
}

/// Load a specific config file, falling back to stock defaults when absent.
pub fn load_config_file(config_path: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(config_path)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# map-gallery configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Paths (relative to the project root)
# ---------------------------------------------------------------------------
[paths]
# JSON manifest listing maps by category (featured, collaborations, crap, ports).
manifest = "_maps.json"

# Directory of full-size map screenshots, named <map name>_<anything>.<ext>.
images = "map_images"

# Output directory written by the site generator.
output = "_site"

# Thumbnails are written to <output>/<maps_dir>.
maps_dir = "maps"

# Compiled stylesheets are written to <output>/<assets_dir>.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Manifest enrichment
# ---------------------------------------------------------------------------
[maps]
# Only files with this extension are treated as map images.
extension = "avif"

# Shown for maps that have no image. Its thumbnail is placeholder_thumb.avif.
placeholder = "placeholder.avif"

# Also attach images to entries in the `ports` category.
enrich_ports = false

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Width in pixels; height follows the source aspect ratio.
width = 400

# Width for images belonging to featured maps.
featured_width = 600

# Encoding quality (1 = worst, 100 = best).
quality = 50

# ---------------------------------------------------------------------------
# Stylesheets
# ---------------------------------------------------------------------------
[styles]
# Sass entry points. css/main.scss compiles to <output>/assets/main.css.
entry_points = ["css/main.scss", "css/blog.scss", "css/front.scss"]

# Directories searched by @use and @import.
load_paths = ["css"]

# ---------------------------------------------------------------------------
# CSS purge (release builds only)
# ---------------------------------------------------------------------------
[purge]
# Class or id names to keep even if no generated page uses them.
safelist = []

# ---------------------------------------------------------------------------
# Passthrough copies: <root>/<from> -> <output>/<to>
# ---------------------------------------------------------------------------
[[passthrough]]
from = "misc/CNAME"
to = "CNAME"

[[passthrough]]
from = "misc/.nojekyll"
to = ".nojekyll"

[[passthrough]]
from = "misc/robots.txt"
to = "robots.txt"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel thumbnail workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

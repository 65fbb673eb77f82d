//! Removing unused CSS rules.
//!
//! The generated HTML is the content source. Every word-like token in it
//! (anything between whitespace, quotes and tag punctuation, plus each
//! `[A-Za-z0-9_-]+` run) counts as "used". A selector survives when every
//! class, id and element name it mentions is used or safelisted.
//!
//! Stylesheets are parsed and printed with `lightningcss`. Only the rule tree
//! is touched:
//!
//! - Style rules: unused selectors are dropped from the selector list; the
//!   rule goes when none are left.
//! - `@media`, `@supports`, `@layer` and `@container` blocks are filtered
//!   recursively and dropped when they end up empty.
//! - Every other at-rule (`@font-face`, `@keyframes`, `@import`, ...) is kept.
//!
//! Names inside `:not()`, `:is()`, `:where()` and `:has()`, pseudo-classes
//! and attribute selectors never cause a drop.

use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::selector::{Component, Selector};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use log::{error, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, #[source] walkdir::Error),
    #[error("Invalid CSS: {0}")]
    Css(String),
}

/// Grass prefixes compressed output with a byte-order mark when it holds
/// non-ASCII text.
const BOM: char = '\u{feff}';

/// Names considered used regardless of content.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    tokens: HashSet<String>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every `.html` file below `dir`.
    pub fn from_html_dir(dir: &Path) -> Result<Self, PurgeError> {
        let mut index = Self::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| PurgeError::Walk(dir.to_path_buf(), e))?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|e| e == "html")
            {
                let html = std::fs::read_to_string(entry.path()).map_err(|source| {
                    PurgeError::Io {
                        path: entry.path().to_path_buf(),
                        source,
                    }
                })?;
                index.add_content(&html);
            }
        }
        Ok(index)
    }

    pub fn add_content(&mut self, content: &str) {
        self.tokens.extend(extract_tokens(content));
    }

    pub fn add_safelist<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(names.into_iter().map(Into::into));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains(name)
    }
}

/// Word-like tokens of a document.
pub fn extract_tokens(content: &str) -> HashSet<String> {
    let is_separator =
        |c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '<' | '>' | '=');
    let mut tokens = HashSet::new();
    for token in content.split(is_separator).filter(|t| !t.is_empty()) {
        tokens.insert(token.to_string());
        for run in token
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .filter(|r| !r.is_empty())
        {
            tokens.insert(run.to_string());
            tokens.insert(run.to_ascii_lowercase());
        }
    }
    tokens
}

/// Names a single (non-list) selector depends on.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SelectorNames {
    pub classes: Vec<String>,
    pub ids: Vec<String>,
    pub elements: Vec<String>,
}

/// Classes, ids and element names of one selector's own compounds.
pub fn selector_names(selector: &Selector<'_>) -> SelectorNames {
    let mut names = SelectorNames::default();
    for component in selector.iter_raw_match_order() {
        match component {
            Component::Class(class) => names.classes.push(class.0.to_string()),
            Component::ID(id) => names.ids.push(id.0.to_string()),
            Component::LocalName(local) => names.elements.push(local.lower_name.0.to_string()),
            _ => {}
        }
    }
    names
}

/// Whether every name the selector depends on appears in the content.
pub fn selector_is_used(selector: &Selector<'_>, index: &ContentIndex) -> bool {
    let names = selector_names(selector);
    names
        .classes
        .iter()
        .chain(&names.ids)
        .chain(&names.elements)
        .all(|n| index.contains(n))
}

/// Drop unused selectors and rules in place; returns whether anything is left.
fn purge_rules(rules: &mut CssRuleList<'_>, index: &ContentIndex) -> bool {
    rules.0.retain_mut(|rule| match rule {
        CssRule::Style(style) => {
            style.selectors.0.retain(|s| selector_is_used(s, index));
            !style.selectors.0.is_empty()
        }
        CssRule::Media(media) => purge_rules(&mut media.rules, index),
        CssRule::Supports(supports) => purge_rules(&mut supports.rules, index),
        CssRule::LayerBlock(layer) => purge_rules(&mut layer.rules, index),
        CssRule::Container(container) => purge_rules(&mut container.rules, index),
        _ => true,
    });
    !rules.0.is_empty()
}

/// Remove unused rules from a stylesheet.
///
/// Single-line input is printed minified, anything else expanded. A leading
/// byte-order mark is carried over to the result.
pub fn purge_css(css: &str, index: &ContentIndex) -> Result<String, PurgeError> {
    let (bom, body) = match css.strip_prefix(BOM) {
        Some(rest) => (Some(BOM), rest),
        None => (None, css),
    };

    let mut sheet = StyleSheet::parse(body, ParserOptions::default())
        .map_err(|e| PurgeError::Css(e.to_string()))?;
    purge_rules(&mut sheet.rules, index);

    let printed = sheet
        .to_css(PrinterOptions {
            minify: !body.trim_end().contains('\n'),
            ..PrinterOptions::default()
        })
        .map_err(|e| PurgeError::Css(e.to_string()))?;

    Ok(bom.into_iter().chain(printed.code.chars()).collect())
}

/// Result of purging one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeResult {
    pub file: PathBuf,
    pub bytes_before: usize,
    pub bytes_after: usize,
}

/// Purge each stylesheet against the HTML under `content_dir`, in place.
pub fn purge_stylesheets(
    content_dir: &Path,
    stylesheets: &[PathBuf],
    safelist: &[String],
) -> Result<Vec<PurgeResult>, PurgeError> {
    info!("Purging CSS...");
    let mut index = ContentIndex::from_html_dir(content_dir)?;
    index.add_safelist(safelist.iter().cloned());

    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PurgeError::Io { path, source }
    };

    let mut results = Vec::new();
    for file in stylesheets {
        let css = std::fs::read_to_string(file).map_err(io_error(file))?;
        let purged = purge_css(&css, &index).inspect_err(|e| {
            error!("Purging {} failed: {}", file.display(), e);
        })?;
        info!("Overwriting purged file {}", file.display());
        std::fs::write(file, &purged).map_err(io_error(file))?;
        results.push(PurgeResult {
            file: file.clone(),
            bytes_before: css.len(),
            bytes_after: purged.len(),
        });
    }
    Ok(results)
}

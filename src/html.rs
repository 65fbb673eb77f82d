//! In-place minification of the generated HTML pages.

use log::{debug, info};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum HtmlError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, #[source] walkdir::Error),
}

/// Collapse whitespace, drop comments and shorten the doctype; markup
/// structure is left alone.
fn minify_config() -> minify_html::Cfg {
    minify_html::Cfg {
        // Still writes the short `<!doctype html>`; `false` drops the space too.
        do_not_minify_doctype: true,
        keep_closing_tags: true,
        keep_html_and_head_opening_tags: true,
        keep_comments: false,
        minify_css: true,
        ..minify_html::Cfg::default()
    }
}

pub fn minify(html: &[u8]) -> Vec<u8> {
    minify_html::minify(html, &minify_config())
}

/// Totals for one minification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinifySummary {
    pub files: usize,
    pub bytes_before: usize,
    pub bytes_after: usize,
}

/// Minify every `.html` file below `output` in place.
pub fn minify_site(output: &Path) -> Result<MinifySummary, HtmlError> {
    let cfg = minify_config();
    let mut summary = MinifySummary::default();

    for entry in WalkDir::new(output).sort_by_file_name() {
        let entry = entry.map_err(|e| HtmlError::Walk(output.to_path_buf(), e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "html") {
            continue;
        }
        let io_error = |source| HtmlError::Io {
            path: path.to_path_buf(),
            source,
        };

        let original = std::fs::read(path).map_err(io_error)?;
        let minified = minify_html::minify(&original, &cfg);
        std::fs::write(path, &minified).map_err(io_error)?;
        debug!(
            "Minified {} ({} → {} bytes)",
            path.display(),
            original.len(),
            minified.len()
        );

        summary.files += 1;
        summary.bytes_before += original.len();
        summary.bytes_after += minified.len();
    }

    info!("Minified {} HTML files", summary.files);
    Ok(summary)
}

//! Static files copied verbatim into the output directory.

use crate::config::CopyRule;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassthroughError {
    #[error("Passthrough source not found: {0}")]
    MissingSource(PathBuf),
    #[error("Failed to copy {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Copy every rule's `root/from` to `output/to`. Returns the written paths.
pub fn copy_all(
    root: &Path,
    output: &Path,
    rules: &[CopyRule],
) -> Result<Vec<PathBuf>, PassthroughError> {
    rules
        .iter()
        .map(|rule| copy_one(&root.join(&rule.from), &output.join(&rule.to)))
        .collect()
}

fn copy_one(from: &Path, to: &Path) -> Result<PathBuf, PassthroughError> {
    if !from.is_file() {
        return Err(PassthroughError::MissingSource(from.to_path_buf()));
    }
    let io_error = |source| PassthroughError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::copy(from, to).map_err(io_error)?;
    info!("Copied {} → {}", from.display(), to.display());
    Ok(to.to_path_buf())
}

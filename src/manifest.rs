//! Reading the maps manifest and listing map images.
//!
//! Both operations are fatal on failure: the error is logged with the path
//! that caused it and handed back to the caller, which aborts the build.
//! Schema problems beyond what JSON parsing catches (a missing name, an
//! empty category) are not checked here; they show up later as maps without
//! images.

use crate::types::ManifestFile;
use log::error;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read maps manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse maps manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read image directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load and parse the manifest. Read fresh on every call.
pub fn load_manifest(path: &Path) -> Result<ManifestFile, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| {
        error!("Failed to read {}: {}", path.display(), source);
        ManifestError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    serde_json::from_str(&content).map_err(|source| {
        error!("Failed to parse {}: {}", path.display(), source);
        ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// File names in `dir` ending in `.{extension}`, sorted by name.
///
/// Only the directory itself is listed; subdirectories are ignored even if
/// their name happens to end in the extension.
pub fn list_image_files(dir: &Path, extension: &str) -> Result<Vec<String>, ManifestError> {
    let read_error = |source: std::io::Error| {
        error!("Failed to read {} directory: {}", dir.display(), source);
        ManifestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        }
    };

    let suffix = format!(".{extension}");
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if entry.file_type().map_err(read_error)?.is_dir() {
            continue;
        }
        // Non-UTF-8 names can never match a map name.
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.ends_with(&suffix) {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_valid_manifest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_maps.json");
        fs::write(
            &path,
            r#"{"featured": [{"name": "alpha", "year": "2021"}], "crap": [], "collaborations": [], "ports": []}"#,
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.featured[0].name, "alpha");
        assert_eq!(manifest.featured[0].year, "2021");
    }

    #[test]
    fn missing_manifest_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_manifest(&tmp.path().join("_maps.json"));
        assert!(matches!(result, Err(ManifestError::Read { .. })));
    }

    #[test]
    fn malformed_manifest_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_maps.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_manifest(&path);
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn parse_error_message_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_maps.json");
        fs::write(&path, "[]").unwrap();

        let message = load_manifest(&path).unwrap_err().to_string();
        assert!(message.contains("_maps.json"), "{message}");
    }

    #[test]
    fn list_filters_by_extension() {
        let tmp = TempDir::new().unwrap();
        for name in ["b_1.avif", "a_1.avif", "notes.txt", "c_1.png", "d_1.AVIF"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }

        let files = list_image_files(tmp.path(), "avif").unwrap();
        assert_eq!(files, vec!["a_1.avif", "b_1.avif"]);
    }

    #[test]
    fn list_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested.avif")).unwrap();
        fs::write(tmp.path().join("a_1.avif"), "").unwrap();

        let files = list_image_files(tmp.path(), "avif").unwrap();
        assert_eq!(files, vec!["a_1.avif"]);
    }

    #[test]
    fn list_missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = list_image_files(&tmp.path().join("map_images"), "avif");
        assert!(matches!(result, Err(ManifestError::DirectoryRead { .. })));
    }

    #[test]
    fn list_empty_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(list_image_files(tmp.path(), "avif").unwrap().is_empty());
    }
}

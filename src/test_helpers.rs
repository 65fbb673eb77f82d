//! Shared test utilities: manifest builders, lookups and on-disk fixtures.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = manifest_with(&["alpha"], &["beta"], &[], &[]);
//! let project = setup_project(&manifest, &["alpha_1.avif"]);
//! let enriched = read_maps(&SiteConfig::default(), project.path()).unwrap();
//! assert_eq!(find_entry(&enriched, "beta").images.len(), 1);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Category, ManifestFile, MapEntry};

// =========================================================================
// Builders
// =========================================================================

/// An entry with just a name and a fixed year.
pub fn entry(name: &str) -> MapEntry {
    MapEntry {
        name: name.to_string(),
        year: "2020".to_string(),
        ..MapEntry::default()
    }
}

/// Build a manifest from entry names per category.
pub fn manifest_with(
    featured: &[&str],
    crap: &[&str],
    collaborations: &[&str],
    ports: &[&str],
) -> ManifestFile {
    let build = |names: &[&str]| -> Vec<MapEntry> { names.iter().map(|n| entry(n)).collect() };
    ManifestFile {
        featured: build(featured),
        crap: build(crap),
        collaborations: build(collaborations),
        ports: build(ports),
        ..ManifestFile::default()
    }
}

/// Owned file listing from string literals.
pub fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an entry by name in any category. Panics if not found.
pub fn find_entry<'a>(manifest: &'a ManifestFile, name: &str) -> &'a MapEntry {
    Category::ALL
        .iter()
        .flat_map(|c| manifest.entries(*c))
        .find(|e| e.name == name)
        .unwrap_or_else(|| {
            let names = manifest.all_names();
            panic!("entry '{name}' not found. Available: {names:?}")
        })
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write `_maps.json` and empty `map_images/<file>` entries into a temp dir.
///
/// Image files are empty; use a [`MockBackend`](crate::imaging::backend::tests::MockBackend)
/// when the test goes on to generate thumbnails.
pub fn setup_project(manifest: &ManifestFile, image_files: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_manifest(tmp.path(), manifest);
    let images = tmp.path().join("map_images");
    std::fs::create_dir_all(&images).unwrap();
    for name in image_files {
        std::fs::write(images.join(name), "").unwrap();
    }
    tmp
}

pub fn write_manifest(root: &Path, manifest: &ManifestFile) {
    let json = serde_json::to_string_pretty(manifest).unwrap();
    std::fs::write(root.join("_maps.json"), json).unwrap();
}

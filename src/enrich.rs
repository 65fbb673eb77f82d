//! Attaching image lists to manifest entries.
//!
//! Enrichment never mutates its input: [`enrich_manifest`] returns a new
//! [`ManifestFile`] whose entries carry `images`. Every entry of an enriched
//! category ends up with at least one image; entries without a matching file
//! get the placeholder pair and an `error!` log line, but enrichment itself never fails.

use crate::config::SiteConfig;
use crate::manifest::{self, ManifestError};
use crate::naming::{find_prefix_collisions, matches_entry, thumb_name};
use crate::types::{Category, ImagePair, ManifestFile, MapEntry};
use log::{error, info, warn};
use std::path::Path;

/// What to enrich and what to fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Full-size placeholder file name; its thumbnail name is derived.
    pub placeholder: String,
    pub categories: Vec<Category>,
}

impl EnrichOptions {
    pub fn from_site_config(config: &SiteConfig) -> Self {
        let mut categories = vec![
            Category::Featured,
            Category::Collaborations,
            Category::Crap,
        ];
        if config.maps.enrich_ports {
            categories.push(Category::Ports);
        }
        Self {
            placeholder: config.maps.placeholder.clone(),
            categories,
        }
    }

    pub fn placeholder_pair(&self) -> ImagePair {
        ImagePair {
            full: self.placeholder.clone(),
            thumb: thumb_name(&self.placeholder),
        }
    }
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self::from_site_config(&SiteConfig::default())
    }
}

/// Every file belonging to the map `name`, in listing order.
pub fn match_images(name: &str, files: &[String]) -> Vec<ImagePair> {
    files
        .iter()
        .filter(|f| matches_entry(f, name))
        .map(|f| ImagePair {
            full: f.clone(),
            thumb: thumb_name(f),
        })
        .collect()
}

/// A copy of `entry` with `images` filled in, or the placeholder when nothing matches.
pub fn enrich_entry(entry: &MapEntry, files: &[String], placeholder: &ImagePair) -> MapEntry {
    let mut images = match_images(&entry.name, files);
    if images.is_empty() {
        error!("{} has no images!", entry.name);
        images.push(placeholder.clone());
    }
    MapEntry {
        images,
        ..entry.clone()
    }
}

/// Enrich the configured categories; other categories are copied as-is.
pub fn enrich_manifest(
    manifest: &ManifestFile,
    files: &[String],
    options: &EnrichOptions,
) -> ManifestFile {
    let placeholder = options.placeholder_pair();
    let mut enriched = manifest.clone();

    for category in &options.categories {
        let entries = enriched.entries_mut(*category);
        *entries = entries
            .iter()
            .map(|e| enrich_entry(e, files, &placeholder))
            .collect();
    }

    if !options.categories.contains(&Category::Ports) && !manifest.ports.is_empty() {
        info!(
            "{} ports entries left without images (set maps.enrich_ports to include them)",
            manifest.ports.len()
        );
    }

    enriched
}

/// Load the manifest, list the images and enrich: the data handed to page templates.
pub fn read_maps(config: &SiteConfig, root: &Path) -> Result<ManifestFile, ManifestError> {
    let paths = config.resolve_paths(root);
    let manifest = manifest::load_manifest(&paths.manifest)?;
    let files = manifest::list_image_files(&paths.images, &config.maps.extension)?;

    for (shorter, longer) in find_prefix_collisions(manifest.all_names()) {
        warn!("images of map '{longer}' also match map '{shorter}'");
    }

    Ok(enrich_manifest(
        &manifest,
        &files,
        &EnrichOptions::from_site_config(config),
    ))
}

/// Names of entries in enriched categories that fell back to the placeholder.
pub fn placeholder_entries<'a>(
    manifest: &'a ManifestFile,
    options: &EnrichOptions,
) -> Vec<(Category, &'a str)> {
    let placeholder = options.placeholder_pair();
    options
        .categories
        .iter()
        .flat_map(|c| manifest.entries(*c).iter().map(move |e| (*c, e)))
        .filter(|(_, e)| e.images.len() == 1 && e.images[0] == placeholder)
        .map(|(c, e)| (c, e.name.as_str()))
        .collect()
}

/// Findings of `check`: everything that would build but deserves a look.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    pub entry_counts: Vec<(Category, usize)>,
    pub image_count: usize,
    pub placeholders: Vec<(Category, String)>,
    /// `(shorter, longer)` name pairs; see [`find_prefix_collisions`].
    pub collisions: Vec<(String, String)>,
    /// Ports entries left without images because ports are not enriched.
    pub unenriched_ports: usize,
    /// Image files no manifest entry claims.
    pub orphan_images: Vec<String>,
}

impl CheckReport {
    pub fn has_warnings(&self) -> bool {
        !self.placeholders.is_empty()
            || !self.collisions.is_empty()
            || !self.orphan_images.is_empty()
    }
}

/// Build a [`CheckReport`] from a loaded manifest and file listing.
pub fn check_manifest(
    manifest: &ManifestFile,
    files: &[String],
    options: &EnrichOptions,
) -> CheckReport {
    let enriched = enrich_manifest(manifest, files, options);
    let names = manifest.all_names();

    CheckReport {
        entry_counts: Category::ALL
            .iter()
            .map(|c| (*c, manifest.entries(*c).len()))
            .collect(),
        image_count: files.len(),
        placeholders: placeholder_entries(&enriched, options)
            .into_iter()
            .map(|(c, n)| (c, n.to_string()))
            .collect(),
        collisions: find_prefix_collisions(names.iter().copied()),
        unenriched_ports: if options.categories.contains(&Category::Ports) {
            0
        } else {
            manifest.ports.len()
        },
        orphan_images: files
            .iter()
            .filter(|f| !names.iter().any(|n| matches_entry(f, n)))
            .cloned()
            .collect(),
    }
}

/// Load inputs and report on them without writing anything.
pub fn check_maps(config: &SiteConfig, root: &Path) -> Result<CheckReport, ManifestError> {
    let paths = config.resolve_paths(root);
    let manifest = manifest::load_manifest(&paths.manifest)?;
    let files = manifest::list_image_files(&paths.images, &config.maps.extension)?;
    Ok(check_manifest(
        &manifest,
        &files,
        &EnrichOptions::from_site_config(config),
    ))
}

//! Thumbnail generation for the maps gallery.
//!
//! Every image in the map image directory gets a thumbnail in
//! `<output>/<maps_dir>/`, named by the `_thumb` convention
//! ([`naming::thumb_name`]). Images of featured maps are wider than the rest:
//!
//! ```text
//! map_images/alpha_1.avif  (alpha is featured)  →  _site/maps/alpha_1_thumb.avif  600px wide
//! map_images/beta_1.avif                        →  _site/maps/beta_1_thumb.avif   400px wide
//! map_images/gamma_1.avif  (in no category)     →  _site/maps/gamma_1_thumb.avif  400px wide
//! ```
//!
//! ## Parallel Processing
//!
//! Files are independent, so all resizes run on the rayon pool at once.
//! The batch is joined as a whole: the first failing file fails the stage,
//! and nothing is retried.

use crate::config::SiteConfig;
use crate::imaging::{BackendError, ImageBackend, Quality, RustBackend, create_thumbnail};
use crate::manifest::{self, ManifestError};
use crate::naming::{matches_entry, thumb_name};
use crate::types::{ManifestFile, MapEntry};
use log::{error, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Thumbnail for {file} failed: {source}")]
    Imaging {
        file: String,
        #[source]
        source: BackendError,
    },
}

/// Target widths and encoding quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSizes {
    pub width: u32,
    pub featured_width: u32,
    pub quality: Quality,
}

impl ThumbnailSizes {
    pub fn from_site_config(config: &SiteConfig) -> Self {
        Self {
            width: config.thumbnails.width,
            featured_width: config.thumbnails.featured_width,
            quality: Quality::new(config.thumbnails.quality),
        }
    }
}

impl Default for ThumbnailSizes {
    fn default() -> Self {
        Self::from_site_config(&SiteConfig::default())
    }
}

/// Thumbnail width for a source file: wider when it belongs to a featured map.
pub fn thumbnail_width(filename: &str, featured: &[MapEntry], sizes: &ThumbnailSizes) -> u32 {
    if is_featured(filename, featured) {
        sizes.featured_width
    } else {
        sizes.width
    }
}

fn is_featured(filename: &str, featured: &[MapEntry]) -> bool {
    featured.iter().any(|m| matches_entry(filename, &m.name))
}

/// One planned resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailJob {
    pub filename: String,
    pub thumb: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    /// Belongs to a featured map.
    pub featured: bool,
}

/// Plan a thumbnail for every listed file, used by a map or not.
pub fn plan_thumbnails(
    files: &[String],
    manifest: &ManifestFile,
    images_dir: &Path,
    output_dir: &Path,
    sizes: &ThumbnailSizes,
) -> Vec<ThumbnailJob> {
    files
        .iter()
        .map(|filename| {
            let thumb = thumb_name(filename);
            ThumbnailJob {
                source: images_dir.join(filename),
                output: output_dir.join(&thumb),
                width: thumbnail_width(filename, &manifest.featured, sizes),
                featured: is_featured(filename, &manifest.featured),
                filename: filename.clone(),
                thumb,
            }
        })
        .collect()
}

/// Progress events, sent from worker threads in completion order.
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailEvent {
    Started { total: usize },
    Processing { filename: String, width: u32 },
    Failed { filename: String, error: String },
    Finished { count: usize },
}

/// What the stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailSummary {
    pub jobs: Vec<ThumbnailJob>,
    pub output_dir: PathBuf,
}

impl ThumbnailSummary {
    pub fn featured_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.featured).count()
    }
}

/// Generate all thumbnails with the pure-Rust backend.
pub fn generate_thumbnails(
    config: &SiteConfig,
    root: &Path,
    progress: Option<Sender<ThumbnailEvent>>,
) -> Result<ThumbnailSummary, ThumbnailError> {
    generate_with_backend(&RustBackend::new(), config, root, progress)
}

/// Generate all thumbnails using a specific backend (allows testing with mock).
///
/// Inputs are listed and loaded before anything is written, so a missing
/// manifest or image directory leaves the output untouched.
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    config: &SiteConfig,
    root: &Path,
    progress: Option<Sender<ThumbnailEvent>>,
) -> Result<ThumbnailSummary, ThumbnailError> {
    info!("Transforming images to thumbnails...");
    let paths = config.resolve_paths(root);
    let files = manifest::list_image_files(&paths.images, &config.maps.extension)?;
    let maps = manifest::load_manifest(&paths.manifest)?;

    let sizes = ThumbnailSizes::from_site_config(config);
    let jobs = plan_thumbnails(&files, &maps, &paths.images, &paths.maps_output, &sizes);

    std::fs::create_dir_all(&paths.maps_output)?;

    let send = |event: ThumbnailEvent| {
        if let Some(tx) = &progress {
            // A dropped receiver only loses progress output.
            let _ = tx.send(event);
        }
    };

    send(ThumbnailEvent::Started { total: jobs.len() });

    jobs.par_iter()
        .map(|job| {
            send(ThumbnailEvent::Processing {
                filename: job.filename.clone(),
                width: job.width,
            });
            create_thumbnail(backend, &job.source, &job.output, job.width, sizes.quality).map_err(
                |source| {
                    error!("Processing {} failed: {}", job.filename, source);
                    send(ThumbnailEvent::Failed {
                        filename: job.filename.clone(),
                        error: source.to_string(),
                    });
                    ThumbnailError::Imaging {
                        file: job.filename.clone(),
                        source,
                    }
                },
            )
        })
        .collect::<Result<Vec<()>, ThumbnailError>>()?;

    send(ThumbnailEvent::Finished { count: jobs.len() });
    info!("Transformation done!");

    Ok(ThumbnailSummary {
        jobs,
        output_dir: paths.maps_output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{entry, files, manifest_with, setup_project};
    use std::sync::mpsc;

    #[test]
    fn featured_file_gets_wide_thumbnail() {
        let featured = vec![entry("alpha")];
        let sizes = ThumbnailSizes::default();
        assert_eq!(thumbnail_width("alpha_1.avif", &featured, &sizes), 600);
        assert_eq!(thumbnail_width("beta_1.avif", &featured, &sizes), 400);
    }

    #[test]
    fn featured_match_uses_prefix_convention() {
        let featured = vec![entry("alpha")];
        let sizes = ThumbnailSizes::default();
        assert_eq!(thumbnail_width("alphabet_1.avif", &featured, &sizes), 400);
    }

    #[test]
    fn non_featured_categories_get_default_width() {
        let manifest = manifest_with(&[], &["beta"], &["gamma"], &["delta"]);
        let sizes = ThumbnailSizes::default();
        for file in ["beta_1.avif", "gamma_1.avif", "delta_1.avif"] {
            assert_eq!(thumbnail_width(file, &manifest.featured, &sizes), 400);
        }
    }

    #[test]
    fn plan_covers_every_file() {
        let manifest = manifest_with(&["alpha"], &["beta"], &[], &[]);
        let jobs = plan_thumbnails(
            &files(&["alpha_1.avif", "gamma_1.avif"]),
            &manifest,
            Path::new("/src/map_images"),
            Path::new("/src/_site/maps"),
            &ThumbnailSizes::default(),
        );

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source, Path::new("/src/map_images/alpha_1.avif"));
        assert_eq!(jobs[0].output, Path::new("/src/_site/maps/alpha_1_thumb.avif"));
        assert_eq!(jobs[0].width, 600);
        assert_eq!(jobs[1].thumb, "gamma_1_thumb.avif");
        assert_eq!(jobs[1].width, 400);
    }

    #[test]
    fn generate_with_mock_resizes_every_file() {
        let manifest = manifest_with(&["alpha"], &["beta"], &[], &[]);
        let project = setup_project(&manifest, &["alpha_1.avif", "beta_1.avif", "gamma_1.avif"]);
        let backend = MockBackend::new();

        let summary =
            generate_with_backend(&backend, &SiteConfig::default(), project.path(), None).unwrap();

        assert_eq!(
            backend.resizes(),
            vec![
                ("alpha_1.avif".into(), "alpha_1_thumb.avif".into(), 600),
                ("beta_1.avif".into(), "beta_1_thumb.avif".into(), 400),
                ("gamma_1.avif".into(), "gamma_1_thumb.avif".into(), 400),
            ]
        );
        assert_eq!(summary.jobs.len(), 3);
        assert_eq!(summary.featured_count(), 1);
        assert!(project.path().join("_site/maps").is_dir());
    }

    #[test]
    fn generate_uses_configured_sizes_and_quality() {
        let manifest = manifest_with(&["alpha"], &[], &[], &[]);
        let project = setup_project(&manifest, &["alpha_1.avif", "beta_1.avif"]);
        let mut config = SiteConfig::default();
        config.thumbnails.width = 300;
        config.thumbnails.featured_width = 900;
        config.thumbnails.quality = 70;
        let backend = MockBackend::new();

        generate_with_backend(&backend, &config, project.path(), None).unwrap();

        let widths: Vec<u32> = backend.resizes().into_iter().map(|r| r.2).collect();
        assert_eq!(widths, vec![900, 300]);
        assert!(backend.get_operations().iter().all(|op| matches!(
            op,
            crate::imaging::backend::tests::RecordedOp::Resize { quality: 70, .. }
        )));
    }

    #[test]
    fn featured_count_with_equal_widths() {
        let manifest = manifest_with(&["alpha"], &["beta"], &[], &[]);
        let project = setup_project(&manifest, &["alpha_1.avif", "beta_1.avif"]);
        let mut config = SiteConfig::default();
        config.thumbnails.width = 500;
        config.thumbnails.featured_width = 500;

        let summary =
            generate_with_backend(&MockBackend::new(), &config, project.path(), None).unwrap();

        assert!(summary.jobs.iter().all(|j| j.width == 500));
        assert_eq!(summary.featured_count(), 1);
    }

    #[test]
    fn missing_manifest_fails_without_output() {
        let project = setup_project(&ManifestFile::default(), &["alpha_1.avif"]);
        std::fs::remove_file(project.path().join("_maps.json")).unwrap();
        let backend = MockBackend::new();

        let result = generate_with_backend(&backend, &SiteConfig::default(), project.path(), None);

        assert!(matches!(
            result,
            Err(ThumbnailError::Manifest(ManifestError::Read { .. }))
        ));
        assert!(backend.get_operations().is_empty());
        assert!(!project.path().join("_site/maps").exists());
    }

    #[test]
    fn missing_image_directory_fails() {
        let project = setup_project(&ManifestFile::default(), &[]);
        std::fs::remove_dir(project.path().join("map_images")).unwrap();

        let result = generate_with_backend(
            &MockBackend::new(),
            &SiteConfig::default(),
            project.path(),
            None,
        );
        assert!(matches!(
            result,
            Err(ThumbnailError::Manifest(ManifestError::DirectoryRead { .. }))
        ));
    }

    #[test]
    fn one_failing_file_fails_the_batch() {
        let manifest = manifest_with(&["alpha"], &[], &[], &[]);
        let project = setup_project(&manifest, &["alpha_1.avif", "bad_1.avif", "beta_1.avif"]);
        let backend = MockBackend::failing_on(&["bad_1.avif"]);

        let result = generate_with_backend(&backend, &SiteConfig::default(), project.path(), None);

        match result {
            Err(ThumbnailError::Imaging { file, .. }) => assert_eq!(file, "bad_1.avif"),
            other => panic!("expected imaging error, got {other:?}"),
        }
    }

    #[test]
    fn progress_events_bracket_the_batch() {
        let manifest = manifest_with(&["alpha"], &[], &[], &[]);
        let project = setup_project(&manifest, &["alpha_1.avif", "beta_1.avif"]);
        let (tx, rx) = mpsc::channel();

        generate_with_backend(
            &MockBackend::new(),
            &SiteConfig::default(),
            project.path(),
            Some(tx),
        )
        .unwrap();

        let events: Vec<ThumbnailEvent> = rx.iter().collect();
        assert_eq!(events.first(), Some(&ThumbnailEvent::Started { total: 2 }));
        assert_eq!(events.last(), Some(&ThumbnailEvent::Finished { count: 2 }));
        let processing = events
            .iter()
            .filter(|e| matches!(e, ThumbnailEvent::Processing { .. }))
            .count();
        assert_eq!(processing, 2);
    }
}

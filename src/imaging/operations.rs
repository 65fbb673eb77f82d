//! High-level image operations.
//!
//! These functions combine calculations with backend execution.

use super::backend::{BackendError, ImageBackend};
use super::params::{Quality, ResizeParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a thumbnail resize without executing it.
pub fn plan_thumbnail(source: &Path, output: &Path, width: u32, quality: Quality) -> ResizeParams {
    ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        quality,
    }
}

/// Write a `width`-pixel-wide thumbnail of `source` to `output`.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    width: u32,
    quality: Quality,
) -> Result<()> {
    backend.resize(&plan_thumbnail(source, output, width, quality))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn plan_thumbnail_carries_width_and_quality() {
        let params = plan_thumbnail(
            Path::new("/in/alpha_1.avif"),
            Path::new("/out/alpha_1_thumb.avif"),
            600,
            Quality::new(70),
        );
        assert_eq!(params.width, 600);
        assert_eq!(params.quality.value(), 70);
        assert_eq!(params.output, Path::new("/out/alpha_1_thumb.avif"));
    }

    #[test]
    fn create_thumbnail_uses_backend() {
        let backend = MockBackend::new();

        create_thumbnail(
            &backend,
            Path::new("/in/beta_1.avif"),
            Path::new("/out/beta_1_thumb.avif"),
            400,
            Quality::default(),
        )
        .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                width: 400,
                quality: 50,
                ..
            }
        ));
    }
}

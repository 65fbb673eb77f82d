//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Output dimensions for a width-constrained resize.
///
/// The height follows the source aspect ratio and is never below 1px.
/// Sources narrower than `width` are scaled up, like a plain
/// `resize(width)` in most image tools.
///
/// # Examples
/// ```
/// # use map_gallery::imaging::scale_to_width;
/// assert_eq!(scale_to_width((1920, 1080), 600), (600, 338));
/// assert_eq!(scale_to_width((200, 100), 400), (400, 200));
/// ```
pub fn scale_to_width(source: (u32, u32), width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return (width, src_h.max(1));
    }
    let height = (src_h as f64 * width as f64 / src_w as f64).round() as u32;
    (width, height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_downscale() {
        assert_eq!(scale_to_width((1920, 1080), 400), (400, 225));
    }

    #[test]
    fn portrait_downscale() {
        assert_eq!(scale_to_width((1000, 2000), 600), (600, 1200));
    }

    #[test]
    fn rounds_to_nearest() {
        // 1080 * 600 / 1920 = 337.5
        assert_eq!(scale_to_width((1920, 1080), 600), (600, 338));
    }

    #[test]
    fn upscales_small_sources() {
        assert_eq!(scale_to_width((200, 100), 400), (400, 200));
    }

    #[test]
    fn very_wide_source_keeps_one_pixel() {
        assert_eq!(scale_to_width((10000, 1), 400), (400, 1));
    }

    #[test]
    fn zero_width_source_does_not_divide_by_zero() {
        assert_eq!(scale_to_width((0, 50), 400), (400, 50));
    }
}

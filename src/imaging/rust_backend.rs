//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Decode (AVIF) | `avif-parse` (container) + `rav1d` (AV1 decode) + YUV→RGB below |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | Encode → PNG / JPEG / WebP | `DynamicImage::save_with_format` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::scale_to_width;
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn processing_error(path: &Path, what: &str, err: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("{what} {}: {err}", path.display()))
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    if extension_of(path) == "avif" {
        return decode_avif(path);
    }
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| processing_error(path, "Failed to decode", e))
}

fn read_avif(path: &Path) -> Result<avif_parse::AvifData, BackendError> {
    let file_data = std::fs::read(path)?;
    avif_parse::read_avif(&mut std::io::Cursor::new(&file_data))
        .map_err(|e| processing_error(path, "Failed to parse AVIF", format!("{e:?}")))
}

/// Dimensions from the AVIF container metadata, without decoding pixels.
fn identify_avif(path: &Path) -> Result<Dimensions, BackendError> {
    let avif = read_avif(path)?;
    let meta = avif
        .primary_item_metadata()
        .map_err(|e| processing_error(path, "Failed to read AVIF metadata", format!("{e:?}")))?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

/// Decode an AVIF file: container via avif-parse, AV1 payload via rav1d.
///
/// The `image` crate's `"avif"` feature only ships the encoder; decoding
/// through it would pull in the dav1d C library.
fn decode_avif(path: &Path) -> Result<DynamicImage, BackendError> {
    let avif = read_avif(path)?;
    let av1_bytes: &[u8] = &avif.primary_item;
    decode_av1(av1_bytes).map_err(|e| match e {
        BackendError::ProcessingFailed(msg) => processing_error(path, "Failed to decode AVIF", msg),
        other => other,
    })
}

/// Decode a single AV1 frame to RGB8.
///
/// The decoder context and picture are released on every path out of this
/// function; conversion happens while the picture is still referenced.
fn decode_av1(av1_bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    use rav1d::include::dav1d::data::Dav1dData;
    use rav1d::include::dav1d::dav1d::Dav1dSettings;
    use rav1d::include::dav1d::picture::Dav1dPicture;
    use rav1d::src::lib as dav1d;
    use std::ptr::NonNull;

    let mut settings = std::mem::MaybeUninit::<Dav1dSettings>::uninit();
    let Some(settings_ptr) = NonNull::new(settings.as_mut_ptr()) else {
        return Err(BackendError::ProcessingFailed(
            "rav1d settings allocation failed".into(),
        ));
    };
    unsafe { dav1d::dav1d_default_settings(settings_ptr) };
    let mut settings = unsafe { settings.assume_init() };
    // Thumbnails already run one file per rayon worker.
    settings.n_threads = 1;
    settings.max_frame_delay = 1;

    let mut ctx = None;
    let rc = unsafe { dav1d::dav1d_open(NonNull::new(&mut ctx), NonNull::new(&mut settings)) };
    if rc.0 != 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "rav1d open failed ({})",
            rc.0
        )));
    }

    let mut data = Dav1dData::default();
    let buf_ptr = unsafe { dav1d::dav1d_data_create(NonNull::new(&mut data), av1_bytes.len()) };
    if buf_ptr.is_null() {
        unsafe { dav1d::dav1d_close(NonNull::new(&mut ctx)) };
        return Err(BackendError::ProcessingFailed(
            "rav1d data_create failed".into(),
        ));
    }
    unsafe { std::ptr::copy_nonoverlapping(av1_bytes.as_ptr(), buf_ptr, av1_bytes.len()) };

    let rc = unsafe { dav1d::dav1d_send_data(ctx, NonNull::new(&mut data)) };
    if rc.0 != 0 {
        unsafe {
            dav1d::dav1d_data_unref(NonNull::new(&mut data));
            dav1d::dav1d_close(NonNull::new(&mut ctx));
        }
        return Err(BackendError::ProcessingFailed(format!(
            "rav1d send_data failed ({})",
            rc.0
        )));
    }

    let mut pic: Dav1dPicture = unsafe { std::mem::zeroed() };
    let rc = unsafe { dav1d::dav1d_get_picture(ctx, NonNull::new(&mut pic)) };
    if rc.0 != 0 {
        unsafe { dav1d::dav1d_close(NonNull::new(&mut ctx)) };
        return Err(BackendError::ProcessingFailed(format!(
            "rav1d get_picture failed ({})",
            rc.0
        )));
    }

    let image = picture_to_image(&pic);

    unsafe {
        dav1d::dav1d_picture_unref(NonNull::new(&mut pic));
        dav1d::dav1d_close(NonNull::new(&mut ctx));
    }

    image
}

/// Convert a decoded rav1d picture to an RGB8 image.
fn picture_to_image(
    pic: &rav1d::include::dav1d::picture::Dav1dPicture,
) -> Result<DynamicImage, BackendError> {
    use rav1d::include::dav1d::headers::{
        DAV1D_PIXEL_LAYOUT_I400, DAV1D_PIXEL_LAYOUT_I420, DAV1D_PIXEL_LAYOUT_I422,
        DAV1D_PIXEL_LAYOUT_I444,
    };

    let plane = |i: usize| {
        pic.data[i]
            .map(|p| p.as_ptr() as *const u8)
            .ok_or_else(|| BackendError::ProcessingFailed(format!("AVIF plane {i} missing")))
    };

    let width = pic.p.w as u32;
    let height = pic.p.h as u32;
    let layout = pic.p.layout;
    let y_ptr = plane(0)?;

    let planes = if layout == DAV1D_PIXEL_LAYOUT_I400 {
        YuvPlanes {
            y_ptr,
            u_ptr: y_ptr,
            v_ptr: y_ptr,
            y_stride: pic.stride[0],
            uv_stride: 0,
            width,
            height,
            bpc: pic.p.bpc as u32,
            ss_x: false,
            ss_y: false,
            monochrome: true,
        }
    } else {
        let (ss_x, ss_y) = match layout {
            DAV1D_PIXEL_LAYOUT_I420 => (true, true),
            DAV1D_PIXEL_LAYOUT_I422 => (true, false),
            DAV1D_PIXEL_LAYOUT_I444 => (false, false),
            _ => {
                return Err(BackendError::ProcessingFailed(format!(
                    "Unsupported AVIF pixel layout: {layout}"
                )));
            }
        };
        YuvPlanes {
            y_ptr,
            u_ptr: plane(1)?,
            v_ptr: plane(2)?,
            y_stride: pic.stride[0],
            uv_stride: pic.stride[1],
            width,
            height,
            bpc: pic.p.bpc as u32,
            ss_x,
            ss_y,
            monochrome: false,
        }
    };

    image::RgbImage::from_raw(width, height, planes.to_rgb())
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| {
            BackendError::ProcessingFailed("Decoded AVIF buffer has the wrong size".into())
        })
}

/// Decoded YUV plane data from rav1d, ready for RGB conversion.
struct YuvPlanes {
    y_ptr: *const u8,
    u_ptr: *const u8,
    v_ptr: *const u8,
    y_stride: isize,
    uv_stride: isize,
    width: u32,
    height: u32,
    bpc: u32,
    /// Chroma subsampling: horizontal, vertical (I420 = true, true)
    ss_x: bool,
    ss_y: bool,
    monochrome: bool,
}

impl YuvPlanes {
    /// Convert to interleaved RGB8 using BT.601 coefficients.
    fn to_rgb(&self) -> Vec<u8> {
        let max_val = ((1u32 << self.bpc) - 1) as f32;
        let center = (1u32 << (self.bpc - 1)) as f32;
        let scale = 255.0 / max_val;

        let mut rgb = Vec::with_capacity((self.width * self.height * 3) as usize);

        for row in 0..self.height {
            for col in 0..self.width {
                let y = read_sample(self.y_ptr, self.y_stride, col, row, self.bpc);

                let (r, g, b) = if self.monochrome {
                    (y, y, y)
                } else {
                    let cx = if self.ss_x { col / 2 } else { col };
                    let cy = if self.ss_y { row / 2 } else { row };
                    let cb = read_sample(self.u_ptr, self.uv_stride, cx, cy, self.bpc) - center;
                    let cr = read_sample(self.v_ptr, self.uv_stride, cx, cy, self.bpc) - center;
                    (
                        y + 1.402 * cr,
                        y - 0.344136 * cb - 0.714136 * cr,
                        y + 1.772 * cb,
                    )
                };

                for channel in [r, g, b] {
                    rgb.push((channel * scale).clamp(0.0, 255.0) as u8);
                }
            }
        }

        rgb
    }
}

/// Read one sample from a plane; >8-bit depths are stored as u16.
#[inline]
fn read_sample(ptr: *const u8, stride: isize, x: u32, y: u32, bpc: u32) -> f32 {
    if bpc <= 8 {
        (unsafe { *ptr.offset(y as isize * stride + x as isize) }) as f32
    } else {
        let byte_offset = y as isize * stride + x as isize * 2;
        (unsafe { *(ptr.offset(byte_offset) as *const u16) }) as f32
    }
}

/// Save an image, choosing the encoder from the output extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let format = match extension_of(path).as_str() {
        "avif" => return save_avif(img, path, quality),
        "png" => ImageFormat::Png,
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "webp" => ImageFormat::WebP,
        other => {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {other}"
            )));
        }
    };
    // JPEG has no alpha channel.
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img.clone()
    };
    img.save_with_format(path, format)
        .map_err(|e| processing_error(path, "Failed to encode", e))
}

/// Encode and save as AVIF using rav1e (speed 6 for reasonable throughput).
fn save_avif(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder =
        image::codecs::avif::AvifEncoder::new_with_speed_quality(writer, 6, quality as u8);
    img.write_with_encoder(encoder)
        .map_err(|e| processing_error(path, "AVIF encode failed for", e))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        if extension_of(path) == "avif" {
            return identify_avif(path);
        }
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| processing_error(path, "Failed to read dimensions of", e))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let (width, height) = scale_to_width((img.width(), img.height()), params.width);
        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.quality.value())
    }
}

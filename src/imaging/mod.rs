//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions`, AVIF container metadata |
//! | **Resize → AVIF** | Lanczos3 + rav1e encoder |
//!
//! The module is split into:
//! - **Calculations**: pure dimension math (unit testable)
//! - **Parameters**: data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: high-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::scale_to_width;
pub use operations::{create_thumbnail, plan_thumbnail};
pub use params::{Quality, ResizeParams};
pub use rust_backend::RustBackend;

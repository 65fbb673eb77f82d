//! # Map Gallery
//!
//! Post-build steps for a static site with a maps gallery page. An external
//! generator renders the HTML into the output directory; this crate handles
//! everything around it.
//!
//! # Architecture: Sequential Stages
//!
//! ```text
//! 1. Passthrough   misc/            →  _site/                 (CNAME, robots.txt, .nojekyll)
//! 2. HTML minify   _site/**/*.html  →  in place
//! 3. Sass          css/*.scss       →  _site/assets/*.css
//! 4. CSS purge     _site/assets     →  in place               (release builds only)
//! 5. Thumbnails    map_images/      →  _site/maps/*_thumb.avif
//! ```
//!
//! Stages 3-5 are the after-build hook and can be run on their own. Each stage
//! starts only when the previous one has finished; see [`lifecycle`].
//!
//! # The Maps Data Feed
//!
//! `_maps.json` lists the maps by category (`featured`, `collaborations`,
//! `crap`, `ports`). Image files belong to a map by name prefix:
//! `alps_1.avif` and `alps_winter.avif` both belong to `alps`. [`enrich`]
//! attaches each entry's images (plus derived `_thumb` names) so page
//! templates can render the gallery, falling back to a placeholder image for
//! maps that have none yet. The enriched manifest is what `map-gallery maps`
//! prints.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Manifest data model: `MapEntry`, `ImagePair`, `ManifestFile`, `Category` |
//! | [`manifest`] | Manifest loading and image directory listing |
//! | [`naming`] | Prefix matching, `_thumb` names, prefix collisions |
//! | [`enrich`] | Attaching images to entries; `check` report |
//! | [`thumbnails`] | Thumbnail sizing, planning and parallel generation |
//! | [`imaging`] | Pure-Rust image operations: AVIF decode, resize, encode |
//! | [`styles`] | Sass compilation with `grass` |
//! | [`purge`] | Removing CSS rules no page uses |
//! | [`html`] | In-place HTML minification |
//! | [`passthrough`] | Static file copies |
//! | [`lifecycle`] | Stage sequencing and build modes |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Pure-Rust Imaging
//!
//! AVIF sources are decoded with `avif-parse` + `rav1d`, resized with the
//! `image` crate (Lanczos3) and re-encoded with `rav1e`. No ImageMagick, no
//! system libraries: the binary runs anywhere the site is built.

pub mod config;
pub mod enrich;
pub mod html;
pub mod imaging;
pub mod lifecycle;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod passthrough;
pub mod purge;
pub mod styles;
pub mod thumbnails;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Filename conventions shared by enrichment and thumbnail generation.
//!
//! Images belong to a map by prefix: `dust_1.avif` and `dust_night.avif` both
//! belong to the entry named `dust`. There is no separate mapping table, so
//! map names act as globally unique prefixes.
//!
//! ## Thumbnail names
//!
//! Thumbnails sit next to their full-size image with `_thumb` inserted before
//! the extension:
//! - `dust_1.avif` → `dust_1_thumb.avif`
//! - `old.town_2.avif` → `old.town_2_thumb.avif` (split at the *last* dot)
//! - `noext` → `noext_thumb`

/// Whether `filename` belongs to the map called `name` (`name + "_"` prefix).
pub fn matches_entry(filename: &str, name: &str) -> bool {
    filename
        .strip_prefix(name)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// Derive the thumbnail file name for a source image.
pub fn thumb_name(filename: &str) -> String {
    match filename.rfind('.') {
        Some(dot) => format!("{}_thumb{}", &filename[..dot], &filename[dot..]),
        None => format!("{filename}_thumb"),
    }
}

/// Pairs `(shorter, longer)` of map names where images of `longer` would also
/// match `shorter` (e.g. `old` and `old_town`: `old_town_1.avif` starts with
/// `old_`).
///
/// Each colliding pair is reported once. Duplicated names are reported as a
/// pair of equal names.
pub fn find_prefix_collisions<'a, I>(names: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();
    let mut collisions = Vec::new();

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            if a == b || matches_entry(b, a) {
                collisions.push((a.to_string(), b.to_string()));
            } else if matches_entry(a, b) {
                collisions.push((b.to_string(), a.to_string()));
            }
        }
    }

    collisions
}

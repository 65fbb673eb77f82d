//! Maps manifest data model.
//!
//! These types are read from `_maps.json`, enriched in memory, and written
//! back out as JSON for page templates. Keys the tool does not know about are
//! kept in `extra` so templates see everything the manifest author wrote.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A source image and its derived thumbnail, both as bare file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePair {
    pub full: String,
    pub thumb: String,
}

/// One gallery item.
///
/// `name` doubles as the filename prefix of the entry's images
/// (`<name>_<anything>.avif`). `images` is never present in the source
/// manifest; it is filled in by [`crate::enrich`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImagePair>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Accept `"2019"` as well as `2019`.
fn deserialize_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "year must be a string or number, got {other}"
        ))),
    }
}

/// Top-level manifest: four ordered categories of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub featured: Vec<MapEntry>,
    #[serde(default)]
    pub crap: Vec<MapEntry>,
    #[serde(default)]
    pub collaborations: Vec<MapEntry>,
    #[serde(default)]
    pub ports: Vec<MapEntry>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Manifest categories, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Featured,
    Collaborations,
    Crap,
    Ports,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Featured,
        Category::Collaborations,
        Category::Crap,
        Category::Ports,
    ];

    /// The JSON key of this category.
    pub fn key(self) -> &'static str {
        match self {
            Category::Featured => "featured",
            Category::Collaborations => "collaborations",
            Category::Crap => "crap",
            Category::Ports => "ports",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl ManifestFile {
    pub fn entries(&self, category: Category) -> &[MapEntry] {
        match category {
            Category::Featured => &self.featured,
            Category::Collaborations => &self.collaborations,
            Category::Crap => &self.crap,
            Category::Ports => &self.ports,
        }
    }

    pub fn entries_mut(&mut self, category: Category) -> &mut Vec<MapEntry> {
        match category {
            Category::Featured => &mut self.featured,
            Category::Collaborations => &mut self.collaborations,
            Category::Crap => &mut self.crap,
            Category::Ports => &mut self.ports,
        }
    }

    /// Every entry name across all categories, in category order.
    pub fn all_names(&self) -> Vec<&str> {
        Category::ALL
            .iter()
            .flat_map(|c| self.entries(*c))
            .map(|e| e.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_manifest() {
        let json = r#"{
            "featured": [{"name": "alpha", "year": "2020", "description": "First"}],
            "crap": [{"name": "beta", "year": "2012"}],
            "collaborations": [],
            "ports": []
        }"#;
        let manifest: ManifestFile = serde_json::from_str(json).unwrap();

        assert_eq!(manifest.featured.len(), 1);
        assert_eq!(manifest.featured[0].name, "alpha");
        assert_eq!(manifest.featured[0].description.as_deref(), Some("First"));
        assert!(manifest.featured[0].images.is_empty());
        assert_eq!(manifest.crap[0].description, None);
    }

    #[test]
    fn missing_categories_default_to_empty() {
        let manifest: ManifestFile = serde_json::from_str(r#"{"featured": []}"#).unwrap();
        assert!(manifest.crap.is_empty());
        assert!(manifest.collaborations.is_empty());
        assert!(manifest.ports.is_empty());
    }

    #[test]
    fn numeric_year_is_kept_as_text() {
        let entry: MapEntry = serde_json::from_str(r#"{"name": "a", "year": 2016}"#).unwrap();
        assert_eq!(entry.year, "2016");
    }

    #[test]
    fn missing_name_and_year_default_to_empty() {
        let entry: MapEntry = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.year, "");
    }

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let json = r#"{"name": "a", "year": "2019", "download": "a.bsp"}"#;
        let entry: MapEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.extra["download"], "a.bsp");

        let out = serde_json::to_value(&entry).unwrap();
        assert_eq!(out["download"], "a.bsp");
        assert!(out.get("images").is_none());
        assert!(out.get("description").is_none());
    }

    #[test]
    fn entries_accessor_matches_fields() {
        let mut manifest = ManifestFile::default();
        manifest.ports.push(MapEntry {
            name: "p".into(),
            ..MapEntry::default()
        });
        assert_eq!(manifest.entries(Category::Ports).len(), 1);
        assert!(manifest.entries(Category::Featured).is_empty());

        manifest
            .entries_mut(Category::Crap)
            .push(MapEntry::default());
        assert_eq!(manifest.crap.len(), 1);
    }

    #[test]
    fn category_keys() {
        let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, ["featured", "collaborations", "crap", "ports"]);
        assert_eq!(Category::Crap.to_string(), "crap");
    }
}

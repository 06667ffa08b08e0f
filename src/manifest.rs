//! Inter-stage manifests.
//!
//! The pipeline stages communicate through JSON files: discover writes
//! `manifest.json`, process writes `processed/manifest.json`, generate
//! reads the processed one. The manifests are human-readable on purpose:
//! inspecting them is the fastest way to see what a stage actually did.

use crate::config::SiteConfig;
use crate::content::Page;
use crate::data::FestivalData;
use crate::gallery::{DiscoveryReport, GalleryImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output of the discover stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub site: SiteConfig,
    pub gallery: DiscoveryReport,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub data: FestivalData,
}

/// Output of the process stage: the discover manifest with encoded
/// thumbnail and display paths attached to every gallery image.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessedManifest {
    pub site: SiteConfig,
    pub gallery: ProcessedGallery,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub data: FestivalData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProcessedGallery {
    pub images: Vec<ProcessedImage>,
}

/// A gallery image plus its encoded output files.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessedImage {
    #[serde(flatten)]
    pub source: GalleryImage,
    /// Grid thumbnail, relative to the processed directory.
    pub thumbnail: String,
    /// Lightbox display image, relative to the processed directory.
    pub display: String,
}

/// Write a manifest as pretty-printed JSON.
pub fn save<T: Serialize>(value: &T, path: &Path) -> Result<(), ManifestError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a manifest back.
pub fn load<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ManifestError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_image() -> GalleryImage {
        GalleryImage {
            id: "g1.jpg".to_string(),
            source_path: "gallery/g1.jpg".to_string(),
            label: "Photo 1".to_string(),
            category: "Sports".to_string(),
            caption: None,
            dimensions: (1600, 1200),
        }
    }

    #[test]
    fn manifest_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");

        let manifest = Manifest {
            site: SiteConfig::default(),
            gallery: DiscoveryReport {
                images: vec![sample_image()],
                ..Default::default()
            },
            pages: vec![],
            data: FestivalData::default(),
        };

        save(&manifest, &path).unwrap();
        let loaded: Manifest = load(&path).unwrap();
        assert_eq!(loaded.gallery.images.len(), 1);
        assert_eq!(loaded.gallery.images[0].id, "g1.jpg");
    }

    #[test]
    fn processed_image_flattens_source_fields() {
        let processed = ProcessedImage {
            source: sample_image(),
            thumbnail: "gallery/g1-thumb.jpg".to_string(),
            display: "gallery/g1-display.jpg".to_string(),
        };
        let json = serde_json::to_value(&processed).unwrap();
        // Source fields sit alongside the generated paths, not nested
        assert_eq!(json["id"], "g1.jpg");
        assert_eq!(json["thumbnail"], "gallery/g1-thumb.jpg");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result: Result<Manifest, _> = load(&tmp.path().join("nope.json"));
        assert!(matches!(result, Err(ManifestError::Io(_))));
    }
}

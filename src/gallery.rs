//! Gallery image discovery.
//!
//! Stage 1 core of the festsite build pipeline. Determines which files in
//! the gallery directory are real, decodable images and produces the
//! ordered collection the gallery page renders.
//!
//! ## How discovery works
//!
//! The candidate namespace comes from **one directory listing**: the
//! filesystem is the index, so no speculative misses are generated. Each
//! listed candidate is then probed: the probe succeeds iff the file opens
//! and its header decodes as a supported image format. Probes run
//! concurrently on the rayon pool and the run returns only after every
//! probe has settled; there is no early termination and no partial result.
//!
//! Each probe is bounded by construction: only the image header is read
//! (never pixel data), so a single huge or truncated file cannot stall the
//! aggregate.
//!
//! ## Outcome classification
//!
//! A probe settles as one of:
//!
//! - `Found`: header decoded; the candidate becomes a [`GalleryImage`]
//! - `NotFound`: the file vanished between the listing and the probe
//! - `Failed`: the file exists but is not a decodable image
//!
//! Only the `Found` set is exposed as images. `NotFound` and `Failed` are
//! counted in the [`DiscoveryReport`] for CLI output; they are never
//! errors and never reach the generated site.
//!
//! ## Invariants
//!
//! - At most one image per resolved path: candidates aliasing the same
//!   file (symlinks, case variants) are collapsed, first in natural order
//!   wins.
//! - Images are ordered by numeric-aware comparison of their identifier,
//!   so `g2.jpg` precedes `g10.jpg`.
//! - Zero confirmed images is a valid terminal state, not an error; the
//!   gallery page renders an explicit empty state for it.

use crate::config::GalleryConfig;
use crate::metadata;
use crate::naming;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A file surfaced by the directory listing, not yet confirmed as an image.
#[derive(Debug, Clone)]
struct Candidate {
    /// File name including extension ("g1.jpg"); becomes the image id.
    id: String,
    path: PathBuf,
}

/// Outcome of probing one candidate.
#[derive(Debug)]
enum ProbeOutcome {
    Found { dimensions: (u32, u32) },
    NotFound,
    Failed { reason: String },
}

/// A confirmed gallery image.
///
/// Constructed only on a successful probe; immutable thereafter. The
/// process stage later attaches thumbnail and display paths in its own
/// manifest type; this one never changes after discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    /// File name including extension; unique per resolved path.
    pub id: String,
    /// Path relative to the content root (e.g. "gallery/g1.jpg").
    pub source_path: String,
    /// Human-readable label derived from the file stem.
    pub label: String,
    /// Category tag, assigned round-robin from the configured list.
    pub category: String,
    /// Optional sidecar caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Pixel width and height read by the probe.
    pub dimensions: (u32, u32),
}

/// Result of one discovery run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// Confirmed images, deduplicated and in natural order.
    pub images: Vec<GalleryImage>,
    /// Candidates that vanished between the listing and the probe.
    #[serde(default)]
    pub missing: usize,
    /// Candidates collapsed because they resolved to an already-seen path.
    #[serde(default)]
    pub duplicates: usize,
    /// Candidates that exist but failed to decode: (file name, reason).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<(String, String)>,
}

/// Discover gallery images under `content_root`.
///
/// A missing gallery directory is the empty namespace, not an error:
/// the report comes back with no images and the caller renders the
/// empty state.
pub fn discover(
    content_root: &Path,
    config: &GalleryConfig,
) -> Result<DiscoveryReport, DiscoverError> {
    let gallery_dir = content_root.join(&config.dir);
    if !gallery_dir.is_dir() {
        return Ok(DiscoveryReport::default());
    }

    let mut candidates = list_candidates(&gallery_dir, &config.extensions)?;
    candidates.sort_by(|a, b| naming::natural_cmp(&a.id, &b.id));

    // Fork-join over the whole namespace: the collect is the barrier, so
    // nothing is observable until every probe has settled.
    let outcomes: Vec<(Candidate, ProbeOutcome)> = candidates
        .into_par_iter()
        .map(|c| {
            let outcome = probe(&c.path);
            (c, outcome)
        })
        .collect();

    let mut report = DiscoveryReport::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for (candidate, outcome) in outcomes {
        match outcome {
            ProbeOutcome::Found { dimensions } => {
                let resolved = std::fs::canonicalize(&candidate.path)
                    .unwrap_or_else(|_| candidate.path.clone());
                if !seen.insert(resolved) {
                    report.duplicates += 1;
                    continue;
                }
                report.images.push(build_image(
                    &candidate,
                    dimensions,
                    content_root,
                    &config.categories,
                    report.images.len(),
                ));
            }
            ProbeOutcome::NotFound => report.missing += 1,
            ProbeOutcome::Failed { reason } => report.failures.push((candidate.id, reason)),
        }
    }

    Ok(report)
}

/// List the candidate namespace: one `read_dir` of the gallery directory,
/// filtered to the configured extensions (case-insensitive). Hidden files
/// and subdirectories are ignored.
fn list_candidates(dir: &Path, extensions: &[String]) -> io::Result<Vec<Candidate>> {
    let accepted: Vec<String> = extensions.iter().map(|e| e.to_lowercase()).collect();

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if accepted.iter().any(|a| *a == ext) {
            candidates.push(Candidate { id: name, path });
        }
    }
    Ok(candidates)
}

/// Probe one candidate: open the file and decode its image header.
///
/// Never reads pixel data: `into_dimensions` stops at the header, which
/// keeps every probe's completion time bounded.
fn probe(path: &Path) -> ProbeOutcome {
    let reader = match image::ImageReader::open(path) {
        Ok(r) => r,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return ProbeOutcome::NotFound,
        Err(err) => {
            return ProbeOutcome::Failed {
                reason: err.to_string(),
            };
        }
    };
    let reader = match reader.with_guessed_format() {
        Ok(r) => r,
        Err(err) => {
            return ProbeOutcome::Failed {
                reason: err.to_string(),
            };
        }
    };
    match reader.into_dimensions() {
        Ok(dimensions) => ProbeOutcome::Found { dimensions },
        Err(err) => ProbeOutcome::Failed {
            reason: err.to_string(),
        },
    }
}

fn build_image(
    candidate: &Candidate,
    dimensions: (u32, u32),
    content_root: &Path,
    categories: &[String],
    position: usize,
) -> GalleryImage {
    let stem = Path::new(&candidate.id)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| candidate.id.clone());

    let source_path = candidate
        .path
        .strip_prefix(content_root)
        .unwrap_or(&candidate.path)
        .to_string_lossy()
        .to_string();

    let category = if categories.is_empty() {
        String::new()
    } else {
        categories[position % categories.len()].clone()
    };

    GalleryImage {
        id: candidate.id.clone(),
        source_path,
        label: naming::stem_label(&stem),
        category,
        caption: metadata::read_sidecar(&candidate.path),
        dimensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(path: &Path) {
        image::RgbImage::new(4, 3).save(path).unwrap();
    }

    fn write_jpeg(path: &Path) {
        image::RgbImage::new(3, 4).save(path).unwrap();
    }

    fn setup() -> (TempDir, GalleryConfig) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("gallery")).unwrap();
        (tmp, GalleryConfig::default())
    }

    #[test]
    fn missing_directory_is_empty_namespace() {
        let tmp = TempDir::new().unwrap();
        let report = discover(tmp.path(), &GalleryConfig::default()).unwrap();
        assert!(report.images.is_empty());
    }

    #[test]
    fn empty_directory_yields_empty_report() {
        let (tmp, config) = setup();
        let report = discover(tmp.path(), &config).unwrap();
        assert!(report.images.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn single_success_is_single_element() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/g1.png"));

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].id, "g1.png");
        assert_eq!(report.images[0].source_path, "gallery/g1.png");
        assert_eq!(report.images[0].dimensions, (4, 3));
    }

    #[test]
    fn undecodable_candidates_are_dropped_not_errors() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/g1.png"));
        fs::write(tmp.path().join("gallery/g2.jpg"), "not an image").unwrap();

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "g2.jpg");
    }

    #[test]
    fn all_failures_resolve_to_empty_not_error() {
        let (tmp, config) = setup();
        fs::write(tmp.path().join("gallery/a.jpg"), "junk").unwrap();
        fs::write(tmp.path().join("gallery/b.png"), "more junk").unwrap();

        let report = discover(tmp.path(), &config).unwrap();
        assert!(report.images.is_empty());
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn images_in_natural_order() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/g10.png"));
        write_png(&tmp.path().join("gallery/g2.png"));
        write_png(&tmp.path().join("gallery/g1.png"));

        let report = discover(tmp.path(), &config).unwrap();
        let ids: Vec<&str> = report.images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["g1.png", "g2.png", "g10.png"]);
    }

    #[test]
    fn mixed_extension_namespace_end_to_end() {
        // Namespace {g1,g2} x {jpg,png} with only g1.jpg and g2.png present.
        let (tmp, config) = setup();
        write_jpeg(&tmp.path().join("gallery/g1.jpg"));
        write_png(&tmp.path().join("gallery/g2.png"));

        let report = discover(tmp.path(), &config).unwrap();
        let ids: Vec<&str> = report.images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["g1.jpg", "g2.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn aliased_paths_are_collapsed() {
        let (tmp, config) = setup();
        let target = tmp.path().join("gallery/g1.png");
        write_png(&target);
        std::os::unix::fs::symlink(&target, tmp.path().join("gallery/g1-alias.png")).unwrap();

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.duplicates, 1);
        // First in natural order survives
        assert_eq!(report.images[0].id, "g1-alias.png");
    }

    #[test]
    fn non_image_extensions_are_not_candidates() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/g1.png"));
        fs::write(tmp.path().join("gallery/notes.md"), "# notes").unwrap();
        fs::write(tmp.path().join("gallery/g1.txt"), "caption").unwrap();

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.images.len(), 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn hidden_files_are_skipped() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/.hidden.png"));
        write_png(&tmp.path().join("gallery/g1.png"));

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].id, "g1.png");
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/g1.PNG"));

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].id, "g1.PNG");
    }

    #[test]
    fn sidecar_caption_attached() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/g1.png"));
        fs::write(tmp.path().join("gallery/g1.txt"), "Prize ceremony\n").unwrap();

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(
            report.images[0].caption.as_deref(),
            Some("Prize ceremony")
        );
    }

    #[test]
    fn labels_derive_from_stems() {
        let (tmp, config) = setup();
        write_png(&tmp.path().join("gallery/g7.png"));
        write_png(&tmp.path().join("gallery/closing-act.png"));

        let report = discover(tmp.path(), &config).unwrap();
        let labels: Vec<&str> = report.images.iter().map(|i| i.label.as_str()).collect();
        // "closing-act" sorts before "g7"
        assert_eq!(labels, vec!["closing act", "Photo 7"]);
    }

    #[test]
    fn categories_assigned_round_robin() {
        let (tmp, mut config) = setup();
        config.categories = vec!["A".to_string(), "B".to_string()];
        write_png(&tmp.path().join("gallery/g1.png"));
        write_png(&tmp.path().join("gallery/g2.png"));
        write_png(&tmp.path().join("gallery/g3.png"));

        let report = discover(tmp.path(), &config).unwrap();
        let cats: Vec<&str> = report.images.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(cats, vec!["A", "B", "A"]);
    }

    #[test]
    fn empty_category_list_yields_empty_tags() {
        let (tmp, mut config) = setup();
        config.categories.clear();
        write_png(&tmp.path().join("gallery/g1.png"));

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.images[0].category, "");
    }
}

//! Gallery image processing.
//!
//! Stage 2 of the festsite build pipeline. Takes the discover manifest and
//! encodes, for every confirmed gallery image:
//!
//! - a **grid thumbnail** (center-cropped to the configured aspect ratio)
//! - a **lightbox display image** (bounded to the configured long edge)
//!
//! Output mirrors the source layout under the processed directory:
//!
//! ```text
//! processed/
//! ├── manifest.json            # manifest with generated paths attached
//! ├── .festsite-cache.json     # encode cache
//! └── gallery/
//!     ├── g1-thumb.jpg
//!     ├── g1-display.jpg
//!     └── ...
//! ```
//!
//! Images are encoded in parallel on the rayon pool. Each encode is
//! consulted against the content-addressed [`cache`](crate::cache) first;
//! per-image progress is streamed to the caller over an mpsc channel so
//! the CLI can print while encoding continues.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::imaging::{self, ImagingError, THUMBNAIL_SHORT_EDGE};
use crate::manifest::{self, Manifest, ManifestError, ProcessedGallery, ProcessedImage, ProcessedManifest};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("image encoding failed: {0}")]
    Imaging(#[from] ImagingError),
    #[error("source image not found: {0}")]
    SourceNotFound(PathBuf),
}

/// How one output file was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStatus {
    /// Output already on disk with matching content hashes.
    Cached,
    /// Cached under an old path; copied to the new location.
    Copied,
    /// Freshly encoded.
    Encoded,
}

/// Progress event for one processed image.
#[derive(Debug, Clone)]
pub struct ProcessEvent {
    pub id: String,
    pub thumbnail: EncodeStatus,
    pub display: EncodeStatus,
}

/// Result of the process stage.
pub struct ProcessResult {
    pub manifest: ProcessedManifest,
    pub cache_stats: CacheStats,
}

struct ImageJob {
    processed: ProcessedImage,
    source_hash: String,
    thumbnail: EncodeStatus,
    display: EncodeStatus,
}

/// Everything an encode needs besides the image itself. Computed once per
/// run; the two param hashes are the cache keys for the two outputs.
struct EncodeParams {
    aspect: (u32, u32),
    display_width: u32,
    quality: u8,
    thumb_hash: String,
    display_hash: String,
}

/// Run the process stage.
///
/// Reads the discover manifest at `manifest_path`, encodes outputs under
/// `processed_dir`, and returns the processed manifest (the caller writes
/// it). `use_cache = false` forces a full re-encode.
pub fn process(
    manifest_path: &Path,
    source_root: &Path,
    processed_dir: &Path,
    use_cache: bool,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    let input: Manifest = manifest::load(manifest_path)?;

    std::fs::create_dir_all(processed_dir)?;

    let mut cache_manifest = if use_cache {
        CacheManifest::load(processed_dir)
    } else {
        CacheManifest::empty()
    };

    let aspect = (
        input.site.thumbnails.aspect_ratio[0],
        input.site.thumbnails.aspect_ratio[1],
    );
    let quality = input.site.images.quality.min(100);
    let display_width = input.site.images.display_width;

    let params = EncodeParams {
        aspect,
        display_width,
        quality: quality as u8,
        thumb_hash: cache::hash_thumbnail_params(aspect, THUMBNAIL_SHORT_EDGE, quality),
        display_hash: cache::hash_display_params(display_width, quality),
    };

    // Pre-create output subdirectories so workers never race on mkdir
    for image in &input.gallery.images {
        if let Some(parent) = Path::new(&image.source_path).parent() {
            std::fs::create_dir_all(processed_dir.join(parent))?;
        }
    }

    let jobs: Result<Vec<ImageJob>, ProcessError> = input
        .gallery
        .images
        .par_iter()
        .map(|image| {
            let job = process_image(image, source_root, processed_dir, &cache_manifest, &params)?;
            if let Some(tx) = &events {
                // Receiver hung up means the printer is gone; keep encoding
                let _ = tx.send(ProcessEvent {
                    id: image.id.clone(),
                    thumbnail: job.thumbnail,
                    display: job.display,
                });
            }
            Ok(job)
        })
        .collect();
    let jobs = jobs?;

    let mut stats = CacheStats::default();
    let mut images = Vec::with_capacity(jobs.len());
    for job in jobs {
        for (status, path, params_hash) in [
            (job.thumbnail, &job.processed.thumbnail, &params.thumb_hash),
            (job.display, &job.processed.display, &params.display_hash),
        ] {
            match status {
                EncodeStatus::Cached => stats.hits += 1,
                EncodeStatus::Copied => stats.copies += 1,
                EncodeStatus::Encoded => stats.misses += 1,
            }
            cache_manifest.record(path.clone(), job.source_hash.clone(), params_hash.clone());
        }
        images.push(job.processed);
    }

    if use_cache {
        cache_manifest.save(processed_dir)?;
    }

    Ok(ProcessResult {
        manifest: ProcessedManifest {
            site: input.site,
            gallery: ProcessedGallery { images },
            pages: input.pages,
            data: input.data,
        },
        cache_stats: stats,
    })
}

fn process_image(
    image: &crate::gallery::GalleryImage,
    source_root: &Path,
    processed_dir: &Path,
    cache_manifest: &CacheManifest,
    params: &EncodeParams,
) -> Result<ImageJob, ProcessError> {
    let source = source_root.join(&image.source_path);
    if !source.exists() {
        return Err(ProcessError::SourceNotFound(source));
    }

    let source_hash = cache::hash_file(&source)?;
    let (thumb_rel, display_rel) = output_paths(&image.source_path);

    // Decode lazily: a double cache hit never touches the pixels
    let mut decoded: Option<image::DynamicImage> = None;

    let thumbnail = match cache_manifest.lookup(&source_hash, &params.thumb_hash, processed_dir) {
        Some(stored) if stored == thumb_rel => EncodeStatus::Cached,
        Some(stored) => {
            std::fs::copy(processed_dir.join(&stored), processed_dir.join(&thumb_rel))?;
            EncodeStatus::Copied
        }
        None => {
            let img = ensure_decoded(&mut decoded, &source)?;
            imaging::encode_thumbnail(img, &processed_dir.join(&thumb_rel), params.aspect, params.quality)?;
            EncodeStatus::Encoded
        }
    };

    let display = match cache_manifest.lookup(&source_hash, &params.display_hash, processed_dir) {
        Some(stored) if stored == display_rel => EncodeStatus::Cached,
        Some(stored) => {
            std::fs::copy(processed_dir.join(&stored), processed_dir.join(&display_rel))?;
            EncodeStatus::Copied
        }
        None => {
            let img = ensure_decoded(&mut decoded, &source)?;
            imaging::encode_display(img, &processed_dir.join(&display_rel), params.display_width, params.quality)?;
            EncodeStatus::Encoded
        }
    };

    Ok(ImageJob {
        processed: ProcessedImage {
            source: image.clone(),
            thumbnail: thumb_rel,
            display: display_rel,
        },
        source_hash,
        thumbnail,
        display,
    })
}

/// Decode the source on first use; both encodes share the pixels.
fn ensure_decoded<'a>(
    slot: &'a mut Option<image::DynamicImage>,
    source: &Path,
) -> Result<&'a image::DynamicImage, ProcessError> {
    if slot.is_none() {
        *slot = Some(imaging::load(source)?);
    }
    Ok(slot.as_ref().unwrap())
}

/// Output paths for a source image, relative to the processed directory.
///
/// `gallery/g1.jpg` → (`gallery/g1-thumb.jpg`, `gallery/g1-display.jpg`)
fn output_paths(source_path: &str) -> (String, String) {
    let path = Path::new(source_path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| source_path.to_string());
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| format!("{}/", p.to_string_lossy()))
        .unwrap_or_default();
    (
        format!("{dir}{stem}-thumb.jpg"),
        format!("{dir}{stem}-display.jpg"),
    )
}

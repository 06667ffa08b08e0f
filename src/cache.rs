//! Processing cache for incremental builds.
//!
//! Re-encoding every gallery photo on each build is the slow part of the
//! pipeline, and festival galleries grow append-only: photos get added
//! after each event day, old ones never change. The cache lets the
//! process stage skip encodes whose inputs are unchanged.
//!
//! ## Cache keys
//!
//! Lookups are **content-addressed**: the key is the pair of
//! `source_hash` (SHA-256 of the source file bytes) and `params_hash`
//! (SHA-256 of the encoding parameters). Renaming a photo does not bust
//! the cache; only changed pixels or changed encode settings do. When a
//! hit points at an output path that no longer matches (the photo was
//! renamed), the cached file is copied to the new location instead of
//! re-encoded.
//!
//! Content hashing rather than mtime comparison survives `git checkout`,
//! which resets modification times.
//!
//! ## Storage
//!
//! The cache manifest is JSON at `<processed_dir>/.festsite-cache.json`,
//! living next to the processed images so CI can cache the directory as
//! one unit. `--no-cache` loads an empty manifest, forcing a full
//! re-encode.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

const MANIFEST_FILENAME: &str = ".festsite-cache.json";

/// Version of the cache manifest format. Bump to invalidate all existing
/// caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// A single cached output file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk cache manifest mapping output paths to their cache entries.
///
/// Lookups go through a runtime `content_index` mapping
/// `"{source_hash}:{params_hash}"` to the stored output path; it is built
/// at load time and never serialized.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
    #[serde(skip)]
    content_index: HashMap<String, String>,
}

impl CacheManifest {
    /// Empty manifest: first build or `--no-cache`.
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
            content_index: HashMap::new(),
        }
    }

    /// Load from the processed directory. A missing, corrupt, or
    /// wrong-version manifest degrades to empty: the cache is an
    /// optimization, never a build input.
    pub fn load(processed_dir: &Path) -> Self {
        let path = processed_dir.join(MANIFEST_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let mut manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest.content_index = manifest
            .entries
            .iter()
            .map(|(path, entry)| (content_key(&entry.source_hash, &entry.params_hash), path.clone()))
            .collect();
        manifest
    }

    /// Save to the processed directory.
    pub fn save(&self, processed_dir: &Path) -> io::Result<()> {
        let path = processed_dir.join(MANIFEST_FILENAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Look up a cached output by content hashes.
    ///
    /// Returns the stored output path if the entry exists **and** the file
    /// is still on disk. The path may differ from the caller's expected
    /// output (after a rename); the caller copies it over in that case.
    pub fn lookup(
        &self,
        source_hash: &str,
        params_hash: &str,
        processed_dir: &Path,
    ) -> Option<String> {
        let stored = self.content_index.get(&content_key(source_hash, params_hash))?;
        if processed_dir.join(stored).exists() {
            Some(stored.clone())
        } else {
            None
        }
    }

    /// Record a cache entry for an output file.
    ///
    /// If the same content already exists under a different output path,
    /// the stale entry is removed so renames don't accumulate garbage.
    pub fn record(&mut self, output_path: String, source_hash: String, params_hash: String) {
        let key = content_key(&source_hash, &params_hash);
        if let Some(old_path) = self.content_index.get(&key)
            && *old_path != output_path
        {
            self.entries.remove(old_path.as_str());
        }
        self.content_index.insert(key, output_path.clone());
        self.entries.insert(
            output_path,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }
}

fn content_key(source_hash: &str, params_hash: &str) -> String {
    format!("{source_hash}:{params_hash}")
}

/// SHA-256 hash of a file's contents, as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{digest:x}"))
}

/// SHA-256 hash of thumbnail encoding parameters.
pub fn hash_thumbnail_params(aspect: (u32, u32), short_edge: u32, quality: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"thumbnail\0");
    hasher.update(aspect.0.to_le_bytes());
    hasher.update(aspect.1.to_le_bytes());
    hasher.update(short_edge.to_le_bytes());
    hasher.update(quality.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// SHA-256 hash of display encoding parameters.
pub fn hash_display_params(max_edge: u32, quality: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"display\0");
    hasher.update(max_edge.to_le_bytes());
    hasher.update(quality.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Summary of cache performance for one process run.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub hits: u32,
    pub copies: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.copies + self.misses
    }

    pub fn merge(&mut self, other: CacheStats) {
        self.hits += other.hits;
        self.copies += other.copies;
        self.misses += other.misses;
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits == 0 && self.copies == 0 {
            write!(f, "{} encoded", self.misses)
        } else if self.copies == 0 {
            write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(
                f,
                "{} cached, {} copied, {} encoded ({} total)",
                self.hits,
                self.copies,
                self.misses,
                self.total()
            )
        }
    }
}

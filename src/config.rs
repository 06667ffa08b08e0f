//! Site configuration.
//!
//! Handles loading, validating, and merging `config.toml` from the content
//! root. User values are merged over stock defaults, unknown keys are
//! rejected to catch typos early, and the merged result is validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Science Fest"
//! tagline = "A celebration of science on campus"
//! edition = ""              # e.g. "6th Edition"
//! dates = ""                # free-form dates line for the hero
//!
//! [gallery]
//! dir = "gallery"           # discovery namespace, relative to content root
//! extensions = ["jpg", "jpeg", "png", "webp"]
//! categories = ["Tech Talks", "Exhibitions", "Cultural Meet", "Sports"]
//!
//! [thumbnails]
//! aspect_ratio = [4, 3]     # width:height of grid thumbnails
//!
//! [images]
//! display_width = 1600      # longest edge of the lightbox image
//! quality = 85              # JPEG quality (0-100)
//!
//! [colors.light]
//! background = "#ffffff"
//! # ... full scheme, see stock config
//!
//! [processing]
//! max_workers = 4           # omit for auto = CPU cores
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Festival identity shown in the header and hero.
    pub site: SiteInfo,
    /// Gallery discovery settings.
    pub gallery: GalleryConfig,
    /// Thumbnail generation settings.
    pub thumbnails: ThumbnailsConfig,
    /// Lightbox display image settings.
    pub images: ImagesConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 0-100".into(),
            ));
        }
        if self.images.display_width == 0 {
            return Err(ConfigError::Validation(
                "images.display_width must be non-zero".into(),
            ));
        }
        if self.thumbnails.aspect_ratio[0] == 0 || self.thumbnails.aspect_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.aspect_ratio values must be non-zero".into(),
            ));
        }
        if self.gallery.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.extensions must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Festival identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Festival name, shown in the header and page titles.
    pub name: String,
    /// One-line tagline for the hero section.
    pub tagline: String,
    /// Edition string (e.g. "6th Edition"). Empty hides the badge.
    pub edition: String,
    /// Free-form dates line (e.g. "2-5 March 2026"). Empty hides it.
    pub dates: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Science Fest".to_string(),
            tagline: "A celebration of science on campus".to_string(),
            edition: String::new(),
            dates: String::new(),
        }
    }
}

/// Gallery discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Subdirectory of the content root holding the photos.
    pub dir: String,
    /// Accepted file extensions (matched case-insensitively).
    pub extensions: Vec<String>,
    /// Category tags assigned to photos round-robin, in grid order.
    pub categories: Vec<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            dir: "gallery".to_string(),
            extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
            categories: vec![
                "Tech Talks".to_string(),
                "Exhibitions".to_string(),
                "Cultural Meet".to_string(),
                "Sports".to_string(),
            ],
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Aspect ratio as `[width, height]` for grid thumbnail crops.
    pub aspect_ratio: [u32; 2],
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: [4, 3],
        }
    }
}

/// Lightbox display image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Pixel size of the longest edge of the lightbox image.
    pub display_width: u32,
    /// JPEG encoding quality (0 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            display_width: 1600,
            quality: 85,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for probing and encoding.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_workers: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Card/panel background (event cards, table rows, lightbox chrome).
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text (captions, category tags, footer).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Accent color (links, hero gradient, active nav item).
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f4f6f8".to_string(),
            text: "#0f172a".to_string(),
            text_muted: "#64748b".to_string(),
            border: "#e2e8f0".to_string(),
            accent: "#0891b2".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#020617".to_string(),
            surface: "#0f172a".to_string(),
            text: "#e2e8f0".to_string(),
            text_muted: "#94a3b8".to_string(),
            border: "#1e293b".to_string(),
            accent: "#22d3ee".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# festsite Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Festival identity
# ---------------------------------------------------------------------------
[site]
name = "Science Fest"
tagline = "A celebration of science on campus"

# Edition badge shown next to the name. Empty string hides it.
edition = ""

# Free-form dates line for the hero, e.g. "2-5 March 2026".
dates = ""

# ---------------------------------------------------------------------------
# Gallery discovery
# ---------------------------------------------------------------------------
[gallery]
# Subdirectory of the content root that holds festival photos.
dir = "gallery"

# File extensions considered during discovery (case-insensitive).
extensions = ["jpg", "jpeg", "png", "webp"]

# Category tags assigned to photos round-robin, in grid order.
categories = ["Tech Talks", "Exhibitions", "Cultural Meet", "Sports"]

# ---------------------------------------------------------------------------
# Thumbnail generation
# ---------------------------------------------------------------------------
[thumbnails]
# Aspect ratio as [width, height] for grid thumbnail crops.
# Common choices: [1, 1] for square, [4, 3] for landscape.
aspect_ratio = [4, 3]

# ---------------------------------------------------------------------------
# Lightbox display images
# ---------------------------------------------------------------------------
[images]
# Pixel size of the longest edge of the lightbox image.
display_width = 1600

# JPEG encoding quality (0 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f4f6f8"
text = "#0f172a"
text_muted = "#64748b"    # Captions, category tags, footer
border = "#e2e8f0"
accent = "#0891b2"        # Links, hero gradient, active nav item

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#020617"
surface = "#0f172a"
text = "#e2e8f0"
text_muted = "#94a3b8"
border = "#1e293b"
accent = "#22d3ee"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for probing and encoding.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_workers = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn scheme_vars(s: &ColorScheme) -> String {
        format!(
            "    --color-bg: {};\n    --color-surface: {};\n    --color-text: {};\n    --color-text-muted: {};\n    --color-border: {};\n    --color-accent: {};",
            s.background, s.surface, s.text, s.text_muted, s.border, s.accent
        )
    }
    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        scheme_vars(&colors.light),
        scheme_vars(&colors.dark)
            .lines()
            .map(|l| format!("    {l}"))
            .collect::<Vec<_>>()
            .join("\n")
    )
}

//! # festsite
//!
//! A minimal static site generator for campus festival microsites. Your
//! filesystem is the data source: photos dropped into a gallery directory
//! are discovered and verified automatically, rosters and results are TOML
//! tables, and long-form documents are markdown files.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! festsite processes content through three independent stages, each
//! producing a JSON manifest that the next stage consumes:
//!
//! ```text
//! 1. Discover   content/  →  manifest.json    (filesystem → structured data)
//! 2. Process    manifest  →  processed/       (thumbnails + display sizes)
//! 3. Generate   manifest  →  dist/            (final HTML site)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each manifest is human-readable JSON you can inspect.
//! - **Incremental builds**: the process stage caches encodes content-addressed.
//! - **Testability**: process and generate are functions from manifest to
//!   output, so tests can exercise them without re-running discovery.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`gallery`] | Core — lists the gallery directory, probes candidates by decoding image headers, dedups and orders the confirmed set |
//! | [`discover`] | Stage 1 — sequences config, gallery, pages, and data into the manifest |
//! | [`process`] | Stage 2 — parallel thumbnail/display encoding with a content-addressed cache |
//! | [`generate`] | Stage 3 — renders the HTML site with Maud |
//! | [`config`] | `config.toml` loading, defaults, validation, and CSS variable generation |
//! | [`data`] | Festival tables: events, committee, schedule, results (standings are computed) |
//! | [`content`] | Markdown pages: numbered → header nav, unnumbered → footer |
//! | [`manifest`] | Types serialized between stages |
//! | [`naming`] | Natural identifier ordering and the `NNN-name` page convention |
//! | [`metadata`] | Sidecar caption resolution |
//! | [`imaging`] | Pure-Rust resize/crop/JPEG-encode operations |
//! | [`cache`] | Content-addressed encode cache |
//! | [`output`] | CLI output formatting — information-first display of pipeline results |
//!
//! # Design Decisions
//!
//! ## Discovery Is a Directory Listing, Not a Probe Storm
//!
//! The gallery does not assume any particular numbering: the directory is
//! listed once and every listed file is a candidate. What *is* verified is
//! decodability: each candidate's image header must decode, so a stray
//! text file renamed to `.jpg` never reaches the grid. Unreadable
//! candidates are skipped silently (they surface only in CLI output), and
//! zero confirmed photos renders an explicit empty state rather than a
//! blank page.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system:
//!
//! - **Compile-time checking**: malformed HTML is a build error.
//! - **Type-safe**: template variables are Rust expressions.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## Pure-Rust Imaging
//!
//! Thumbnails and display images are produced with the `image` crate
//! (Lanczos3 resampling, JPEG output). No ImageMagick, no FFmpeg, no
//! `apt install`: a committee volunteer can download one binary the night
//! before the festival and it works.
//!
//! ## Standings Are Computed
//!
//! `points.toml` holds per-event results only. The department standings
//! table is derived by summation at generate time, so results and
//! standings cannot disagree, which is the failure mode of every hand-maintained
//! points table.
//!
//! # The Output
//!
//! The generated site is plain HTML, one stylesheet, and one small script
//! for the gallery lightbox (ArrowLeft / ArrowRight / Escape). Drop `dist/`
//! on any file server — no Node, no PHP, no database.

pub mod cache;
pub mod config;
pub mod content;
pub mod data;
pub mod discover;
pub mod gallery;
pub mod generate;
pub mod imaging;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;

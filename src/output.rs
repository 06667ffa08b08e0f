//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric, not file-centric: every entity leads
//! with its positional index and display label, with file paths shown as
//! indented `Source:` context lines. The result reads as a content
//! inventory while still letting users trace each line back to a file.
//!
//! ```text
//! Gallery
//! 001 Photo 1 (1600x1200)
//!     Source: gallery/g1.jpg
//!     Caption: Prize ceremony
//! 002 Photo 2 (1200x1600)
//!     Source: gallery/g2.png
//! 1 candidate skipped (1 unreadable)
//!
//! Pages
//! 001 rule book
//!     Source: rule-book.md
//!
//! Data
//!     Events: 11
//!     Committee: 5 groups, 23 members
//!     Schedule: not yet published
//!     Results: 9 events, 12 departments
//! ```
//!
//! Each stage has a `format_*` function returning `Vec<String>` (pure, no
//! I/O, unit testable) and a `print_*` wrapper that writes to stdout.

use crate::manifest::{Manifest, ProcessedManifest};
use crate::process::{EncodeStatus, ProcessEvent};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{pos:0>3}")
}

fn status_word(status: EncodeStatus) -> &'static str {
    match status {
        EncodeStatus::Cached => "cached",
        EncodeStatus::Copied => "copied",
        EncodeStatus::Encoded => "encoded",
    }
}

// ============================================================================
// Stage 1: Discover output
// ============================================================================

/// Format discover stage output: gallery inventory, pages, data tables.
pub fn format_discover_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Gallery".to_string());
    if manifest.gallery.images.is_empty() {
        lines.push("    no photos discovered".to_string());
    }
    for (i, image) in manifest.gallery.images.iter().enumerate() {
        let (w, h) = image.dimensions;
        lines.push(format!("{} {} ({w}x{h})", format_index(i + 1), image.label));
        lines.push(format!("    Source: {}", image.source_path));
        if let Some(caption) = &image.caption {
            lines.push(format!("    Caption: {caption}"));
        }
    }
    let skipped = skipped_summary(manifest);
    if let Some(line) = skipped {
        lines.push(line);
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            let marker = if page.is_link {
                " (external link)"
            } else if !page.in_nav {
                " (footer)"
            } else {
                ""
            };
            lines.push(format!(
                "{} {}{marker}",
                format_index(i + 1),
                page.nav_title
            ));
        }
    }

    lines.push(String::new());
    lines.push("Data".to_string());
    lines.push(format!("    Events: {}", manifest.data.events.events.len()));
    let members: usize = manifest
        .data
        .committee
        .groups
        .iter()
        .map(|g| g.members.len())
        .sum();
    lines.push(format!(
        "    Committee: {} groups, {} members",
        manifest.data.committee.groups.len(),
        members
    ));
    if manifest.data.schedule.days.is_empty() {
        lines.push("    Schedule: not yet published".to_string());
    } else {
        lines.push(format!(
            "    Schedule: {} days",
            manifest.data.schedule.days.len()
        ));
    }
    lines.push(format!(
        "    Results: {} events, {} departments",
        manifest.data.points.events.len(),
        manifest.data.points.standings().len()
    ));

    lines
}

/// One-line summary of skipped candidates, or `None` when nothing was
/// skipped. Failures stay visible here and nowhere else; the generated
/// site never shows them.
fn skipped_summary(manifest: &Manifest) -> Option<String> {
    let g = &manifest.gallery;
    let total = g.failures.len() + g.missing + g.duplicates;
    if total == 0 {
        return None;
    }
    let mut parts = Vec::new();
    if !g.failures.is_empty() {
        parts.push(format!("{} unreadable", g.failures.len()));
    }
    if g.missing > 0 {
        parts.push(format!("{} vanished", g.missing));
    }
    if g.duplicates > 0 {
        parts.push(format!("{} duplicate", g.duplicates));
    }
    let noun = if total == 1 { "candidate" } else { "candidates" };
    Some(format!("{total} {noun} skipped ({})", parts.join(", ")))
}

pub fn print_discover_output(manifest: &Manifest) {
    for line in format_discover_output(manifest) {
        println!("{line}");
    }
}

// ============================================================================
// Stage 2: Process output
// ============================================================================

/// Format one per-image progress event.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    vec![
        format!("  {}", event.id),
        format!("      thumbnail: {}", status_word(event.thumbnail)),
        format!("      display: {}", status_word(event.display)),
    ]
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format generate stage output: one line per emitted page.
pub fn format_generate_output(manifest: &ProcessedManifest) -> Vec<String> {
    let mut lines = vec![
        "Home -> index.html".to_string(),
        format!(
            "Events -> events.html ({} events)",
            manifest.data.events.events.len()
        ),
        if manifest.data.schedule.days.is_empty() {
            "Schedule -> schedule.html (coming soon)".to_string()
        } else {
            format!(
                "Schedule -> schedule.html ({} days)",
                manifest.data.schedule.days.len()
            )
        },
        if manifest.gallery.images.is_empty() {
            "Gallery -> gallery.html (empty state)".to_string()
        } else {
            format!(
                "Gallery -> gallery.html ({} photos)",
                manifest.gallery.images.len()
            )
        },
        format!(
            "Points Table -> points.html ({} departments)",
            manifest.data.points.standings().len()
        ),
        format!(
            "Committee -> committee.html ({} groups)",
            manifest.data.committee.groups.len()
        ),
    ];

    let generated_pages: Vec<_> = manifest.pages.iter().filter(|p| !p.is_link).collect();
    if !generated_pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in generated_pages.iter().enumerate() {
            lines.push(format!(
                "{} {} -> {}.html",
                format_index(i + 1),
                page.nav_title,
                page.slug
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages",
        6 + generated_pages.len()
    ));
    lines
}

pub fn print_generate_output(manifest: &ProcessedManifest) {
    for line in format_generate_output(manifest) {
        println!("{line}");
    }
}

//! Content pages.
//!
//! Markdown files in the content root become HTML pages:
//!
//! - Numbered files (`NNN-name.md`) appear in the header navigation,
//!   sorted by number; the rule book, grading system, and similar
//!   festival documents live here.
//! - Unnumbered files are generated but only linked from the footer,
//!   which is where the legal pages (privacy policy, terms of service)
//!   belong.
//! - A file whose only content is a URL becomes an external link in the
//!   navigation (registration forms, the university site).

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A page generated from a markdown file in the content root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from the first `# heading` in markdown, or nav_title fallback.
    pub title: String,
    /// Display label in navigation (number stripped, dashes → spaces).
    pub nav_title: String,
    /// URL slug (file stem with the number prefix stripped).
    pub slug: String,
    /// Raw markdown content (or the URL for link pages).
    pub body: String,
    /// Whether this page appears in the header navigation.
    pub in_nav: bool,
    /// Sort key from the number prefix.
    pub sort_key: u32,
    /// If true, body is a URL and this page is an external link.
    pub is_link: bool,
}

/// Parse all markdown files in the content root into pages, in nav order.
pub fn load_pages(root: &Path) -> Result<Vec<Page>, ContentError> {
    let mut md_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();

    md_files.sort();

    let mut pages = Vec::new();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let parsed = naming::parse_page_name(&stem);
        let (in_nav, sort_key) = match parsed.number {
            Some(num) => (true, num),
            None => (false, u32::MAX),
        };

        let content = fs::read_to_string(md_path)?;
        let trimmed = content.trim();

        // A page whose only content is a URL becomes an external link
        let is_link = !trimmed.contains('\n')
            && (trimmed.starts_with("http://") || trimmed.starts_with("https://"));

        let title = if is_link {
            parsed.display_title.clone()
        } else {
            content
                .lines()
                .find(|line| line.starts_with("# "))
                .map(|line| line.trim_start_matches("# ").trim().to_string())
                .unwrap_or_else(|| parsed.display_title.clone())
        };

        pages.push(Page {
            title,
            nav_title: parsed.display_title,
            slug: parsed.slug,
            body: content,
            in_nav,
            sort_key,
            is_link,
        });
    }

    pages.sort_by_key(|p| p.sort_key);
    Ok(pages)
}

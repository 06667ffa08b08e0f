//! HTML site generation.
//!
//! Stage 3 of the festsite build pipeline. Takes the processed manifest and
//! renders the final static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero with festival identity and section cards
//! - **Events** (`/events.html`): event cards grouped by category
//! - **Schedule** (`/schedule.html`): day-by-day timetable
//! - **Gallery** (`/gallery.html`): bento thumbnail grid + full-screen lightbox
//! - **Points** (`/points.html`): computed standings + per-event results
//! - **Committee** (`/committee.html`): roster cards by group
//! - **Markdown pages** (`/{slug}.html`): rule book, legal pages, ...
//!
//! Every list page renders an explicit empty state when its table is empty:
//! a gallery with zero discovered photos says so instead of showing a blank
//! grid, and a missing schedule renders the "coming soon" card.
//!
//! ## Lightbox
//!
//! The gallery grid carries the display-image paths in data attributes; a
//! small static script opens the overlay and drives navigation. The three
//! key bindings are ArrowLeft (previous), ArrowRight (next), and Escape
//! (dismiss), the same protocol the festival site has always had, so they
//! are load-bearing and covered by tests.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time (`static/style.css`,
//! `static/gallery.js`); color custom properties are generated from
//! `config.toml` and prepended to the stylesheet. HTML is generated with
//! [maud](https://maud.lambda.xyz/): type-safe templates, automatic XSS
//! escaping, no template files to ship.

use crate::config::{self, SiteConfig};
use crate::content::Page;
use crate::data::{CommitteeTable, EventsTable, PointsTable, ScheduleTable};
use crate::manifest::{self, ManifestError, ProcessedImage, ProcessedManifest};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const LIGHTBOX_JS: &str = include_str!("../static/gallery.js");

/// Run the generate stage: render all pages and copy images and assets
/// into `output_dir`.
pub fn generate(
    manifest_path: &Path,
    processed_dir: &Path,
    output_dir: &Path,
    source_root: &Path,
) -> Result<(), GenerateError> {
    let m: ProcessedManifest = manifest::load(manifest_path)?;

    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&m.site.colors),
        CSS_STATIC
    );

    fs::create_dir_all(output_dir)?;
    copy_processed_images(processed_dir, output_dir)?;
    copy_assets(source_root, output_dir)?;

    let nav = nav_entries(&m);

    let renders: Vec<(String, Markup)> = vec![
        ("index.html".to_string(), render_home(&m, &nav, &css)),
        ("events.html".to_string(), render_events(&m.site, &m.data.events, &nav, &m.pages, &css)),
        ("schedule.html".to_string(), render_schedule(&m.site, &m.data.schedule, &nav, &m.pages, &css)),
        ("gallery.html".to_string(), render_gallery(&m.site, &m.gallery.images, &nav, &m.pages, &css)),
        ("points.html".to_string(), render_points(&m.site, &m.data.points, &nav, &m.pages, &css)),
        ("committee.html".to_string(), render_committee(&m.site, &m.data.committee, &nav, &m.pages, &css)),
    ];
    for (file, markup) in renders {
        fs::write(output_dir.join(file), markup.into_string())?;
    }

    for page in m.pages.iter().filter(|p| !p.is_link) {
        let markup = render_markdown_page(&m.site, page, &nav, &m.pages, &css);
        fs::write(
            output_dir.join(format!("{}.html", page.slug)),
            markup.into_string(),
        )?;
    }

    Ok(())
}

/// Copy processed gallery images into the output, skipping the manifests.
fn copy_processed_images(processed_dir: &Path, output_dir: &Path) -> std::io::Result<()> {
    if !processed_dir.is_dir() {
        return Ok(());
    }
    for entry in walkdir::WalkDir::new(processed_dir) {
        let entry = entry.map_err(std::io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(processed_dir)
            .expect("walked path is under its root");
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || name.ends_with(".json") {
            continue;
        }
        let dest = output_dir.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Copy `content/assets/` verbatim to `dist/assets/` (favicons, event
/// card images, committee portraits).
fn copy_assets(source_root: &Path, output_dir: &Path) -> std::io::Result<()> {
    let assets = source_root.join("assets");
    if !assets.is_dir() {
        return Ok(());
    }
    for entry in walkdir::WalkDir::new(&assets) {
        let entry = entry.map_err(std::io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(source_root)
            .expect("walked path is under its root");
        let dest = output_dir.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

// ============================================================================
// Navigation
// ============================================================================

/// One header navigation entry.
#[derive(Debug, Clone)]
pub struct NavEntry {
    pub title: String,
    pub href: String,
    /// Slug used for current-page highlighting; empty for external links.
    pub slug: String,
    pub external: bool,
}

/// Fixed sections first, then numbered markdown pages in prefix order.
pub fn nav_entries(m: &ProcessedManifest) -> Vec<NavEntry> {
    let fixed = [
        ("Home", "/", "home"),
        ("Events", "/events.html", "events"),
        ("Schedule", "/schedule.html", "schedule"),
        ("Gallery", "/gallery.html", "gallery"),
        ("Points Table", "/points.html", "points"),
        ("Committee", "/committee.html", "committee"),
    ];
    let mut entries: Vec<NavEntry> = fixed
        .iter()
        .map(|(title, href, slug)| NavEntry {
            title: (*title).to_string(),
            href: (*href).to_string(),
            slug: (*slug).to_string(),
            external: false,
        })
        .collect();

    for page in m.pages.iter().filter(|p| p.in_nav) {
        if page.is_link {
            entries.push(NavEntry {
                title: page.nav_title.clone(),
                href: page.body.trim().to_string(),
                slug: String::new(),
                external: true,
            });
        } else {
            entries.push(NavEntry {
                title: page.nav_title.clone(),
                href: format!("/{}.html", page.slug),
                slug: page.slug.clone(),
                external: false,
            });
        }
    }
    entries
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(title: &str, description: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(description);
                title { (title) }
                // CSS is build-generated, never user content; escaping would
                // mangle quoted font names
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with the festival name and navigation.
fn site_header(site: &SiteConfig, nav: &[NavEntry], current: &str) -> Markup {
    html! {
        header.site-header {
            a.site-name href="/" {
                (site.site.name)
                @if !site.site.edition.is_empty() {
                    " " span.edition-badge { (site.site.edition) }
                }
            }
            input.nav-toggle type="checkbox" id="nav-toggle";
            label.nav-hamburger for="nav-toggle" aria-label="Menu" {
                span.hamburger-line {}
                span.hamburger-line {}
                span.hamburger-line {}
            }
            nav.site-nav {
                ul {
                    @for entry in nav {
                        @let is_current = !entry.slug.is_empty() && entry.slug == current;
                        li class=[is_current.then_some("current")] {
                            @if entry.external {
                                a href=(entry.href) target="_blank" rel="noopener" { (entry.title) }
                            } @else {
                                a href=(entry.href) { (entry.title) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the footer: copyright plus links to the unnumbered pages.
fn site_footer(site: &SiteConfig, pages: &[Page]) -> Markup {
    html! {
        footer.site-footer {
            span { (site.site.name) }
            @for page in pages.iter().filter(|p| !p.in_nav && !p.is_link) {
                a href={ "/" (page.slug) ".html" } { (page.title) }
            }
        }
    }
}

/// Standard page scaffold: header, one main section, footer.
fn page_shell(
    site: &SiteConfig,
    nav: &[NavEntry],
    pages: &[Page],
    current: &str,
    heading: &str,
    lede: Option<&str>,
    body: Markup,
) -> Markup {
    html! {
        (site_header(site, nav, current))
        main {
            section.page-hero {
                h1 { (heading) }
                @if let Some(text) = lede {
                    p.lede { (text) }
                }
            }
            (body)
        }
        (site_footer(site, pages))
    }
}

/// Shared empty-state card. Every list page goes through this so "nothing
/// to show" always renders as a deliberate state, never a blank area.
fn empty_state(message: &str) -> Markup {
    html! {
        div.empty-state {
            p { (message) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(m: &ProcessedManifest, nav: &[NavEntry], css: &str) -> Markup {
    let site = &m.site;
    let photo_count = m.gallery.images.len();
    let event_count = m.data.events.events.len();

    let content = html! {
        (site_header(site, nav, "home"))
        main {
            section.hero {
                @if !site.site.edition.is_empty() {
                    p.hero-edition { (site.site.edition) }
                }
                h1.hero-title { (site.site.name) }
                p.hero-tagline { (site.site.tagline) }
                @if !site.site.dates.is_empty() {
                    p.hero-dates { (site.site.dates) }
                }
            }
            section.section-cards {
                a.section-card href="/events.html" {
                    h2 { "Events" }
                    @if event_count > 0 {
                        p { (event_count) " events across the festival" }
                    } @else {
                        p { "The event roster is being finalised" }
                    }
                }
                a.section-card href="/schedule.html" {
                    h2 { "Schedule" }
                    p { "When and where everything happens" }
                }
                a.section-card href="/gallery.html" {
                    h2 { "Gallery" }
                    @if photo_count > 0 {
                        p { (photo_count) " moments captured so far" }
                    } @else {
                        p { "Photos land here during the festival" }
                    }
                }
            }
        }
        (site_footer(site, &m.pages))
    };

    base_document(&site.site.name, &site.site.tagline, css, content)
}

fn render_events(
    site: &SiteConfig,
    events: &EventsTable,
    nav: &[NavEntry],
    pages: &[Page],
    css: &str,
) -> Markup {
    // Group by category, preserving first-appearance order
    let mut categories: Vec<&str> = Vec::new();
    for event in &events.events {
        if !categories.contains(&event.category.as_str()) {
            categories.push(&event.category);
        }
    }

    let body = html! {
        @if events.events.is_empty() {
            (empty_state("The event roster has not been announced yet."))
        } @else {
            @for category in &categories {
                section.event-category {
                    h2 { (category) }
                    div.event-grid {
                        @for event in events.events.iter().filter(|e| e.category == *category) {
                            div.event-card {
                                @if let Some(image) = &event.image {
                                    img src={ "/" (image) } alt=(event.name) loading="lazy";
                                }
                                h3 { (event.name) }
                                @if let Some(desc) = &event.description {
                                    p { (desc) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    let content = page_shell(
        site,
        nav,
        pages,
        "events",
        "Events",
        Some("Compete, play, and represent your department"),
        body,
    );
    base_document(
        &format!("Events - {}", site.site.name),
        &site.site.tagline,
        css,
        content,
    )
}

fn render_schedule(
    site: &SiteConfig,
    schedule: &ScheduleTable,
    nav: &[NavEntry],
    pages: &[Page],
    css: &str,
) -> Markup {
    let body = html! {
        @if schedule.days.is_empty() {
            (empty_state("The schedule is coming soon. Check back closer to the festival."))
        } @else {
            @for day in &schedule.days {
                section.schedule-day {
                    h2 {
                        (day.title)
                        @if let Some(date) = &day.date {
                            " " span.day-date { (date) }
                        }
                    }
                    table.schedule-table {
                        tbody {
                            @for slot in &day.slots {
                                tr {
                                    td.slot-time { (slot.time) }
                                    td { (slot.event) }
                                    td.slot-venue {
                                        @if let Some(venue) = &slot.venue { (venue) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    let content = page_shell(
        site,
        nav,
        pages,
        "schedule",
        "Schedule",
        None,
        body,
    );
    base_document(
        &format!("Schedule - {}", site.site.name),
        &site.site.tagline,
        css,
        content,
    )
}

/// Bento pattern: every third tile is a large square, the rest are wide.
fn bento_class(index: usize) -> &'static str {
    if index % 3 == 0 { "large" } else { "wide" }
}

fn render_gallery(
    site: &SiteConfig,
    images: &[ProcessedImage],
    nav: &[NavEntry],
    pages: &[Page],
    css: &str,
) -> Markup {
    let total = images.len();

    let body = html! {
        @if images.is_empty() {
            (empty_state("No photos yet. The gallery fills up as the festival happens."))
        } @else {
            div.gallery-grid {
                @for (index, image) in images.iter().enumerate() {
                    button.gallery-item.(bento_class(index))
                        type="button"
                        data-index=(index)
                        data-display={ "/" (image.display) }
                        data-label=(image.source.label)
                        data-caption=[image.source.caption.as_deref()]
                    {
                        img src={ "/" (image.thumbnail) } alt=(image.source.label) loading="lazy";
                        span.item-overlay {
                            span.item-label { (image.source.label) }
                            span.item-category { (image.source.category) }
                        }
                    }
                }
            }
            div #lightbox .lightbox hidden {
                button.lightbox-close type="button" aria-label="Close" { "\u{00d7}" }
                button.lightbox-prev type="button" aria-label="Previous image" { "\u{2039}" }
                button.lightbox-next type="button" aria-label="Next image" { "\u{203a}" }
                figure {
                    img.lightbox-image src="" alt="";
                    figcaption {
                        span.lightbox-caption {}
                        span.lightbox-counter data-total=(total) {}
                    }
                }
            }
            script { (PreEscaped(LIGHTBOX_JS)) }
        }
    };

    let content = page_shell(
        site,
        nav,
        pages,
        "gallery",
        "Gallery",
        Some("A visual journey through the festival"),
        body,
    );
    base_document(
        &format!("Gallery - {}", site.site.name),
        &site.site.tagline,
        css,
        content,
    )
}

fn render_points(
    site: &SiteConfig,
    points: &PointsTable,
    nav: &[NavEntry],
    pages: &[Page],
    css: &str,
) -> Markup {
    let standings = points.standings();

    let body = html! {
        @if points.events.is_empty() {
            (empty_state("No results yet. Standings appear after the first event concludes."))
        } @else {
            section.standings {
                h2 { "Department Standings" }
                table.points-table {
                    thead {
                        tr { th { "Rank" } th { "Department" } th { "Points" } }
                    }
                    tbody {
                        @for (index, standing) in standings.iter().enumerate() {
                            tr {
                                td.rank { (index + 1) }
                                td { (standing.department) }
                                td.points { (standing.points) }
                            }
                        }
                    }
                }
            }
            section.event-results {
                h2 { "Event Results" }
                @for event in &points.events {
                    article.event-result {
                        h3 {
                            (event.name)
                            @if let Some(category) = &event.category {
                                " " span.result-category { (category) }
                            }
                        }
                        table.results-table {
                            tbody {
                                @for placement in &event.results {
                                    tr {
                                        td.position { (placement.position) }
                                        td { (placement.players) }
                                        td.department { (placement.department) }
                                        td.points { (placement.points) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    let content = page_shell(
        site,
        nav,
        pages,
        "points",
        "Points Table",
        Some("Standings are computed from event results"),
        body,
    );
    base_document(
        &format!("Points Table - {}", site.site.name),
        &site.site.tagline,
        css,
        content,
    )
}

fn render_committee(
    site: &SiteConfig,
    committee: &CommitteeTable,
    nav: &[NavEntry],
    pages: &[Page],
    css: &str,
) -> Markup {
    let body = html! {
        @if committee.groups.is_empty() {
            (empty_state("The organising committee will be announced soon."))
        } @else {
            @for group in &committee.groups {
                section.committee-group {
                    h2 { (group.title) }
                    div.member-grid {
                        @for member in &group.members {
                            div.member-card {
                                @if let Some(photo) = &member.photo {
                                    img src={ "/" (photo) } alt=(member.name) loading="lazy";
                                } @else {
                                    div.member-placeholder {
                                        (member.name.chars().next().unwrap_or('?'))
                                    }
                                }
                                h3 { (member.name) }
                                p.member-role { (member.role) }
                            }
                        }
                    }
                }
            }
        }
    };

    let content = page_shell(
        site,
        nav,
        pages,
        "committee",
        "Committee",
        Some("The people who make the festival happen"),
        body,
    );
    base_document(
        &format!("Committee - {}", site.site.name),
        &site.site.tagline,
        css,
        content,
    )
}

fn render_markdown_page(
    site: &SiteConfig,
    page: &Page,
    nav: &[NavEntry],
    pages: &[Page],
    css: &str,
) -> Markup {
    let parser = Parser::new(&page.body);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);

    let content = html! {
        (site_header(site, nav, &page.slug))
        main {
            article.page-content {
                (PreEscaped(body_html))
            }
        }
        (site_footer(site, pages))
    };

    base_document(
        &format!("{} - {}", page.title, site.site.name),
        &site.site.tagline,
        css,
        content,
    )
}

// ============================================================================
// Tests
// ============================================================================

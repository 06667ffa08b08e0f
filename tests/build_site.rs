//! Full-pipeline integration tests: discover → process → generate over a
//! real content tree in a temp directory, asserting on the emitted HTML.

use festsite::{discover, generate, manifest, process};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct BuiltSite {
    _tmp: TempDir,
    dist: PathBuf,
}

fn write_png(path: &Path, w: u32, h: u32) {
    image::RgbImage::new(w, h).save(path).unwrap();
}

fn build(populate: impl FnOnce(&Path)) -> BuiltSite {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    fs::create_dir_all(content.join("gallery")).unwrap();
    populate(&content);

    let temp_dir = tmp.path().join(".festsite-temp");
    let processed_dir = temp_dir.join("processed");
    let dist = tmp.path().join("dist");
    fs::create_dir_all(&temp_dir).unwrap();

    let m = discover::discover(&content).unwrap();
    let manifest_path = temp_dir.join("manifest.json");
    manifest::save(&m, &manifest_path).unwrap();

    let result = process::process(&manifest_path, &content, &processed_dir, true, None).unwrap();
    let processed_manifest_path = processed_dir.join("manifest.json");
    manifest::save(&result.manifest, &processed_manifest_path).unwrap();

    generate::generate(&processed_manifest_path, &processed_dir, &dist, &content).unwrap();

    BuiltSite { _tmp: tmp, dist }
}

fn read(site: &BuiltSite, file: &str) -> String {
    fs::read_to_string(site.dist.join(file)).unwrap()
}

#[test]
fn mixed_namespace_builds_ordered_gallery() {
    // Namespace {g1,g2} x {jpg,png}; only g1.jpg and g2.png exist.
    let site = build(|content| {
        write_png(&content.join("gallery/g2.png"), 640, 480);
        image::RgbImage::new(480, 640)
            .save(content.join("gallery/g1.jpg"))
            .unwrap();
    });

    let gallery = read(&site, "gallery.html");
    let g1 = gallery.find("/gallery/g1-thumb.jpg").unwrap();
    let g2 = gallery.find("/gallery/g2-thumb.jpg").unwrap();
    assert!(g1 < g2, "g1.jpg renders before g2.png");

    // The processed files were copied into dist
    assert!(site.dist.join("gallery/g1-thumb.jpg").exists());
    assert!(site.dist.join("gallery/g1-display.jpg").exists());
    assert!(site.dist.join("gallery/g2-display.jpg").exists());
    // Intermediate manifests stay out of the published site
    assert!(!site.dist.join("gallery/manifest.json").exists());
    assert!(!site.dist.join("manifest.json").exists());
}

#[test]
fn gallery_page_preserves_keyboard_protocol() {
    let site = build(|content| {
        write_png(&content.join("gallery/g1.png"), 640, 480);
    });

    let gallery = read(&site, "gallery.html");
    assert!(gallery.contains("ArrowLeft"));
    assert!(gallery.contains("ArrowRight"));
    assert!(gallery.contains("Escape"));
}

#[test]
fn empty_gallery_builds_explicit_empty_state() {
    let site = build(|_| {});

    let gallery = read(&site, "gallery.html");
    assert!(gallery.contains("empty-state"));
    assert!(gallery.contains("No photos yet"));
}

#[test]
fn unreadable_candidates_never_reach_the_site() {
    let site = build(|content| {
        write_png(&content.join("gallery/g1.png"), 640, 480);
        fs::write(content.join("gallery/g2.jpg"), "not an image").unwrap();
    });

    let gallery = read(&site, "gallery.html");
    assert!(gallery.contains("g1-thumb.jpg"));
    assert!(!gallery.contains("g2-thumb.jpg"));
    assert!(!gallery.contains("not an image"));
}

#[test]
fn all_fixed_pages_are_emitted() {
    let site = build(|_| {});

    for file in [
        "index.html",
        "events.html",
        "schedule.html",
        "gallery.html",
        "points.html",
        "committee.html",
    ] {
        assert!(site.dist.join(file).exists(), "missing {file}");
    }
}

#[test]
fn data_tables_flow_into_pages() {
    let site = build(|content| {
        fs::write(
            content.join("config.toml"),
            "[site]\nname = \"SCIENTIA\"\nedition = \"6th Edition\"\n",
        )
        .unwrap();
        fs::write(
            content.join("events.toml"),
            r#"
[[event]]
name = "Table Tennis"
category = "Indoor Sports"
"#,
        )
        .unwrap();
        fs::write(
            content.join("points.toml"),
            r#"
[[event]]
name = "Table Tennis"

[[event.result]]
position = "1st"
players = "G. Dutta"
department = "Chemistry"
points = 10

[[event.result]]
position = "2nd"
players = "S. Biswas"
department = "Computer Science"
points = 7
"#,
        )
        .unwrap();
    });

    let index = read(&site, "index.html");
    assert!(index.contains("SCIENTIA"));
    assert!(index.contains("6th Edition"));

    let events = read(&site, "events.html");
    assert!(events.contains("Table Tennis"));
    assert!(events.contains("Indoor Sports"));

    let points = read(&site, "points.html");
    let chem = points.find("Chemistry").unwrap();
    let cs = points.find("Computer Science").unwrap();
    assert!(chem < cs, "standings ranked by computed total");
}

#[test]
fn markdown_pages_and_footer_links() {
    let site = build(|content| {
        fs::write(
            content.join("010-rule-book.md"),
            "# Festival Rule Book\n\nPlay **fair**.",
        )
        .unwrap();
        fs::write(
            content.join("privacy-policy.md"),
            "# Privacy Policy\n\nNothing is collected.",
        )
        .unwrap();
    });

    let rule_book = read(&site, "rule-book.html");
    assert!(rule_book.contains("<strong>fair</strong>"));

    // Numbered page in the header nav, unnumbered only in the footer
    let index = read(&site, "index.html");
    assert!(index.contains("/rule-book.html"));
    assert!(index.contains("/privacy-policy.html"));

    let privacy = read(&site, "privacy-policy.html");
    assert!(privacy.contains("Nothing is collected."));
}

#[test]
fn assets_copied_verbatim() {
    let site = build(|content| {
        fs::create_dir_all(content.join("assets/team")).unwrap();
        fs::write(content.join("assets/team/vc.jpg"), "portrait bytes").unwrap();
    });

    assert_eq!(
        fs::read_to_string(site.dist.join("assets/team/vc.jpg")).unwrap(),
        "portrait bytes"
    );
}

#[test]
fn sidecar_captions_reach_the_lightbox_data() {
    let site = build(|content| {
        write_png(&content.join("gallery/g1.png"), 640, 480);
        fs::write(content.join("gallery/g1.txt"), "Prize ceremony").unwrap();
    });

    let gallery = read(&site, "gallery.html");
    assert!(gallery.contains(r#"data-caption="Prize ceremony""#));
}

#[test]
fn rebuild_hits_cache_and_output_is_stable() {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    fs::create_dir_all(content.join("gallery")).unwrap();
    write_png(&content.join("gallery/g1.png"), 640, 480);

    let temp_dir = tmp.path().join(".festsite-temp");
    let processed_dir = temp_dir.join("processed");
    fs::create_dir_all(&temp_dir).unwrap();
    let manifest_path = temp_dir.join("manifest.json");

    let m = discover::discover(&content).unwrap();
    manifest::save(&m, &manifest_path).unwrap();

    let first = process::process(&manifest_path, &content, &processed_dir, true, None).unwrap();
    assert_eq!(first.cache_stats.misses, 2);

    let second = process::process(&manifest_path, &content, &processed_dir, true, None).unwrap();
    assert_eq!(second.cache_stats.hits, 2);
    assert_eq!(second.cache_stats.misses, 0);
}

//! Identifier ordering and filename conventions.
//!
//! Two naming concerns live here:
//!
//! - **Gallery identifiers** are free-form file names ("g1.jpg",
//!   "dsc-0042.png"). They are ordered with a numeric-aware comparison so
//!   that "g2" sorts before "g10"; plain lexical order would interleave
//!   them and shuffle the gallery grid between builds.
//! - **Page names** follow the `NNN-name` convention: a numeric prefix puts
//!   the page in the header navigation and fixes its position; the prefix
//!   is stripped from the slug. Dashes in the name portion become spaces
//!   for display.

use std::cmp::Ordering;

/// A run of digits or a run of other characters within an identifier.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let is_digit = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        out.push(if is_digit {
            Segment::Digits(run)
        } else {
            Segment::Text(run)
        });
        rest = tail;
    }
    out
}

/// Compare two digit runs by numeric value without parsing.
///
/// Leading zeros are stripped; a longer stripped run is the larger number,
/// equal-length runs compare lexically. Raw lengths break ties so "007" and
/// "7" stay distinguishable and the ordering stays total.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let (sa, sb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    sa.len()
        .cmp(&sb.len())
        .then_with(|| sa.cmp(sb))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Numeric-aware ascending comparison of identifier strings.
///
/// Identifiers are split into digit and non-digit runs; digit runs compare
/// by numeric value, other runs lexically. "g2.jpg" sorts before "g10.jpg".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (sa, sb) = (segments(a), segments(b));
    for (x, y) in sa.iter().zip(sb.iter()) {
        let ord = match (x, y) {
            (Segment::Digits(x), Segment::Digits(y)) => cmp_digits(x, y),
            (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
            (Segment::Digits(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    sa.len().cmp(&sb.len()).then_with(|| a.cmp(b))
}

/// Derive a display label from a gallery file stem.
///
/// - `"g12"` → "Photo 12" (prefix + counter: the number is the identity)
/// - `"opening-night"` → "opening night"
/// - `"dsc_0042"` → "dsc 0042" (mixed names are humanized, not renumbered)
pub fn stem_label(stem: &str) -> String {
    let segs = segments(stem);
    if let [Segment::Text(prefix), Segment::Digits(n)] = segs.as_slice()
        && prefix.chars().all(|c| c.is_ascii_alphabetic())
    {
        let trimmed = n.trim_start_matches('0');
        let shown = if trimmed.is_empty() { "0" } else { trimmed };
        return format!("Photo {shown}");
    }
    stem.replace(['-', '_'], " ")
}

/// Result of parsing a page file stem like `010-rule-book`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPageName {
    /// Number prefix if present (e.g. `10` from `010-rule-book`).
    pub number: Option<u32>,
    /// Slug: the name after `NNN-`, or the full stem when unnumbered.
    pub slug: String,
    /// Display title: slug with dashes converted to spaces.
    pub display_title: String,
}

/// Parse a page stem following the `NNN-name` convention.
///
/// - `"010-rule-book"` → number=Some(10), slug="rule-book", title="rule book"
/// - `"privacy-policy"` → number=None, slug="privacy-policy"
pub fn parse_page_name(stem: &str) -> ParsedPageName {
    if let Some(dash) = stem.find('-')
        && let Ok(num) = stem[..dash].parse::<u32>()
    {
        let slug = &stem[dash + 1..];
        return ParsedPageName {
            number: Some(num),
            slug: slug.to_string(),
            display_title: slug.replace('-', " "),
        };
    }
    ParsedPageName {
        number: None,
        slug: stem.to_string(),
        display_title: stem.replace('-', " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_orders_numbers_by_value() {
        assert_eq!(natural_cmp("g2", "g10"), Ordering::Less);
        assert_eq!(natural_cmp("g10", "g2"), Ordering::Greater);
    }

    #[test]
    fn natural_equal_strings() {
        assert_eq!(natural_cmp("g1.jpg", "g1.jpg"), Ordering::Equal);
    }

    #[test]
    fn natural_orders_across_extensions() {
        assert_eq!(natural_cmp("g1.jpg", "g2.png"), Ordering::Less);
    }

    #[test]
    fn natural_compares_text_lexically() {
        assert_eq!(natural_cmp("alpha", "beta"), Ordering::Less);
    }

    #[test]
    fn natural_handles_leading_zeros() {
        assert_eq!(natural_cmp("g007", "g8"), Ordering::Less);
        assert_eq!(natural_cmp("g007", "g7"), Ordering::Greater);
        assert_eq!(natural_cmp("g7", "g007"), Ordering::Less);
    }

    #[test]
    fn natural_shorter_prefix_first() {
        assert_eq!(natural_cmp("g1", "g1b"), Ordering::Less);
    }

    #[test]
    fn natural_digits_sort_before_text() {
        assert_eq!(natural_cmp("1a", "aa"), Ordering::Less);
    }

    #[test]
    fn natural_huge_numbers_do_not_overflow() {
        let a = "g123456789012345678901234567890123456789012";
        let b = "g99";
        assert_eq!(natural_cmp(b, a), Ordering::Less);
    }

    #[test]
    fn sorting_a_namespace() {
        let mut ids = vec!["g10.jpg", "g2.png", "g1.jpg", "g21.jpg"];
        ids.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(ids, vec!["g1.jpg", "g2.png", "g10.jpg", "g21.jpg"]);
    }

    #[test]
    fn label_from_prefixed_number() {
        assert_eq!(stem_label("g12"), "Photo 12");
    }

    #[test]
    fn label_strips_leading_zeros() {
        assert_eq!(stem_label("img007"), "Photo 7");
    }

    #[test]
    fn label_humanizes_plain_names() {
        assert_eq!(stem_label("opening-night"), "opening night");
        assert_eq!(stem_label("dsc_0042"), "dsc 0042");
    }

    #[test]
    fn page_name_numbered() {
        let p = parse_page_name("010-rule-book");
        assert_eq!(p.number, Some(10));
        assert_eq!(p.slug, "rule-book");
        assert_eq!(p.display_title, "rule book");
    }

    #[test]
    fn page_name_unnumbered() {
        let p = parse_page_name("privacy-policy");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "privacy-policy");
        assert_eq!(p.display_title, "privacy policy");
    }

    #[test]
    fn page_name_number_only_prefix_requires_dash() {
        let p = parse_page_name("2026");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "2026");
    }
}

// src/parser/mod.rs

//! HTML extractors for portal pages.
//!
//! Every extractor is pure and total: missing or malformed structure yields
//! `None` or an empty collection, never an error.

mod course_page;
mod courses;
mod files;
mod groups;
mod scores;

pub use course_page::extract_course_urls;
pub use courses::parse_courses;
pub use files::parse_files;
pub use groups::parse_groups;
pub use scores::parse_scores;

use scraper::{ElementRef, Selector};

/// Compile a selector literal.
///
/// Only used for the fixed selectors below; each is exercised by the tests of
/// its extractor.
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

/// Concatenated text of an element with each text node trimmed.
fn text_of(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Text nodes of an element, trimmed, non-empty, joined by `sep`.
fn text_joined(element: ElementRef<'_>, sep: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Whether an element carries `class` among its classes.
fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Non-empty `href` attribute of an anchor.
fn href_of(element: ElementRef<'_>) -> Option<&str> {
    element
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

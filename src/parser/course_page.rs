// src/parser/course_page.rs

//! Course landing page: navigation tabs and syllabus download link.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::{href_of, selector};
use crate::models::{SubpageKind, SubpageUrls};
use crate::utils::resolve_url;

static TAB_LINKS: LazyLock<Selector> = LazyLock::new(|| selector("#course_tabs a[href]"));
static SYLLABUS_FILE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[href*="courseSilabusFile"]"#));

/// Classify a tab href by substring, first match wins.
fn classify_tab(href: &str) -> Option<SubpageKind> {
    const RULES: [(&str, SubpageKind); 4] = [
        ("silabus", SubpageKind::Syllabus),
        ("groups", SubpageKind::Groups),
        ("scores", SubpageKind::Scores),
        ("files", SubpageKind::Files),
    ];
    RULES
        .iter()
        .find(|(needle, _)| href.contains(*needle))
        .map(|(_, kind)| *kind)
}

/// Collect absolute subpage URLs from a course landing page.
///
/// Later tabs of the same kind replace earlier ones.
pub fn extract_course_urls(html: &str, base: &Url) -> SubpageUrls {
    let document = Html::parse_document(html);
    let mut urls = SubpageUrls::new();

    for link in document.select(&TAB_LINKS) {
        let Some(href) = href_of(link) else { continue };
        if let Some((kind, url)) = classify_tab(href).zip(resolve_url(base, href)) {
            urls.insert(kind, url);
        }
    }

    if let Some(href) = document
        .select(&SYLLABUS_FILE_LINK)
        .next()
        .and_then(href_of)
        .and_then(|href| resolve_url(base, href))
    {
        urls.insert(SubpageKind::SyllabusFile, href);
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://portal.example.edu/en/student/me/courses").unwrap()
    }

    const LANDING: &str = r#"
        <html><body>
        <ul id="course_tabs">
          <li><a href="/en/student/me/course/silabus/42">Syllabus</a></li>
          <li><a href="/en/student/me/course/groups/42">Groups</a></li>
          <li><a href="/en/student/me/course/scores/42">Scores</a></li>
          <li><a href="/en/student/me/course/files/42">Files</a></li>
          <li><a href="/en/student/me/course/forum/42">Forum</a></li>
        </ul>
        <a href="/en/student/me/courseSilabusFile/42">Download syllabus</a>
        <a href="/en/student/me/course/scores/99">Outside tabs</a>
        </body></html>"#;

    #[test]
    fn extracts_all_tabs() {
        let urls = extract_course_urls(LANDING, &base());
        assert_eq!(urls.len(), 5);
        assert_eq!(
            urls[&SubpageKind::Syllabus],
            "https://portal.example.edu/en/student/me/course/silabus/42"
        );
        assert_eq!(
            urls[&SubpageKind::Scores],
            "https://portal.example.edu/en/student/me/course/scores/42"
        );
        assert_eq!(
            urls[&SubpageKind::SyllabusFile],
            "https://portal.example.edu/en/student/me/courseSilabusFile/42"
        );
    }

    #[test]
    fn classification_is_ordered() {
        assert_eq!(classify_tab("/silabus/files"), Some(SubpageKind::Syllabus));
        assert_eq!(classify_tab("/groups?scores=1"), Some(SubpageKind::Groups));
        assert_eq!(classify_tab("/courseSilabusFile/1"), None);
        assert_eq!(classify_tab("/forum"), None);
    }

    #[test]
    fn page_without_tabs_is_empty() {
        assert!(extract_course_urls("<html><p>Session expired</p></html>", &base()).is_empty());
    }
}

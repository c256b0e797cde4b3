// src/utils/url.rs

//! URL manipulation utilities.

use sha2::{Digest, Sha256};
use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// Absolute hrefs come back unchanged apart from normalization, so resolving
/// a result a second time is a no-op. Hrefs that cannot be joined yield `None`.
///
/// # Examples
/// ```
/// use course_dashboard::utils::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/en/student/me/courses").unwrap();
/// assert_eq!(
///     resolve_url(&base, "/en/student/me/course/12").as_deref(),
///     Some("https://example.com/en/student/me/course/12")
/// );
/// ```
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    match base.join(href.trim()) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            log::debug!("Dropping unresolvable link {:?}: {}", href, e);
            None
        }
    }
}

/// Length of the digest prefix used for nameless downloads.
const DIGEST_NAME_LEN: usize = 16;

/// File name a download is cached under: the basename of the URL path.
///
/// Falls back to a digest of the whole URL when the path has no basename.
pub fn file_name_from_url(url: &str) -> String {
    let basename = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty() && name != "." && name != "..");

    basename.unwrap_or_else(|| {
        let digest = hex::encode(Sha256::digest(url.as_bytes()));
        digest[..DIGEST_NAME_LEN].to_string()
    })
}

/// Route a remote URL through the reverse-proxy endpoint.
pub fn proxy_href(url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
    format!("/api/proxy?url={encoded}")
}

// src/render/mod.rs

//! Dashboard rendering.
//!
//! Pure functions from `(Course, CourseDataBundle)` pairs to HTML fragments.
//! Nothing here touches the network or the filesystem.

pub mod colors;
mod course;
mod dashboard;
mod summary;

pub use colors::{grade_color, grade_points, pct_color};
pub use course::render_course;
pub use dashboard::{COURSES_PLACEHOLDER, SUMMARY_PLACEHOLDER, render_dashboard};
pub use summary::{Summary, compute_summary, render_summary};

/// Percentage badge, shown only for partial percentages.
fn pct_badge(pct: f64, color: &str) -> String {
    if pct > 0.0 && pct < 100.0 {
        format!(
            r#"<span class="pct-badge" style="background: {color}20; color: {color}">{pct:.0}%</span>"#
        )
    } else {
        String::new()
    }
}

/// Escape text for HTML element content and quoted attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_only_for_partial_percentages() {
        assert_eq!(pct_badge(0.0, "#22c55e"), "");
        assert_eq!(pct_badge(100.0, "#22c55e"), "");
        assert_eq!(pct_badge(120.0, "#22c55e"), "");
        assert_eq!(
            pct_badge(83.4, "#84cc16"),
            r#"<span class="pct-badge" style="background: #84cc1620; color: #84cc16">83%</span>"#
        );
    }

    #[test]
    fn escape_markup() {
        assert_eq!(escape(r#"A&B <i>"x"</i>"#), "A&amp;B &lt;i&gt;&quot;x&quot;&lt;/i&gt;");
        assert_eq!(escape("Programming: I"), "Programming: I");
    }
}

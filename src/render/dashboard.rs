//! Template substitution.

use crate::models::{Course, CourseDataBundle};
use crate::render::course::render_course;
use crate::render::summary::{compute_summary, render_summary};

pub const COURSES_PLACEHOLDER: &str = "{{COURSES}}";
pub const SUMMARY_PLACEHOLDER: &str = "{{SUMMARY}}";

/// Fill the template's two placeholders with course cards and the summary.
pub fn render_dashboard(template: &str, entries: &[(Course, CourseDataBundle)]) -> String {
    let courses: String = entries
        .iter()
        .map(|(course, bundle)| render_course(course, bundle))
        .collect();
    let summary = render_summary(&compute_summary(entries));

    template
        .replace(COURSES_PLACEHOLDER, &courses)
        .replace(SUMMARY_PLACEHOLDER, &summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedNum;

    fn course(name: &str) -> (Course, CourseDataBundle) {
        (
            Course {
                name: name.to_string(),
                grade: ParsedNum::Number(70.0),
                ects: ParsedNum::Number(5.0),
                url: None,
            },
            CourseDataBundle::default(),
        )
    }

    #[test]
    fn fills_both_placeholders_in_order() {
        let html = render_dashboard(
            "<header>{{SUMMARY}}</header><main>{{COURSES}}</main>",
            &[course("Algebra"), course("Physics")],
        );

        assert!(html.starts_with("<header><div class=\"summary\">"));
        assert!(!html.contains(COURSES_PLACEHOLDER));
        assert!(!html.contains(SUMMARY_PLACEHOLDER));
        let algebra = html.find("Algebra").unwrap();
        let physics = html.find("Physics").unwrap();
        assert!(algebra < physics);
        assert_eq!(html.matches(r#"<div class="course">"#).count(), 2);
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(render_dashboard("<p>static</p>", &[course("X")]), "<p>static</p>");
    }
}

//! Dashboard summary strip.

use crate::models::{Course, CourseDataBundle, format_number};
use crate::render::colors::{ACCENT, grade_points, pct_color};
use crate::render::pct_badge;

/// Aggregates across all courses.
///
/// `total_score` and `total_max` cover every course, while `ects` and `gpa`
/// cover only courses with a numeric grade, a positive maximum and numeric
/// ECTS. The two figures can therefore be computed over different courses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_score: f64,
    pub total_max: f64,
    pub course_count: usize,
    pub ects: f64,
    pub gpa: f64,
}

impl Summary {
    /// Total score as a percentage of the total maximum, zero without one.
    pub fn score_pct(&self) -> f64 {
        if self.total_max > 0.0 {
            self.total_score / self.total_max * 100.0
        } else {
            0.0
        }
    }
}

pub fn compute_summary(entries: &[(Course, CourseDataBundle)]) -> Summary {
    let mut total_score = 0.0;
    let mut total_max = 0.0;
    let mut ects_sum = 0.0;
    let mut weighted = 0.0;

    for (course, bundle) in entries {
        let max = bundle.max_possible();
        total_max += max;
        if let Some(grade) = course.grade.as_number() {
            total_score += grade;
            if let (true, Some(ects)) = (max > 0.0, course.ects.as_number()) {
                weighted += grade_points(grade / max * 100.0) * ects;
                ects_sum += ects;
            }
        }
    }

    Summary {
        total_score,
        total_max,
        course_count: entries.len(),
        ects: ects_sum,
        gpa: if ects_sum > 0.0 { weighted / ects_sum } else { 0.0 },
    }
}

fn summary_item(label: &str, color: &str, value: &str) -> String {
    format!(
        r#"    <div class="summary-item">
        <div class="summary-label">{label}</div>
        <div class="summary-value" style="color: {color}">{value}</div>
    </div>
"#
    )
}

pub fn render_summary(summary: &Summary) -> String {
    let gpa_color = pct_color(summary.gpa / 4.0 * 100.0);
    let score_pct = summary.score_pct();
    let score_color = pct_color(score_pct);
    let score_badge = if summary.total_max > 0.0 {
        pct_badge(score_pct, score_color)
    } else {
        String::new()
    };

    let mut html = String::from("<div class=\"summary\">\n");
    html.push_str(&summary_item("GPA", gpa_color, &format!("{:.2}", summary.gpa)));
    html.push_str(&summary_item(
        "Total Score",
        score_color,
        &format!(
            "{}/{} {score_badge}",
            format_number(summary.total_score),
            format_number(summary.total_max)
        ),
    ));
    html.push_str(&summary_item("Courses", ACCENT, &summary.course_count.to_string()));
    html.push_str(&summary_item("ECTS", ACCENT, &format_number(summary.ects)));
    html.push_str("</div>");
    html
}

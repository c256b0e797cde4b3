//! One course card.

use crate::models::{Assessment, Course, CourseDataBundle, ParsedNum, format_number};
use crate::render::colors::{GRAY, grade_color, pct_color};
use crate::render::{escape, pct_badge};
use crate::utils::proxy_href;

/// Grade cell: display text, color and optional badge.
struct GradeCell {
    display: String,
    color: &'static str,
    badge: String,
}

fn grade_cell(grade: &ParsedNum, max_possible: f64) -> GradeCell {
    match grade {
        ParsedNum::Number(value) if max_possible > 0.0 => {
            let pct = value / max_possible * 100.0;
            let color = pct_color(pct);
            GradeCell {
                display: format!("{}/{}", format_number(*value), format_number(max_possible)),
                color,
                badge: pct_badge(pct, color),
            }
        }
        ParsedNum::Number(value) => GradeCell {
            display: format_number(*value),
            color: grade_color(*value),
            badge: String::new(),
        },
        ParsedNum::Raw(text) => GradeCell {
            display: escape(text),
            color: GRAY,
            badge: String::new(),
        },
    }
}

fn ects_display(ects: &ParsedNum) -> String {
    match ects {
        ParsedNum::Number(value) => format!("{}", value.trunc() as i64),
        ParsedNum::Raw(text) => escape(text),
    }
}

fn render_assessment(assessment: &Assessment) -> String {
    let label = escape(assessment.short_label());
    let score = assessment.score.as_deref().filter(|s| !s.is_empty());

    let Some(raw) = score else {
        return format!(
            r#"<span class="assessment"><span class="assessment-name">{label}</span><span class="assessment-score empty">—</span></span>"#
        );
    };

    let value = ParsedNum::parse(raw).as_number();
    let formatted = value.map_or_else(|| escape(raw), format_number);
    let max = assessment.max_points.filter(|m| *m != 0.0);

    let (display, style, badge) = match (max, value) {
        (Some(max), Some(v)) => {
            let pct = v / max * 100.0;
            let color = pct_color(pct);
            (
                format!("{formatted}/{}", format_number(max)),
                format!(r#" style="color: {color}""#),
                pct_badge(pct, color),
            )
        }
        (Some(max), None) => (
            format!("{formatted}/{}", format_number(max)),
            String::new(),
            String::new(),
        ),
        (None, _) => (formatted, String::new(), String::new()),
    };

    format!(
        r#"<span class="assessment"><span class="assessment-name">{label}</span><span class="assessment-score"{style}>{display}</span>{badge}</span>"#
    )
}

/// Syllabus link: proxied remote file first, then the local canonical copy.
fn syllabus_link(bundle: &CourseDataBundle) -> String {
    let href = match (&bundle.syllabus_url, &bundle.folder) {
        (Some(url), _) => proxy_href(url),
        (None, Some(folder)) if bundle.has_local_syllabus => {
            format!("/courses/{}/syllabus.pdf", folder.replace(' ', "%20"))
        }
        _ => return String::new(),
    };
    format!(
        r#"<a href="{}" class="syllabus-link" target="_blank">Syllabus</a>"#,
        escape(&href)
    )
}

fn materials_section(bundle: &CourseDataBundle) -> String {
    if bundle.materials.is_empty() {
        return String::new();
    }
    let links: String = bundle
        .materials
        .iter()
        .filter_map(|m| {
            m.url.as_deref().map(|url| {
                format!(
                    r#"<a href="{}" class="material" target="_blank">{}</a>"#,
                    escape(&proxy_href(url)),
                    escape(&m.name)
                )
            })
        })
        .collect();
    format!(
        r#"<div class="materials-section">
            <div class="materials-toggle"><span class="arrow">▶</span> Materials ({})</div>
            <div class="materials">{links}</div>
        </div>"#,
        bundle.materials.len()
    )
}

/// Render the card for one course.
pub fn render_course(course: &Course, bundle: &CourseDataBundle) -> String {
    let grade = grade_cell(&course.grade, bundle.max_possible());
    let scores = bundle.scores.as_ref();
    let group = scores
        .and_then(|s| s.group.as_deref())
        .map_or_else(|| "?".to_string(), escape);
    let lector = scores
        .and_then(|s| s.lector.as_deref())
        .map_or_else(|| "Unknown".to_string(), escape);
    let assessments: String = scores
        .map(|s| s.assessments.iter().map(render_assessment).collect())
        .unwrap_or_default();

    format!(
        r#"<div class="course">
    <div class="course-header">
        <div class="course-info">
            <div class="course-name">{name}</div>
            <div class="course-meta">Group {group} · {lector}</div>
        </div>
        {syllabus}
        <span class="ects">{ects} ECTS</span>
        <div class="grade" style="color: {color}">{display}{badge}</div>
    </div>
    <div class="assessments">{assessments}</div>
    {materials}
</div>"#,
        name = escape(&course.name),
        syllabus = syllabus_link(bundle),
        ects = ects_display(&course.ects),
        color = grade.color,
        display = grade.display,
        badge = grade.badge,
        materials = materials_section(bundle),
    )
}

// src/models/course_data.rs

//! Per-course records extracted from subpages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Subpages reachable from a course landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubpageKind {
    Syllabus,
    Groups,
    Scores,
    Files,
    SyllabusFile,
}

impl SubpageKind {
    pub const ALL: [SubpageKind; 5] = [
        SubpageKind::Syllabus,
        SubpageKind::Groups,
        SubpageKind::Scores,
        SubpageKind::Files,
        SubpageKind::SyllabusFile,
    ];

    /// Tag used for cache file names and logs.
    pub fn tag(self) -> &'static str {
        match self {
            SubpageKind::Syllabus => "syllabus",
            SubpageKind::Groups => "groups",
            SubpageKind::Scores => "scores",
            SubpageKind::Files => "files",
            SubpageKind::SyllabusFile => "syllabus_file",
        }
    }
}

/// Absolute subpage URLs keyed by kind.
pub type SubpageUrls = BTreeMap<SubpageKind, String>;

/// One graded component of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Component label as shown by the portal
    pub component: String,

    /// Recorded score text, absent when not yet graded
    pub score: Option<String>,

    /// Parsed from a `max N` suffix of the label
    pub max_points: Option<f64>,
}

impl Assessment {
    /// Points this component contributes to the course maximum.
    ///
    /// Only components that are both graded and carry a non-zero maximum count.
    pub fn counted_max(&self) -> Option<f64> {
        match (&self.score, self.max_points) {
            (Some(score), Some(max)) if !score.is_empty() && max != 0.0 => Some(max),
            _ => None,
        }
    }

    /// Label without the first parenthetical note.
    pub fn short_label(&self) -> &str {
        match self.component.find('(') {
            Some(idx) => self.component[..idx].trim(),
            None => self.component.trim(),
        }
    }
}

/// Scores tab of a course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub group: Option<String>,
    pub lector: Option<String>,
    pub assessments: Vec<Assessment>,
}

impl ScoreBundle {
    /// Sum of maxima over graded components.
    pub fn max_possible(&self) -> f64 {
        self.assessments.iter().filter_map(Assessment::counted_max).sum()
    }
}

/// A downloadable course material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,

    /// Absolute URL of the uploaded file
    pub url: Option<String>,

    /// Absolute URL of an external resource linked next to the file
    pub external_url: Option<String>,
}

/// Group membership rows.
pub type GroupList = Vec<String>;

/// Everything known about one course after its subpages were processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDataBundle {
    pub scores: Option<ScoreBundle>,
    pub materials: Vec<Material>,
    pub groups: Option<GroupList>,

    /// Remote syllabus file captured from the landing page
    pub syllabus_url: Option<String>,

    /// Canonical syllabus PDF exists in the output tree
    pub has_local_syllabus: bool,

    /// Sanitized folder the course was stored under
    pub folder: Option<String>,
}

impl CourseDataBundle {
    /// Course maximum over graded components; zero without scores.
    pub fn max_possible(&self) -> f64 {
        self.scores.as_ref().map_or(0.0, ScoreBundle::max_possible)
    }

    /// Lector the material filter is keyed on.
    pub fn lector(&self) -> Option<&str> {
        self.scores.as_ref().and_then(|s| s.lector.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(component: &str, score: Option<&str>, max: Option<f64>) -> Assessment {
        Assessment {
            component: component.to_string(),
            score: score.map(str::to_string),
            max_points: max,
        }
    }

    #[test]
    fn max_possible_counts_only_graded_components() {
        let bundle = ScoreBundle {
            assessments: vec![
                assessment("Midterm (max. 30)", Some("25"), Some(30.0)),
                assessment("Final (max. 40)", None, Some(40.0)),
                assessment("Quiz", Some("5"), None),
                assessment("Lab (max 10)", Some("8"), Some(10.0)),
            ],
            ..ScoreBundle::default()
        };
        assert_eq!(bundle.max_possible(), 40.0);
    }

    #[test]
    fn short_label_truncates_at_parenthesis() {
        assert_eq!(
            assessment("Midterm (max. 30)", None, None).short_label(),
            "Midterm"
        );
        assert_eq!(assessment("Essay", None, None).short_label(), "Essay");
    }

    #[test]
    fn subpage_tags() {
        let tags: Vec<_> = SubpageKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(
            tags,
            ["syllabus", "groups", "scores", "files", "syllabus_file"]
        );
    }
}

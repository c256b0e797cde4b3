// src/models/course.rs

//! Course listing records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell value that is numeric when it parses, raw text otherwise.
///
/// Portal cells carry grades and credits as free text, so a failed parse is
/// data, not an error. Consumers match on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedNum {
    Number(f64),
    Raw(String),
}

impl ParsedNum {
    /// Parse cell text, accepting either `,` or `.` as decimal separator.
    ///
    /// ```
    /// use course_dashboard::models::ParsedNum;
    ///
    /// assert_eq!(ParsedNum::parse(" 27,5 "), ParsedNum::Number(27.5));
    /// assert_eq!(ParsedNum::parse(" n/a "), ParsedNum::Raw("n/a".to_string()));
    /// ```
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.replace(',', ".").parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Number(value),
            _ => Self::Raw(trimmed.to_string()),
        }
    }

    /// The numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for ParsedNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// Render a number without a trailing `.0` when it is integral.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One row of the main course listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course title, also the source of its folder name
    pub name: String,

    /// Final grade as shown in the listing
    pub grade: ParsedNum,

    /// Credit weight
    pub ects: ParsedNum,

    /// Absolute URL of the course landing page
    pub url: Option<String>,
}

impl Course {
    /// Filesystem-safe folder name derived from the course name.
    ///
    /// Keeps alphanumerics (any script), spaces, `-` and `_`, then trims.
    pub fn folder_name(&self) -> String {
        sanitize_folder_name(&self.name)
    }
}

/// Folder used when a name sanitizes to nothing.
pub const UNTITLED_FOLDER: &str = "untitled";

/// Strip characters outside `[alnum, space, -, _]` and trim.
pub fn sanitize_folder_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let trimmed = kept.trim();
    if trimmed.is_empty() {
        UNTITLED_FOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// The parsed main listing: courses plus the aggregate ECTS row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseListing {
    pub courses: Vec<Course>,
    pub total_ects: Option<ParsedNum>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_comma_and_period() {
        assert_eq!(ParsedNum::parse("55,5"), ParsedNum::Number(55.5));
        assert_eq!(ParsedNum::parse("55.5"), ParsedNum::Number(55.5));
        assert_eq!(ParsedNum::parse(" 6 "), ParsedNum::Number(6.0));
    }

    #[test]
    fn parse_keeps_trimmed_text_on_failure() {
        assert_eq!(ParsedNum::parse(" 1,2,3 "), ParsedNum::Raw("1,2,3".into()));
        assert_eq!(ParsedNum::parse(""), ParsedNum::Raw(String::new()));
        assert_eq!(ParsedNum::parse("inf"), ParsedNum::Raw("inf".into()));
    }

    #[test]
    fn display_drops_integral_fraction() {
        assert_eq!(ParsedNum::Number(60.0).to_string(), "60");
        assert_eq!(ParsedNum::Number(27.5).to_string(), "27.5");
        assert_eq!(ParsedNum::Raw("A".into()).to_string(), "A");
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            ParsedNum::Number(5.0),
            ParsedNum::Raw("x".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[5.0,"x"]"#);
    }

    #[test]
    fn folder_name_strips_punctuation() {
        assert_eq!(sanitize_folder_name(" Calculus I: (Part 2) "), "Calculus I Part 2");
        assert_eq!(sanitize_folder_name("მათემატიკა-1_a"), "მათემატიკა-1_a");
        assert_eq!(sanitize_folder_name("???"), UNTITLED_FOLDER);
    }
}

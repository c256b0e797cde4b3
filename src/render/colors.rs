//! Color and grade-point bands.

/// Color for non-numeric grades.
pub const GRAY: &str = "#52525b";

/// Color for counters that carry no grade meaning.
pub const ACCENT: &str = "#a78bfa";

/// Lower bound, color and grade points per band, best first.
static BANDS: [(f64, &str, f64); 5] = [
    (91.0, "#22c55e", 4.0),
    (81.0, "#84cc16", 3.0),
    (71.0, "#eab308", 2.0),
    (61.0, "#f97316", 1.0),
    (51.0, "#ef4444", 0.5),
];

const FAIL_COLOR: &str = "#991b1b";

fn band(value: f64) -> Option<&'static (f64, &'static str, f64)> {
    BANDS.iter().find(|(floor, _, _)| value >= *floor)
}

/// Color for a percentage of the course maximum.
pub fn pct_color(pct: f64) -> &'static str {
    band(pct).map_or(FAIL_COLOR, |&(_, color, _)| color)
}

/// Color for an absolute grade when no maximum is known.
///
/// Same thresholds as [`pct_color`], applied to the raw grade value.
pub fn grade_color(grade: f64) -> &'static str {
    pct_color(grade)
}

/// Grade points on the 0.0 to 4.0 scale for a percentage.
pub fn grade_points(pct: f64) -> f64 {
    band(pct).map_or(0.0, |&(_, _, points)| points)
}

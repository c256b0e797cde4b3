// src/parser/scores.rs

//! Scores tab: group, lector and graded components.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{selector, text_joined, text_of};
use crate::models::{Assessment, ScoreBundle};

static HEADER: LazyLock<Selector> = LazyLock::new(|| selector(".tab_scores h4"));
static LECTOR_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href*='/lector/']"));
static SCORES_TABLE: LazyLock<Selector> = LazyLock::new(|| selector(".tab_scores table"));
static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

static MAX_POINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"max\.?\s*([\d.,]+)").unwrap_or_else(|e| panic!("invalid max-points regex: {e}"))
});

/// Header marker announcing a group id.
const GROUP_MARKER: &str = "Group";
/// Separator between the group id and the course title in the header.
const HEADER_SEPARATOR: &str = " - ";

/// Summary rows that are not components.
const TOTAL_ROW: &str = "სულ";
const CREDITS_ROW: &str = "Credits";
/// Phrase marking the exam-admission row.
const EXAM_WITHDRAWAL_MARKER: &str = "გამოცდაზე გასვლის";

/// Parse the scores tab.
pub fn parse_scores(html: &str) -> ScoreBundle {
    let document = Html::parse_document(html);
    let mut bundle = ScoreBundle::default();

    if let Some(header) = document.select(&HEADER).next() {
        bundle.group = parse_group(&text_joined(header, " "));
        bundle.lector = header
            .select(&LECTOR_LINK)
            .next()
            .map(text_of)
            .filter(|name| !name.is_empty());
    }

    if let Some(table) = document.select(&SCORES_TABLE).next() {
        bundle.assessments = table.select(&BODY_ROW).filter_map(parse_row).collect();
    }

    bundle
}

/// Group id from a header like `Group A1 - Course title`.
fn parse_group(header: &str) -> Option<String> {
    if !header.contains(GROUP_MARKER) {
        return None;
    }
    let head = header
        .split_once(HEADER_SEPARATOR)
        .map_or(header, |(head, _)| head);
    let group = head.replace(GROUP_MARKER, "").trim().to_string();
    (!group.is_empty()).then_some(group)
}

fn parse_row(row: ElementRef<'_>) -> Option<Assessment> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    let [label, score] = cells.as_slice() else {
        return None;
    };

    let component = text_of(*label);
    if component.is_empty() || is_excluded(&component) {
        return None;
    }

    let score = text_of(*score);
    Some(Assessment {
        max_points: parse_max_points(&component),
        score: (!score.is_empty()).then_some(score),
        component,
    })
}

fn is_excluded(component: &str) -> bool {
    component == TOTAL_ROW || component == CREDITS_ROW || component.contains(EXAM_WITHDRAWAL_MARKER)
}

/// Maximum points from a `max N` / `max. N` fragment of a label.
fn parse_max_points(component: &str) -> Option<f64> {
    let caps = MAX_POINTS.captures(component)?;
    caps.get(1)?.as_str().replace(',', ".").parse().ok()
}

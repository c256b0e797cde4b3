// src/parser/courses.rs

//! Main course listing table.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{href_of, selector, text_of};
use crate::models::{Course, CourseListing, ParsedNum};
use crate::utils::resolve_url;

static LISTING_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("table.table.table-striped.table-bordered.table-hover.fluid"));
static TBODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// Cells in a course row.
const COURSE_ROW_CELLS: usize = 6;
/// Cells in the aggregate ECTS row.
const TOTAL_ROW_CELLS: usize = 2;

/// Parse the course listing and its aggregate ECTS row.
///
/// Rows with six cells are courses (name and link in the third cell, grade in
/// the fourth, ECTS in the sixth). A two-cell row with an empty first cell
/// carries the total ECTS. Other rows are ignored.
pub fn parse_courses(html: &str, base: &Url) -> CourseListing {
    let document = Html::parse_document(html);
    let mut listing = CourseListing::default();

    let Some(tbody) = document
        .select(&LISTING_TABLE)
        .next()
        .and_then(|table| table.select(&TBODY).next())
    else {
        log::debug!("Course listing table not found");
        return listing;
    };

    for row in tbody.select(&ROW) {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
        match cells.len() {
            TOTAL_ROW_CELLS if text_of(cells[0]).is_empty() => {
                listing.total_ects = Some(ParsedNum::parse(&text_of(cells[1])));
            }
            COURSE_ROW_CELLS => listing.courses.push(parse_course_row(&cells, base)),
            _ => {}
        }
    }

    listing
}

fn parse_course_row(cells: &[ElementRef<'_>], base: &Url) -> Course {
    let name_cell = cells[2];
    let anchor = name_cell.select(&ANCHOR).next();

    let name = anchor.map_or_else(|| text_of(name_cell), text_of);
    let url = anchor.and_then(href_of).and_then(|href| resolve_url(base, href));

    Course {
        name,
        grade: ParsedNum::parse(&text_of(cells[3])),
        ects: ParsedNum::parse(&text_of(cells[5])),
        url,
    }
}

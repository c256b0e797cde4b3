// src/parser/files.rs

//! Files tab: course materials grouped under lecturer marker rows.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{has_class, href_of, selector, text_of};
use crate::models::Material;
use crate::utils::resolve_url;

static FILES_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("#files"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static LECTOR_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href*='/lector/']"));
static UPLOAD_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href*='/uploads/']"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// Class of the rows that announce a lecturer.
const MARKER_ROW_CLASS: &str = "info";

/// Parse course materials, keeping only those of `my_lector` when known.
///
/// Rows are scanned in order; a marker row switches the running lecturer and
/// every following row belongs to it until the next marker. Rows before the
/// first marker, or after a marker with a blank name, belong to nobody and
/// are always kept.
pub fn parse_files(html: &str, my_lector: Option<&str>, base: &Url) -> Vec<Material> {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&FILES_TABLE).next() else {
        return Vec::new();
    };

    let my_lector = my_lector
        .map(str::to_lowercase)
        .filter(|name| !name.is_empty());

    let (_, materials) = table.select(&ROW).fold(
        (None::<String>, Vec::new()),
        |(current_lector, mut materials), row| {
            if let Some(lector) = marker_lector(row) {
                return (Some(lector), materials);
            }

            let foreign = match (&my_lector, &current_lector) {
                (Some(mine), Some(current)) if !current.is_empty() => {
                    current.to_lowercase() != *mine
                }
                _ => false,
            };
            if !foreign {
                materials.extend(parse_material_row(row, base));
            }
            (current_lector, materials)
        },
    );

    materials
}

/// Lecturer named by a marker row.
fn marker_lector(row: ElementRef<'_>) -> Option<String> {
    if !has_class(row, MARKER_ROW_CLASS) {
        return None;
    }
    row.select(&LECTOR_LINK).next().map(text_of)
}

fn parse_material_row(row: ElementRef<'_>, base: &Url) -> Option<Material> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    let first = *cells.first()?;

    let name = text_of(first);
    if name.is_empty() {
        return None;
    }

    let url = first
        .select(&UPLOAD_LINK)
        .next()
        .and_then(href_of)
        .and_then(|href| resolve_url(base, href));
    let external_url = cells
        .get(1)
        .and_then(|cell| cell.select(&ANCHOR).next())
        .and_then(href_of)
        .and_then(|href| resolve_url(base, href));

    Some(Material {
        name,
        url,
        external_url,
    })
}

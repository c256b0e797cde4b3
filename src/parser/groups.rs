// src/parser/groups.rs

//! Groups tab.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{has_class, selector, text_of};
use crate::models::GroupList;

static GROUPS_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("#groups"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));

const WARNING_ROW_CLASS: &str = "warning";
const NOT_FOUND: &str = "Not found";

/// Row texts of the groups table, minus warnings and empty results.
pub fn parse_groups(html: &str) -> GroupList {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&GROUPS_TABLE).next() else {
        return GroupList::new();
    };

    table
        .select(&ROW)
        .filter(|row| !has_class(*row, WARNING_ROW_CLASS))
        .map(text_of)
        .filter(|text| !text.is_empty() && !text.contains(NOT_FOUND))
        .collect()
}

//! Spatial table detection over raw page fragments.
//!
//! Used when the table detector found nothing, and for the document
//! metadata (rows found, header labels found).

use crate::classify::patterns::{has_money_marker, DECIMAL_NUMBER};
use crate::config::schema::SegmenterConfig;
use crate::layout::{group_fragments, Geometry, GroupingMode};
use crate::model::{BBox, Fragment, Page};
use serde::{Deserialize, Serialize};

const TABLE_HEADER_KEYWORDS: &[&str] = &[
    "position",
    "pos",
    "qty",
    "quantity",
    "menge",
    "anzahl",
    "description",
    "beschreibung",
    "artikel",
    "item",
    "price",
    "preis",
    "unit",
    "einheit",
    "einzelpreis",
    "amount",
    "betrag",
    "gesamt",
    "total",
    "summe",
    "tax",
    "steuer",
    "vat",
    "ust",
    "mwst",
    "%",
];

/// A bold fragment that reads like a table column label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderCandidate {
    pub text: String,
    pub bbox: BBox,
    pub page: usize,
}

/// Fragment looks like a table cell: a decimal number, a money or percent
/// marker, or at most three words.
fn is_cell_candidate(text: &str) -> bool {
    DECIMAL_NUMBER.is_match(text) || has_money_marker(text) || text.split_whitespace().count() <= 3
}

/// Reconstruct table rows from page fragments.
///
/// Rows are listed page by page, top of page first; each row holds its
/// cell texts left to right. Rows with fewer than two cells are dropped.
pub fn detect_table_rows(pages: &[Page], config: &SegmenterConfig) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    for page in pages {
        let candidates: Vec<Fragment> = page
            .fragments
            .iter()
            .filter(|f| {
                let text = f.text.trim();
                !text.is_empty() && is_cell_candidate(text)
            })
            .cloned()
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let geometry = Geometry::new(config, page.height);
        for group in group_fragments(
            candidates,
            config.row_tolerance,
            GroupingMode::TableRows,
            &geometry,
        ) {
            let cells: Vec<String> = group
                .iter()
                .map(|f| f.text.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
    }

    tracing::debug!(rows = rows.len(), "detected table rows");
    rows
}

/// Bold fragments containing a column label keyword.
pub fn detect_table_headers(pages: &[Page]) -> Vec<HeaderCandidate> {
    pages
        .iter()
        .flat_map(|page| page.fragments.iter())
        .filter(|f| {
            let text = f.text.trim();
            if text.is_empty() || !f.is_bold() {
                return false;
            }
            let lower = text.to_lowercase();
            TABLE_HEADER_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .map(|f| HeaderCandidate {
            text: f.text.trim().to_string(),
            bbox: f.bbox,
            page: f.page,
        })
        .collect()
}

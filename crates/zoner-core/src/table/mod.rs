//! Structural interpretation of a detected table: header row, item rows
//! matched to position names, and summary rows.

pub mod positions;
pub mod render;

use crate::config::schema::SegmenterConfig;
use crate::model::{PositionName, RawTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use positions::extract_position_names;
pub use render::render_table_structure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItem {
    pub position_name: Option<String>,
    /// Header label -> cell value, for the cells that have a header.
    pub cells: BTreeMap<String, String>,
    pub raw_row: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableStructure {
    pub headers: Vec<String>,
    pub items: Vec<TableItem>,
    pub summary_rows: Vec<Vec<String>>,
}

/// Pick the table to interpret: highest accuracy, earliest on ties.
pub fn select_table(tables: &[RawTable]) -> Option<&RawTable> {
    tables.iter().reduce(|best, t| if t.accuracy > best.accuracy { t } else { best })
}

fn has_summary_keyword(lower: &str, config: &SegmenterConfig) -> bool {
    config
        .summary_keywords
        .iter()
        .any(|kw| lower.contains(kw.as_str()))
}

/// Interpret `table` against the document's position names.
///
/// Returns `None` for a table without rows.
pub fn reconstruct_table_structure(
    table: &RawTable,
    position_names: &[PositionName],
    config: &SegmenterConfig,
) -> Option<TableStructure> {
    let (headers, data_rows) = table.rows.split_first()?;

    let (summary_rows, item_rows): (Vec<&Vec<String>>, Vec<&Vec<String>>) = data_rows
        .iter()
        .partition(|row| has_summary_keyword(&row.join(" ").to_lowercase(), config));

    let names: Vec<&str> = position_names
        .iter()
        .map(|p| p.name.as_str())
        .filter(|name| !has_summary_keyword(&name.to_lowercase(), config))
        .collect();

    if names.len() != item_rows.len() {
        tracing::debug!(
            names = names.len(),
            items = item_rows.len(),
            "position names and item rows differ in length"
        );
    }

    let items = item_rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = BTreeMap::new();
            // Repeated header labels keep the rightmost cell.
            for (header, value) in headers.iter().zip(row) {
                cells.insert(header.clone(), value.clone());
            }
            TableItem {
                position_name: names.get(i).map(|n| n.to_string()),
                cells,
                raw_row: row.clone(),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        table = table.id,
        items = items.len(),
        summary_rows = summary_rows.len(),
        "reconstructed table"
    );

    Some(TableStructure {
        headers: headers.clone(),
        items,
        summary_rows: summary_rows.into_iter().cloned().collect(),
    })
}

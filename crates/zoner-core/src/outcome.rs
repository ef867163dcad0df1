use crate::chunking::ChunkSummary;
use crate::model::{Chunk, FragmentRole, PositionName};
use crate::table::TableStructure;
use serde::{Deserialize, Serialize};

/// Number of fragments per typographic role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub heading: usize,
    pub label: usize,
    pub paragraph: usize,
}

impl RoleCounts {
    pub fn record(&mut self, role: FragmentRole) {
        match role {
            FragmentRole::Heading => self.heading += 1,
            FragmentRole::Label => self.label += 1,
            FragmentRole::Paragraph => self.paragraph += 1,
        }
    }
}

/// Document-level statistics gathered while segmenting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub page_count: usize,
    pub total_fragments: usize,
    pub roles: RoleCounts,
    /// Bold fragments carrying a column-header keyword.
    pub headers_found: usize,
    /// Fragment rows that look like table rows.
    pub rows_found: usize,
    /// Widest detected fragment row.
    pub max_columns: usize,
    pub positions_found: usize,
}

/// Everything produced for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Classified chunks, in reading order.
    pub chunks: Vec<Chunk>,
    pub summary: ChunkSummary,
    /// Interpreted table, absent when the document has no table.
    pub table_structure: Option<TableStructure>,
    /// Fixed-width rendering of `table_structure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_rendering: Option<String>,
    pub position_names: Vec<PositionName>,
    pub meta: DocumentMeta,
}

use serde::{Deserialize, Serialize};

/// Which direction larger y coordinates point in the extractor's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAxis {
    /// PDF user space: origin bottom-left, larger y is nearer the top.
    #[default]
    BottomUp,
    /// Image space: origin top-left, larger y is nearer the bottom.
    TopDown,
}

/// How page fragments are turned into chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingMode {
    /// Group fragments into regions, classify and chunk each region.
    #[default]
    Region,
    /// Classify each fragment, one chunk per zone per page.
    Page,
}

/// Tunable parameters of the segmentation engine.
///
/// Vertical thresholds are elevations: distance above the page bottom in
/// the document's units, regardless of the extractor's axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    pub axis: VerticalAxis,
    /// Page height used to flip top-down coordinates when a page has none.
    pub page_height: f32,
    /// Same-row tolerance for table-row grouping.
    pub row_tolerance: f32,
    /// Same-region tolerance for coarse region grouping.
    pub region_tolerance: f32,
    /// Amounts left-aligned beyond this x are treated as totals.
    pub right_margin_x: f32,
    /// Maximum vertical gap between two chunks that still merge.
    pub merge_gap: f32,
    pub header_min_elevation: f32,
    pub large_font_size: f32,
    pub totals_max_elevation: f32,
    pub address_min_elevation: f32,
    pub page_midpoint: f32,
    pub mode: ChunkingMode,
    pub merge_chunks: bool,
    /// Build a table from spatially detected rows when no table was extracted.
    pub fallback_table_detection: bool,
    /// Lowercase substrings routing a fragment straight to `totals`.
    pub totals_keywords: Vec<String>,
    /// Lowercase substrings marking a table row (or position name) as a summary line.
    pub summary_keywords: Vec<String>,
    /// Lowercase substrings identifying the description column of a table header.
    pub description_keywords: Vec<String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        SegmenterConfig {
            axis: VerticalAxis::BottomUp,
            page_height: 842.0,
            row_tolerance: 5.0,
            region_tolerance: 20.0,
            right_margin_x: 400.0,
            merge_gap: 30.0,
            header_min_elevation: 700.0,
            large_font_size: 12.0,
            totals_max_elevation: 200.0,
            address_min_elevation: 500.0,
            page_midpoint: 400.0,
            mode: ChunkingMode::Region,
            merge_chunks: true,
            fallback_table_detection: false,
            totals_keywords: words(&[
                "gesamt", "total", "summe", "betrag", "steuer", "mwst", "ust",
            ]),
            summary_keywords: words(&[
                "summe",
                "steuer",
                "tax",
                "total",
                "gesamt",
                "zwischensumme",
                "umsatzsteuer",
            ]),
            description_keywords: words(&[
                "beschreibung",
                "description",
                "artikel",
                "item",
                "position",
            ]),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

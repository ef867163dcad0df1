pub mod grouping;
pub mod table_rows;

use crate::config::schema::{SegmenterConfig, VerticalAxis};
use crate::model::BBox;

pub use grouping::{group_fragments, GroupingMode};
pub use table_rows::{detect_table_headers, detect_table_rows, HeaderCandidate};

/// Maps extractor coordinates onto elevations (distance above the page
/// bottom), so every spatial rule reads a single convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub axis: VerticalAxis,
    pub page_height: f32,
}

impl Geometry {
    pub fn new(config: &SegmenterConfig, page_height: Option<f32>) -> Self {
        Geometry {
            axis: config.axis,
            page_height: page_height
                .filter(|h| h.is_finite() && *h > 0.0)
                .unwrap_or(config.page_height),
        }
    }

    pub fn elevation(&self, y: f32) -> f32 {
        match self.axis {
            VerticalAxis::BottomUp => y,
            VerticalAxis::TopDown => self.page_height - y,
        }
    }

    /// Elevation of the upper edge.
    pub fn top(&self, bbox: &BBox) -> f32 {
        self.elevation(bbox.y0).max(self.elevation(bbox.y1))
    }

    /// Elevation of the lower edge.
    pub fn bottom(&self, bbox: &BBox) -> f32 {
        self.elevation(bbox.y0).min(self.elevation(bbox.y1))
    }
}

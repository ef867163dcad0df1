use crate::classify::patterns::{
    first_content_match, COLUMN_LABEL, CURRENCY_AMOUNT, QUANTITY, STREET_ADDRESS,
};
use crate::config::schema::SegmenterConfig;
use crate::layout::Geometry;
use crate::model::{ChunkType, Derivation, Fragment};

pub const KEYWORD_CONFIDENCE: f32 = 0.8;
pub const PATTERN_CONFIDENCE: f32 = 0.8;
pub const BOLD_COLUMN_HEADER_CONFIDENCE: f32 = 0.9;
pub const COLUMN_HEADER_CONFIDENCE: f32 = 0.7;
pub const SPATIAL_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_CONFIDENCE: f32 = 0.3;

/// Label assigned to a fragment or fragment group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub chunk_type: ChunkType,
    pub derivation: Derivation,
    pub confidence: f32,
    pub column_header: bool,
}

impl Classification {
    fn new(chunk_type: ChunkType, derivation: Derivation, confidence: f32) -> Self {
        Classification {
            chunk_type,
            derivation,
            confidence,
            column_header: false,
        }
    }
}

/// Assigns zones to fragments: totals pre-filter, then the ordered content
/// patterns, then position and font fallbacks.
pub struct RegionClassifier<'a> {
    config: &'a SegmenterConfig,
}

impl<'a> RegionClassifier<'a> {
    pub fn new(config: &'a SegmenterConfig) -> Self {
        RegionClassifier { config }
    }

    /// Totals pre-filter: a totals keyword, or a currency amount starting
    /// right of the margin.
    pub fn is_totals(&self, fragment: &Fragment) -> bool {
        let lower = fragment.text.to_lowercase();
        if self
            .config
            .totals_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()))
        {
            return true;
        }
        CURRENCY_AMOUNT.is_match(&lower) && fragment.bbox.x0 > self.config.right_margin_x
    }

    /// Classify a single fragment.
    pub fn classify_fragment(&self, fragment: &Fragment, geometry: &Geometry) -> Classification {
        if self.is_totals(fragment) {
            return Classification::new(
                ChunkType::Totals,
                Derivation::KeywordTotals,
                KEYWORD_CONFIDENCE,
            );
        }

        let lower = fragment.text.to_lowercase();
        if let Some(chunk_type) = first_content_match(&lower) {
            return Classification::new(chunk_type, Derivation::ContentPattern, PATTERN_CONFIDENCE);
        }

        self.spatial_fallback(
            &lower,
            geometry.bottom(&fragment.bbox),
            fragment.font_size,
        )
    }

    /// Split a region (fragments sharing a line or block) into classified parts.
    ///
    /// A column header label is kept whole, since header rows routinely
    /// carry a "Total" or "Gesamt" column. Otherwise the fragments hitting
    /// the totals pre-filter form one `totals` part and the remaining
    /// fragments are classified together. Parts are ordered left to right.
    pub fn classify_region(
        &self,
        group: Vec<Fragment>,
        geometry: &Geometry,
    ) -> Vec<(Vec<Fragment>, Classification)> {
        if let Some(header) = self.column_header(&group) {
            return vec![(group, header)];
        }

        let (totals, rest): (Vec<Fragment>, Vec<Fragment>) =
            group.into_iter().partition(|f| self.is_totals(f));

        let mut parts = Vec::with_capacity(2);
        if !rest.is_empty() {
            let classification = self.classify_remainder(&rest, geometry);
            parts.push((rest, classification));
        }
        if !totals.is_empty() {
            parts.push((
                totals,
                Classification::new(ChunkType::Totals, Derivation::KeywordTotals, KEYWORD_CONFIDENCE),
            ));
        }
        parts.sort_by(|a, b| a.0[0].bbox.x0.total_cmp(&b.0[0].bbox.x0));
        parts
    }

    /// Column header label: at least two fragments, no digits, and a member
    /// outside the totals pre-filter naming a column.
    fn column_header(&self, group: &[Fragment]) -> Option<Classification> {
        if group.len() < 2 || group.iter().any(|f| f.text.chars().any(|c| c.is_ascii_digit())) {
            return None;
        }
        let labelled = group
            .iter()
            .any(|f| !self.is_totals(f) && COLUMN_LABEL.is_match(&f.text));
        if !labelled {
            return None;
        }

        let bold = group.iter().any(Fragment::is_bold);
        let confidence = if bold {
            BOLD_COLUMN_HEADER_CONFIDENCE
        } else {
            COLUMN_HEADER_CONFIDENCE
        };
        Some(Classification {
            chunk_type: ChunkType::LineItems,
            derivation: Derivation::ColumnHeader { bold },
            confidence,
            column_header: true,
        })
    }

    /// Content patterns over the joined text, then the spatial rules on the
    /// fragments' mean bottom elevation and largest font.
    fn classify_remainder(&self, group: &[Fragment], geometry: &Geometry) -> Classification {
        let lower = group
            .iter()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if let Some(chunk_type) = first_content_match(&lower) {
            return Classification::new(chunk_type, Derivation::ContentPattern, PATTERN_CONFIDENCE);
        }

        let elevation = if group.is_empty() {
            0.0
        } else {
            group
                .iter()
                .map(|f| geometry.bottom(&f.bbox))
                .sum::<f32>()
                / group.len() as f32
        };
        let font_size = group
            .iter()
            .map(|f| f.font_size)
            .fold(0.0_f32, f32::max);

        self.spatial_fallback(&lower, elevation, font_size)
    }

    /// Position/visual rules, evaluated in a fixed order.
    fn spatial_fallback(&self, lower: &str, elevation: f32, font_size: f32) -> Classification {
        let c = self.config;

        let spatial = if elevation > c.header_min_elevation && font_size > c.large_font_size {
            Some(ChunkType::Header)
        } else if elevation < c.totals_max_elevation && CURRENCY_AMOUNT.is_match(lower) {
            Some(ChunkType::Totals)
        } else if elevation > c.totals_max_elevation
            && elevation < c.header_min_elevation
            && QUANTITY.is_match(lower)
        {
            Some(ChunkType::LineItems)
        } else if elevation > c.address_min_elevation && STREET_ADDRESS.is_match(lower) {
            Some(ChunkType::Addresses)
        } else {
            None
        };

        match spatial {
            Some(chunk_type) => {
                Classification::new(chunk_type, Derivation::Spatial, SPATIAL_CONFIDENCE)
            }
            None => {
                let chunk_type = if elevation > c.page_midpoint {
                    ChunkType::Header
                } else {
                    ChunkType::Footer
                };
                Classification::new(chunk_type, Derivation::PositionalDefault, DEFAULT_CONFIDENCE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn frag(text: &str, bbox: [f32; 4], font: &str, size: f32) -> Fragment {
        Fragment::new(text, BBox::from(bbox), font, size)
    }

    fn classify(text: &str, bbox: [f32; 4], size: f32) -> Classification {
        let config = SegmenterConfig::default();
        let geometry = Geometry::new(&config, None);
        RegionClassifier::new(&config).classify_fragment(&frag(text, bbox, "Arial", size), &geometry)
    }

    #[test]
    fn test_totals_keyword_prefilter() {
        let c = classify("Gesamtbetrag: 1511,30 €", [420.0, 50.0, 520.0, 60.0], 10.0);
        assert_eq!(c.chunk_type, ChunkType::Totals);
        assert_eq!(c.derivation, Derivation::KeywordTotals);
    }

    #[test]
    fn test_totals_beats_quantity_pattern() {
        // Mid-page with a quantity pattern, which alone would be line items.
        let c = classify("Summe 2 x 80,00", [60.0, 400.0, 200.0, 410.0], 10.0);
        assert_eq!(c.chunk_type, ChunkType::Totals);
    }

    #[test]
    fn test_right_margin_amount_is_totals() {
        let right = classify("1511,30 €", [450.0, 400.0, 520.0, 410.0], 10.0);
        assert_eq!(right.chunk_type, ChunkType::Totals);

        let left = classify("80,00 €", [300.0, 400.0, 350.0, 410.0], 10.0);
        assert_eq!(left.chunk_type, ChunkType::LineItems);
        assert_eq!(left.derivation, Derivation::Spatial);
    }

    #[test]
    fn test_content_pattern_first() {
        let c = classify("Invoice #12345", [50.0, 100.0, 150.0, 110.0], 10.0);
        assert_eq!(c.chunk_type, ChunkType::Header);
        assert_eq!(c.confidence, PATTERN_CONFIDENCE);
    }

    #[test]
    fn test_spatial_fallbacks() {
        let big_top = classify("ACME GmbH", [50.0, 760.0, 200.0, 780.0], 18.0);
        assert_eq!(big_top.chunk_type, ChunkType::Header);
        assert_eq!(big_top.derivation, Derivation::Spatial);

        let street = classify("221 Baker Rd", [50.0, 600.0, 200.0, 610.0], 10.0);
        assert_eq!(street.chunk_type, ChunkType::Addresses);

        let low_money = classify("€ 99", [50.0, 100.0, 80.0, 110.0], 10.0);
        assert_eq!(low_money.chunk_type, ChunkType::Totals);
        assert_eq!(low_money.derivation, Derivation::Spatial);
    }

    #[test]
    fn test_positional_default() {
        let upper = classify("Vielen Dank", [50.0, 450.0, 150.0, 460.0], 10.0);
        assert_eq!(upper.chunk_type, ChunkType::Header);
        assert_eq!(upper.derivation, Derivation::PositionalDefault);
        assert!(upper.confidence <= 0.5);

        let lower = classify("Vielen Dank", [50.0, 40.0, 150.0, 50.0], 10.0);
        assert_eq!(lower.chunk_type, ChunkType::Footer);
    }

    fn classify_region(group: Vec<Fragment>) -> Vec<(Vec<Fragment>, Classification)> {
        let config = SegmenterConfig::default();
        let geometry = Geometry::new(&config, None);
        RegionClassifier::new(&config).classify_region(group, &geometry)
    }

    fn texts(part: &(Vec<Fragment>, Classification)) -> Vec<&str> {
        part.0.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_column_header_group_stays_whole() {
        let parts = classify_region(vec![
            frag("Beschreibung", [50.0, 530.0, 150.0, 540.0], "Arial-Bold", 10.0),
            frag("Menge", [250.0, 530.0, 300.0, 540.0], "Arial-Bold", 10.0),
            frag("Gesamt", [450.0, 530.0, 500.0, 540.0], "Arial-Bold", 10.0),
        ]);
        assert_eq!(parts.len(), 1);
        let c = parts[0].1;
        assert_eq!(c.chunk_type, ChunkType::LineItems);
        assert!(c.column_header);
        assert_eq!(c.confidence, BOLD_COLUMN_HEADER_CONFIDENCE);
    }

    #[test]
    fn test_totals_row_is_one_part() {
        let parts = classify_region(vec![
            frag("Zwischensumme", [300.0, 200.0, 400.0, 210.0], "Arial", 10.0),
            frag("1.270,00 €", [450.0, 200.0, 520.0, 210.0], "Arial", 10.0),
        ]);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].1.chunk_type, ChunkType::Totals);
        assert_eq!(parts[0].0.len(), 2);
    }

    #[test]
    fn test_right_margin_total_split_from_line_item_row() {
        let parts = classify_region(vec![
            frag("800,00 €", [450.0, 440.0, 520.0, 450.0], "Arial", 10.0),
            frag("Beratung vor Ort", [50.0, 440.0, 200.0, 450.0], "Arial", 10.0),
            frag("10 x 80,00", [250.0, 440.0, 320.0, 450.0], "Arial", 10.0),
        ]);
        assert_eq!(parts.len(), 2);
        assert_eq!(texts(&parts[0]), vec!["Beratung vor Ort", "10 x 80,00"]);
        assert_eq!(parts[0].1.chunk_type, ChunkType::LineItems);
        assert_eq!(parts[0].1.derivation, Derivation::Spatial);
        assert_eq!(texts(&parts[1]), vec!["800,00 €"]);
        assert_eq!(parts[1].1.chunk_type, ChunkType::Totals);
        assert_eq!(parts[1].1.derivation, Derivation::KeywordTotals);
    }

    #[test]
    fn test_label_only_totals_row_is_not_column_header() {
        for labels in [["Total", "Amount due"], ["Tax rate", "Total"]] {
            let parts = classify_region(vec![
                frag(labels[0], [300.0, 150.0, 380.0, 160.0], "Arial-Bold", 10.0),
                frag(labels[1], [450.0, 150.0, 530.0, 160.0], "Arial-Bold", 10.0),
            ]);
            assert!(parts.iter().all(|(_, c)| !c.column_header), "{labels:?}");
            let total = parts
                .iter()
                .find(|p| texts(p).contains(&"Total"))
                .unwrap();
            assert_eq!(total.1.chunk_type, ChunkType::Totals);
        }
    }
}

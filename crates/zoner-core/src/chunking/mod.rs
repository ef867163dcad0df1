pub mod line_item;
pub mod merge;
pub mod summary;

use crate::classify::{Classification, RegionClassifier};
use crate::config::schema::{ChunkingMode, SegmenterConfig};
use crate::layout::{group_fragments, Geometry, GroupingMode};
use crate::model::{clamp_confidence, BBox, Chunk, ChunkType, Derivation, DocumentInput, Fragment, RawTable};
use line_item::{render_line_item, LineItemDetails};
use std::collections::BTreeSet;

pub use merge::merge_chunks;
pub use summary::{ChunkSummary, ConfidenceHistogram};

/// Confidence of chunks built from a detected table.
pub const TABLE_CONFIDENCE: f32 = 0.9;

/// Classify page content and materialise one chunk per classified group,
/// plus one `table_data` chunk per non-empty table.
pub fn build_chunks(doc: &DocumentInput, config: &SegmenterConfig) -> Vec<Chunk> {
    let chunks = match config.mode {
        ChunkingMode::Region => build_region_chunks(doc, config),
        ChunkingMode::Page => build_page_chunks(doc, config),
    };
    tracing::debug!(chunks = chunks.len(), mode = ?config.mode, "built chunks");
    chunks
}

/// Page numbers seen on pages or tables, ascending.
fn page_numbers(doc: &DocumentInput) -> BTreeSet<usize> {
    doc.pages
        .iter()
        .map(|p| p.page)
        .chain(doc.tables.iter().map(|t| t.page))
        .collect()
}

/// Non-empty fragments of one page number, plus that page's geometry.
fn page_fragments(doc: &DocumentInput, page_no: usize, config: &SegmenterConfig) -> (Vec<Fragment>, Geometry) {
    let pages: Vec<_> = doc.pages.iter().filter(|p| p.page == page_no).collect();
    let height = pages.iter().find_map(|p| p.height);
    let fragments = pages
        .iter()
        .flat_map(|p| p.fragments.iter())
        .filter(|f| !f.text.trim().is_empty())
        .cloned()
        .collect();
    (fragments, Geometry::new(config, height))
}

fn build_region_chunks(doc: &DocumentInput, config: &SegmenterConfig) -> Vec<Chunk> {
    let classifier = RegionClassifier::new(config);
    let mut chunks = Vec::new();

    for page_no in page_numbers(doc) {
        let (fragments, geometry) = page_fragments(doc, page_no, config);

        // (top elevation, chunk), top of page first
        let mut page_chunks: Vec<(f32, Chunk)> =
            group_fragments(fragments, config.region_tolerance, GroupingMode::Regions, &geometry)
                .into_iter()
                .flat_map(|group| classifier.classify_region(group, &geometry))
                .map(|(part, classification)| {
                    let chunk = chunk_from_fragments(part, &classification, " ", page_no);
                    (geometry.top(&chunk.bbox), chunk)
                })
                .collect();

        for table in doc.tables.iter().filter(|t| t.page == page_no) {
            let Some(chunk) = table_chunk(table) else {
                continue;
            };
            if table.bbox.is_empty() {
                page_chunks.push((f32::NEG_INFINITY, chunk));
                continue;
            }
            let top = geometry.top(&table.bbox);
            let at = table_anchor(&page_chunks, &table.bbox, &geometry);
            page_chunks.insert(at, (top, chunk));
        }

        tracing::debug!(page = page_no, chunks = page_chunks.len(), "page chunked");
        chunks.extend(page_chunks.into_iter().map(|(_, c)| c));
    }

    chunks
}

/// Insertion index of a table chunk among a page's region chunks.
///
/// Detected table boxes usually enclose their own header row: when the
/// first region lying inside the table box is a column header label, the
/// table goes right after it. Otherwise it goes before the first region
/// whose top is below the table's top.
fn table_anchor(page_chunks: &[(f32, Chunk)], table_bbox: &BBox, geometry: &Geometry) -> usize {
    let table_top = geometry.top(table_bbox);
    let table_bottom = geometry.bottom(table_bbox);
    let inside = |chunk: &Chunk| {
        !chunk.bbox.is_empty() && {
            let mid = (geometry.top(&chunk.bbox) + geometry.bottom(&chunk.bbox)) / 2.0;
            mid <= table_top && mid >= table_bottom
        }
    };

    if let Some(i) = page_chunks.iter().position(|(_, c)| inside(c)) {
        if page_chunks[i].1.is_column_header() {
            return i + 1;
        }
    }
    page_chunks
        .iter()
        .position(|(t, _)| *t < table_top)
        .unwrap_or(page_chunks.len())
}

fn build_page_chunks(doc: &DocumentInput, config: &SegmenterConfig) -> Vec<Chunk> {
    let classifier = RegionClassifier::new(config);
    let mut chunks = Vec::new();

    for page_no in page_numbers(doc) {
        let (mut fragments, geometry) = page_fragments(doc, page_no, config);
        fragments.sort_by(|a, b| geometry.top(&b.bbox).total_cmp(&geometry.top(&a.bbox)));

        let classified: Vec<(Fragment, Classification)> = fragments
            .into_iter()
            .map(|f| {
                let c = classifier.classify_fragment(&f, &geometry);
                (f, c)
            })
            .collect();

        for zone in ChunkType::ZONES {
            let (members, labels): (Vec<Fragment>, Vec<Classification>) = classified
                .iter()
                .filter(|(_, c)| c.chunk_type == zone)
                .cloned()
                .unzip();
            if members.is_empty() {
                continue;
            }
            let confidence =
                labels.iter().map(|c| c.confidence).sum::<f32>() / labels.len() as f32;
            let derivation = if labels.iter().all(|c| c.derivation == labels[0].derivation) {
                labels[0].derivation
            } else {
                Derivation::Mixed
            };
            let classification = Classification {
                chunk_type: zone,
                derivation,
                confidence,
                column_header: false,
            };
            chunks.push(chunk_from_fragments(members, &classification, "\n", page_no));
        }
    }

    chunks.extend(doc.tables.iter().filter_map(table_chunk));
    chunks
}

/// Build a chunk from classified fragments. Empty texts are left out of
/// the content.
pub fn chunk_from_fragments(
    fragments: Vec<Fragment>,
    classification: &Classification,
    separator: &str,
    page: usize,
) -> Chunk {
    let content = fragments
        .iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator);
    let bbox = BBox::enclosing(fragments.iter().map(|f| &f.bbox));

    Chunk {
        content,
        chunk_type: classification.chunk_type,
        source_fragments: fragments,
        bbox,
        page,
        confidence: clamp_confidence(classification.confidence),
        column_header: classification.column_header,
        derivation: classification.derivation,
    }
}

/// Render a detected table as labelled line-item blocks.
///
/// The first row is taken as the column header. For every data row with
/// at least two cells, the first cell is the description and the remaining
/// cells are read line by line as packed detail fields.
pub fn table_chunk(table: &RawTable) -> Option<Chunk> {
    if table.rows.is_empty() {
        tracing::warn!(table = table.id, page = table.page, "table has no rows, skipping");
        return None;
    }

    let mut content = String::from("TABLE: Invoice Line Items\n");
    content.push_str(&"=".repeat(50));
    content.push('\n');

    let header: Vec<&str> = table.rows[0].iter().map(|c| c.trim()).collect();
    if header.iter().any(|c| !c.is_empty()) {
        content.push_str(&format!("COLUMNS: {}\n", header.join(" | ")));
    }

    for (i, row) in table.data_rows().iter().enumerate() {
        if row.len() < 2 {
            continue;
        }
        let details = LineItemDetails::parse(&row[1..].join("\n"));
        content.push_str(&render_line_item(i + 1, row[0].trim(), &details));
    }

    Some(Chunk {
        content,
        chunk_type: ChunkType::TableData,
        source_fragments: Vec::new(),
        bbox: table.bbox,
        page: table.page,
        confidence: TABLE_CONFIDENCE,
        column_header: false,
        derivation: Derivation::Table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    fn frag(text: &str, bbox: [f32; 4], font: &str, size: f32) -> Fragment {
        Fragment::new(text, BBox::from(bbox), font, size)
    }

    fn invoice_page() -> Page {
        Page {
            page: 1,
            fragments: vec![
                frag("RECHNUNG", [50.0, 770.0, 200.0, 790.0], "Arial-Bold", 20.0),
                frag("Beschreibung", [50.0, 530.0, 150.0, 540.0], "Arial-Bold", 10.0),
                frag("Menge", [250.0, 530.0, 300.0, 540.0], "Arial-Bold", 10.0),
                frag("", [0.0, 0.0, 0.0, 0.0], "Arial", 10.0),
                frag("Gesamtbetrag: 1511,30 €", [420.0, 50.0, 520.0, 60.0], "Arial", 10.0),
            ],
            height: None,
        }
    }

    fn table(page: usize, bbox: [f32; 4]) -> RawTable {
        RawTable {
            id: 0,
            page,
            accuracy: 99.0,
            bbox: BBox::from(bbox),
            rows: vec![
                vec!["Beschreibung".into(), "Details".into()],
                vec!["Beratung".into(), "10,00\nStd.\n80,00 €\n19%\n800,00 €".into()],
                vec!["Einzelzelle".into()],
            ],
        }
    }

    #[test]
    fn test_region_chunks_interleave_tables_by_position() {
        let doc = DocumentInput {
            pages: vec![invoice_page()],
            tables: vec![table(1, [40.0, 300.0, 540.0, 520.0])],
        };
        let chunks = build_chunks(&doc, &SegmenterConfig::default());
        let types: Vec<ChunkType> = chunks.iter().map(|c| c.chunk_type).collect();
        assert_eq!(
            types,
            vec![
                ChunkType::Header,
                ChunkType::LineItems,
                ChunkType::TableData,
                ChunkType::Totals
            ]
        );
        assert!(chunks[1].column_header);
        assert_eq!(chunks[1].content, "Beschreibung Menge");
        assert_eq!(chunks[1].bbox, BBox::new(50.0, 530.0, 300.0, 540.0));
    }

    #[test]
    fn test_table_enclosing_its_header_row_follows_the_header() {
        let doc = DocumentInput {
            pages: vec![invoice_page()],
            tables: vec![table(1, [40.0, 300.0, 540.0, 545.0])],
        };
        let config = SegmenterConfig::default();
        let chunks = build_chunks(&doc, &config);
        let kinds: Vec<(ChunkType, bool)> =
            chunks.iter().map(|c| (c.chunk_type, c.column_header)).collect();
        assert_eq!(
            kinds,
            vec![
                (ChunkType::Header, false),
                (ChunkType::LineItems, true),
                (ChunkType::TableData, false),
                (ChunkType::Totals, false)
            ]
        );

        let merged = merge_chunks(chunks, &config);
        assert!(merged
            .iter()
            .any(|c| c.chunk_type == ChunkType::LineItems && c.content.contains("TABLE")));
    }

    #[test]
    fn test_region_mode_splits_right_margin_total_from_line_item() {
        let doc = DocumentInput {
            pages: vec![Page {
                page: 1,
                fragments: vec![
                    frag("Beratung vor Ort", [50.0, 440.0, 200.0, 450.0], "Arial", 10.0),
                    frag("10 x 80,00", [250.0, 440.0, 320.0, 450.0], "Arial", 10.0),
                    frag("800,00 €", [450.0, 440.0, 520.0, 450.0], "Arial", 10.0),
                ],
                height: None,
            }],
            tables: vec![],
        };
        let chunks = build_chunks(&doc, &SegmenterConfig::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_type, ChunkType::LineItems);
        assert_eq!(chunks[0].content, "Beratung vor Ort 10 x 80,00");
        assert_eq!(chunks[0].derivation, Derivation::Spatial);
        assert_eq!(chunks[1].chunk_type, ChunkType::Totals);
        assert_eq!(chunks[1].content, "800,00 €");
    }

    #[test]
    fn test_page_mode_one_chunk_per_zone() {
        let mut page = invoice_page();
        page.fragments
            .push(frag("Summe netto", [300.0, 90.0, 400.0, 100.0], "Arial", 10.0));
        let doc = DocumentInput {
            pages: vec![page],
            tables: vec![],
        };
        let config = SegmenterConfig {
            mode: ChunkingMode::Page,
            ..SegmenterConfig::default()
        };
        let chunks = build_chunks(&doc, &config);
        let totals: Vec<&Chunk> = chunks
            .iter()
            .filter(|c| c.chunk_type == ChunkType::Totals)
            .collect();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].content, "Summe netto\nGesamtbetrag: 1511,30 €");
        assert_eq!(totals[0].source_fragments.len(), 2);
        for chunk in &chunks {
            assert!((0.0..=1.0).contains(&chunk.confidence));
            assert!(!chunk.content.is_empty());
        }
    }

    #[test]
    fn test_table_chunk_content() {
        let chunk = table_chunk(&table(2, [0.0, 0.0, 0.0, 0.0])).unwrap();
        assert_eq!(chunk.chunk_type, ChunkType::TableData);
        assert_eq!(chunk.page, 2);
        assert_eq!(chunk.confidence, TABLE_CONFIDENCE);
        assert!(chunk.source_fragments.is_empty());
        assert!(chunk.content.starts_with("TABLE: Invoice Line Items\n"));
        assert!(chunk.content.contains("COLUMNS: Beschreibung | Details\n"));
        assert!(chunk.content.contains("LINE ITEM 1:\n  Description: Beratung\n  Quantity: 10,00\n"));
        assert!(chunk.content.contains("  Line Total: 800,00 €\n"));
        assert!(!chunk.content.contains("Einzelzelle"));
    }

    #[test]
    fn test_empty_table_skipped() {
        assert!(table_chunk(&RawTable::default()).is_none());
    }

    #[test]
    fn test_empty_document() {
        assert!(build_chunks(&DocumentInput::default(), &SegmenterConfig::default()).is_empty());
    }
}

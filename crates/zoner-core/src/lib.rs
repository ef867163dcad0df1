pub mod chunking;
pub mod classify;
pub mod config;
pub mod error;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod outcome;
pub mod parsing;
pub mod table;

use config::schema::SegmenterConfig;
use error::ZonerError;
use extraction::ExtractionSource;
use model::{DocumentInput, RawTable};
use outcome::{DocumentMeta, SegmentationResult};

/// Main API entry point: load a document through an extraction backend and
/// segment it.
pub fn segment_bytes(
    bytes: &[u8],
    source: &dyn ExtractionSource,
    config: &SegmenterConfig,
) -> Result<SegmentationResult, ZonerError> {
    let doc = source.load(bytes)?;
    tracing::debug!(
        backend = source.backend_name(),
        pages = doc.pages.len(),
        tables = doc.tables.len(),
        "loaded document"
    );
    Ok(segment_document(&doc, config))
}

/// Segment one document into classified chunks, and interpret its table.
///
/// Never fails: malformed parts of the input degrade to defaults.
pub fn segment_document(doc: &DocumentInput, config: &SegmenterConfig) -> SegmentationResult {
    let mut chunks = chunking::build_chunks(doc, config);
    if config.merge_chunks {
        chunks = chunking::merge_chunks(chunks, config);
    }
    let summary = chunking::ChunkSummary::from_chunks(&chunks);

    let detected_rows = layout::detect_table_rows(&doc.pages, config);
    let detected_headers = layout::detect_table_headers(&doc.pages);

    let fallback = (config.fallback_table_detection && doc.tables.is_empty() && !detected_rows.is_empty())
        .then(|| RawTable {
            page: 1,
            rows: detected_rows.clone(),
            ..RawTable::default()
        });
    let selected = table::select_table(&doc.tables).or(fallback.as_ref());

    // Position names are only matched against a table.
    let position_names = match selected {
        Some(t) => table::extract_position_names(&doc.pages, Some(t), config),
        None => Vec::new(),
    };
    let table_structure =
        selected.and_then(|t| table::reconstruct_table_structure(t, &position_names, config));
    let table_rendering = table_structure.as_ref().map(table::render_table_structure);

    let mut meta = DocumentMeta {
        page_count: doc.pages.len(),
        total_fragments: doc.fragment_count(),
        headers_found: detected_headers.len(),
        rows_found: detected_rows.len(),
        max_columns: detected_rows.iter().map(Vec::len).max().unwrap_or(0),
        positions_found: position_names.len(),
        ..DocumentMeta::default()
    };
    for fragment in doc.pages.iter().flat_map(|p| &p.fragments) {
        meta.roles.record(fragment.role());
    }

    tracing::info!(
        chunks = chunks.len(),
        pages = meta.page_count,
        fragments = meta.total_fragments,
        table = table_structure.is_some(),
        positions = meta.positions_found,
        "segmented document"
    );

    SegmentationResult {
        chunks,
        summary,
        table_structure,
        table_rendering,
        position_names,
        meta,
    }
}

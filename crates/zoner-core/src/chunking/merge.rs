use crate::config::schema::SegmenterConfig;
use crate::layout::Geometry;
use crate::model::{Chunk, ChunkType, Derivation};

/// Fuse adjacent chunks that belong together.
///
/// A single left-to-right pass: each chunk is compared with the one right
/// after it, and a merged pair is not reconsidered against its new
/// neighbour. The output never has more chunks than the input.
pub fn merge_chunks(chunks: Vec<Chunk>, config: &SegmenterConfig) -> Vec<Chunk> {
    let before = chunks.len();
    let geometry = Geometry::new(config, None);

    let mut merged = Vec::with_capacity(before);
    let mut iter = chunks.into_iter().peekable();
    while let Some(current) = iter.next() {
        match iter.next_if(|next| should_merge(&current, next, config.merge_gap, &geometry)) {
            Some(next) => merged.push(merge_two(current, next)),
            None => merged.push(current),
        }
    }

    tracing::debug!(before, after = merged.len(), "merged chunks");
    merged
}

/// A column header followed by table data, or two chunks on the same page
/// whose facing edges are closer than `gap`.
pub fn should_merge(current: &Chunk, next: &Chunk, gap: f32, geometry: &Geometry) -> bool {
    if is_header_table_pair(current, next) {
        return true;
    }
    if current.page != next.page || current.bbox.is_empty() || next.bbox.is_empty() {
        return false;
    }
    (geometry.bottom(&current.bbox) - geometry.top(&next.bbox)).abs() < gap
}

fn is_header_table_pair(current: &Chunk, next: &Chunk) -> bool {
    current.is_column_header() && next.chunk_type == ChunkType::TableData
}

fn merge_two(first: Chunk, second: Chunk) -> Chunk {
    let chunk_type = if is_header_table_pair(&first, &second) {
        ChunkType::LineItems
    } else if first.confidence > second.confidence {
        first.chunk_type
    } else {
        second.chunk_type
    };

    let mut source_fragments = first.source_fragments;
    source_fragments.extend(second.source_fragments);

    Chunk {
        content: format!("{}\n{}", first.content, second.content),
        chunk_type,
        source_fragments,
        bbox: first.bbox.union(&second.bbox),
        page: first.page,
        confidence: first.confidence.max(second.confidence),
        column_header: false,
        derivation: Derivation::Merged,
    }
}

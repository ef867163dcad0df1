use crate::model::{Chunk, ChunkType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Chunks per confidence band: high `>= 0.8`, medium `[0.5, 0.8)`, low `< 0.5`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceHistogram {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub total_chunks: usize,
    pub chunk_types: BTreeMap<ChunkType, usize>,
    /// Mean content length in characters.
    pub average_chunk_size: f64,
    pub chunks_by_confidence: ConfidenceHistogram,
}

impl ChunkSummary {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let mut summary = ChunkSummary {
            total_chunks: chunks.len(),
            ..Default::default()
        };
        if chunks.is_empty() {
            return summary;
        }

        let mut total_chars = 0usize;
        for chunk in chunks {
            *summary.chunk_types.entry(chunk.chunk_type).or_insert(0) += 1;
            total_chars += chunk.content.chars().count();

            let band = &mut summary.chunks_by_confidence;
            if chunk.confidence >= 0.8 {
                band.high += 1;
            } else if chunk.confidence >= 0.5 {
                band.medium += 1;
            } else {
                band.low += 1;
            }
        }
        summary.average_chunk_size = total_chars as f64 / chunks.len() as f64;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Derivation};

    fn chunk(content: &str, chunk_type: ChunkType, confidence: f32) -> Chunk {
        Chunk {
            content: content.into(),
            chunk_type,
            source_fragments: Vec::new(),
            bbox: BBox::EMPTY,
            page: 1,
            confidence,
            column_header: false,
            derivation: Derivation::Spatial,
        }
    }

    #[test]
    fn test_summary_counts() {
        let chunks = vec![
            chunk("Rechnung", ChunkType::Header, 0.8),
            chunk("Summe", ChunkType::Totals, 0.5),
            chunk("Gesamt €", ChunkType::Totals, 0.3),
            chunk("ab", ChunkType::Footer, 0.79),
        ];
        let s = ChunkSummary::from_chunks(&chunks);
        assert_eq!(s.total_chunks, 4);
        assert_eq!(s.chunk_types[&ChunkType::Totals], 2);
        assert_eq!(s.chunk_types.get(&ChunkType::LineItems), None);
        // 8 + 5 + 8 + 2 characters
        assert_eq!(s.average_chunk_size, 5.75);
        assert_eq!(
            s.chunks_by_confidence,
            ConfidenceHistogram {
                high: 1,
                medium: 2,
                low: 1
            }
        );
    }

    #[test]
    fn test_empty_summary() {
        let s = ChunkSummary::from_chunks(&[]);
        assert_eq!(s.total_chunks, 0);
        assert_eq!(s.average_chunk_size, 0.0);
        assert!(s.chunk_types.is_empty());
    }
}

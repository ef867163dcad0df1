pub mod chunk;
pub mod config;
pub mod table;

use zoner_core::config::schema::SegmenterConfig;
use zoner_core::error::ZonerError;
use zoner_core::extraction::json::JsonExtraction;
use zoner_core::outcome::SegmentationResult;
use std::path::{Path, PathBuf};

/// Config from `path`, or the defaults.
pub fn load_config(path: Option<PathBuf>) -> Result<SegmenterConfig, ZonerError> {
    match path {
        Some(p) => zoner_core::config::load_config(&p),
        None => Ok(SegmenterConfig::default()),
    }
}

/// Read an extraction JSON file and segment it.
pub fn segment_file(input_file: &Path, config: &SegmenterConfig) -> Result<SegmentationResult, ZonerError> {
    let bytes = std::fs::read(input_file)?;
    zoner_core::segment_bytes(&bytes, &JsonExtraction::new(), config)
}

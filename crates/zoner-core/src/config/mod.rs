pub mod schema;

use crate::error::ZonerError;
use schema::SegmenterConfig;
use std::path::Path;

/// Load a config from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<SegmenterConfig, ZonerError> {
    let content = std::fs::read_to_string(path).map_err(|e| ZonerError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: SegmenterConfig =
        serde_json::from_str(&content).map_err(|e| ZonerError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<SegmenterConfig, ZonerError> {
    let config: SegmenterConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable.
pub fn validate_config(config: &SegmenterConfig) -> Result<(), ZonerError> {
    let distances = [
        ("row_tolerance", config.row_tolerance),
        ("region_tolerance", config.region_tolerance),
        ("merge_gap", config.merge_gap),
        ("large_font_size", config.large_font_size),
    ];
    for (name, value) in distances {
        if !value.is_finite() || value < 0.0 {
            return Err(ZonerError::ConfigInvalid(format!(
                "{name} must be a finite, non-negative number (got {value})"
            )));
        }
    }

    let positions = [
        ("right_margin_x", config.right_margin_x),
        ("header_min_elevation", config.header_min_elevation),
        ("totals_max_elevation", config.totals_max_elevation),
        ("address_min_elevation", config.address_min_elevation),
        ("page_midpoint", config.page_midpoint),
    ];
    for (name, value) in positions {
        if !value.is_finite() {
            return Err(ZonerError::ConfigInvalid(format!(
                "{name} must be finite (got {value})"
            )));
        }
    }

    if !config.page_height.is_finite() || config.page_height <= 0.0 {
        return Err(ZonerError::ConfigInvalid(format!(
            "page_height must be positive (got {})",
            config.page_height
        )));
    }

    let keyword_lists = [
        ("totals_keywords", &config.totals_keywords),
        ("summary_keywords", &config.summary_keywords),
        ("description_keywords", &config.description_keywords),
    ];
    for (name, list) in keyword_lists {
        if list.is_empty() {
            return Err(ZonerError::ConfigInvalid(format!("{name} must not be empty")));
        }
        if list.iter().any(|k| k.trim().is_empty()) {
            return Err(ZonerError::ConfigInvalid(format!(
                "{name} must not contain blank keywords"
            )));
        }
    }

    Ok(())
}

use zoner_core::config::schema::SegmenterConfig;
use zoner_core::error::ZonerError;
use std::path::Path;

use crate::output;

pub fn show() -> Result<(), ZonerError> {
    output::json::print(&SegmenterConfig::default())
}

pub fn validate(file: &Path) -> Result<(), ZonerError> {
    let config = zoner_core::config::load_config(file)?;
    println!(
        "Config is valid: {:?} axis, {:?} mode, {} totals keyword(s)",
        config.axis,
        config.mode,
        config.totals_keywords.len()
    );
    Ok(())
}

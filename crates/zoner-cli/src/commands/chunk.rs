use zoner_core::config::schema::ChunkingMode;
use zoner_core::error::ZonerError;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    config_file: Option<PathBuf>,
    mode: Option<&str>,
    no_merge: bool,
) -> Result<(), ZonerError> {
    let mut config = super::load_config(config_file)?;
    if let Some(mode) = mode {
        config.mode = match mode.to_lowercase().as_str() {
            "region" => ChunkingMode::Region,
            "page" => ChunkingMode::Page,
            other => {
                return Err(ZonerError::ConfigInvalid(format!(
                    "unknown chunking mode '{other}', expected 'region' or 'page'"
                )))
            }
        };
    }
    if no_merge {
        config.merge_chunks = false;
    }

    let result = super::segment_file(&input_file, &config)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print_chunks(&result),
    }

    Ok(())
}

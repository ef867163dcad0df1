use serde_json::json;
use zoner_core::error::ZonerError;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    config_file: Option<PathBuf>,
) -> Result<(), ZonerError> {
    let config = super::load_config(config_file)?;
    let result = super::segment_file(&input_file, &config)?;

    match output_format {
        "json" => output::json::print(&json!({
            "table_structure": result.table_structure,
            "position_names": result.position_names,
        }))?,
        _ => output::table::print_table(&result),
    }

    Ok(())
}

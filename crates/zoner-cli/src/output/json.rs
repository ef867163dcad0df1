use serde::Serialize;
use zoner_core::error::ZonerError;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), ZonerError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub mod json;

use crate::error::ZonerError;
use crate::model::DocumentInput;

/// Trait for upstream extraction backends.
///
/// A backend turns whatever it is handed (PDF bytes, a cached JSON dump, ...)
/// into positioned fragments and detected tables for one document.
pub trait ExtractionSource: Send + Sync {
    /// Load one document's fragments and tables.
    fn load(&self, bytes: &[u8]) -> Result<DocumentInput, ZonerError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

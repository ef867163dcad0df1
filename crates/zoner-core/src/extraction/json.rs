use crate::error::ZonerError;
use crate::extraction::ExtractionSource;
use crate::model::{DocumentInput, Page, RawTable};
use serde::Deserialize;

/// Reads the JSON written by the text/table extractors.
///
/// Accepts the flat shape `{"pages": [...], "tables": [...]}` and the
/// combined shape `{"text_extraction": {"pages": [...]}, "table_extraction":
/// {"tables": [...]}}`. When both are present the flat keys win.
pub struct JsonExtraction;

impl JsonExtraction {
    pub fn new() -> Self {
        JsonExtraction
    }
}

impl Default for JsonExtraction {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct TextExtraction {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Deserialize)]
struct TableExtraction {
    #[serde(default)]
    tables: Vec<RawTable>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    pages: Option<Vec<Page>>,
    #[serde(default)]
    tables: Option<Vec<RawTable>>,
    #[serde(default)]
    text_extraction: Option<TextExtraction>,
    #[serde(default)]
    table_extraction: Option<TableExtraction>,
}

impl ExtractionSource for JsonExtraction {
    fn load(&self, bytes: &[u8]) -> Result<DocumentInput, ZonerError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(DocumentInput::default());
        }

        let raw: RawDocument =
            serde_json::from_slice(bytes).map_err(|e| ZonerError::InputParse(e.to_string()))?;

        let pages = raw
            .pages
            .or_else(|| raw.text_extraction.map(|t| t.pages))
            .unwrap_or_default();
        let tables = raw
            .tables
            .or_else(|| raw.table_extraction.map(|t| t.tables))
            .unwrap_or_default();

        Ok(DocumentInput { pages, tables }.normalized())
    }

    fn backend_name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_flat_shape() {
        let json = br#"{
            "pages": [
                { "elements": [ { "text": "Rechnung", "bbox": [50, 780, 150, 800], "font": "Arial-Bold", "size": 18 } ] }
            ],
            "tables": [ { "id": 0, "page": 1, "rows": [["Beschreibung", "Menge"]] } ]
        }"#;
        let doc = JsonExtraction::new().load(json).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].page, 1);
        assert_eq!(doc.pages[0].fragments[0].page, 1);
        assert_eq!(doc.pages[0].fragments[0].font_size, 18.0);
        assert_eq!(doc.tables.len(), 1);
    }

    #[test]
    fn test_load_combined_shape() {
        let json = br#"{
            "text_extraction": { "method": "pdfplumber", "pages": [
                { "page": 2, "page_height": 842, "elements": [ { "text": "Seite 2" } ] }
            ] },
            "table_extraction": { "method": "camelot", "table_count": 1, "tables": [
                { "table_id": 7, "page": 2, "accuracy": 97.5, "data": [["a", "b"]] }
            ] },
            "metadata": { "total_pages": 1 }
        }"#;
        let doc = JsonExtraction::new().load(json).unwrap();
        assert_eq!(doc.pages[0].page, 2);
        assert_eq!(doc.pages[0].height, Some(842.0));
        assert_eq!(doc.pages[0].fragments[0].page, 2);
        assert_eq!(doc.tables[0].id, 7);
    }

    #[test]
    fn test_empty_input_is_empty_document() {
        let doc = JsonExtraction::new().load(b"  \n").unwrap();
        assert!(doc.pages.is_empty());
        assert!(doc.tables.is_empty());

        let doc = JsonExtraction::new().load(b"{}").unwrap();
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = JsonExtraction::new().load(b"{ not json").unwrap_err();
        assert!(matches!(err, ZonerError::InputParse(_)));
    }
}

//! Ordered pattern tables and shared token patterns.
//!
//! The content table is a sequence, not a map: categories are tested in
//! the listed order and the first matching pattern decides.

use crate::model::ChunkType;
use regex::Regex;
use std::sync::LazyLock;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("static pattern"))
        .collect()
}

/// Category -> patterns, in priority order.
pub static CONTENT_PATTERNS: LazyLock<Vec<(ChunkType, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            ChunkType::Header,
            compile(&[
                r"invoice\s*#?\s*\d+",
                r"bill\s*#?\s*\d+",
                r"date\s*:?\s*\d{1,2}[/-]\d{1,2}[/-]\d{2,4}",
                r"invoice\s*date",
                r"due\s*date",
                r"rechnung\s*(?:nr\.?|nummer)?\s*:?\s*\d+",
                r"rechnungsdatum",
            ]),
        ),
        (
            ChunkType::Addresses,
            compile(&[
                r"bill\s*to\s*:?",
                r"ship\s*to\s*:?",
                r"sold\s*to\s*:?",
                r"customer\s*:?",
                r"\d+\s+[a-z\s]+\s+(?:st|ave|rd|blvd|drive|lane)\b",
                r"[a-z\s]+,\s*[a-z]{2}\s*\d{5}",
                r"rechnungsempfänger|lieferanschrift",
            ]),
        ),
        (
            ChunkType::LineItems,
            compile(&[
                r"description|beschreibung",
                r"quantity|qty|menge",
                r"price|rate|amount|einzelpreis",
                r"item\s*#?",
                r"product",
                r"service",
            ]),
        ),
        (
            ChunkType::Totals,
            compile(&[
                r"subtotal|sub\s*total",
                r"tax|vat",
                r"total|grand\s*total",
                r"amount\s*due",
                r"balance",
                r"discount",
            ]),
        ),
    ]
});

/// Column names of a line-item table header.
pub static COLUMN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)description|beschreibung|artikel|article|quantity|\bqty\b|menge|anzahl|price|preis|einheit|\bunit\b|\bitem\b|product|service|leistung|\bpos(?:ition|\.)?(?:\b|$)",
    )
    .expect("static pattern")
});

/// A money amount with a currency marker on either side.
pub static CURRENCY_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[€$£]\s*\d+(?:[.,']\d+)*|\d+(?:[.,']\d+)*\s*(?:€|\$|£|\beur\b|\busd\b|\bgbp\b)")
        .expect("static pattern")
});

/// A number with a decimal part.
pub static DECIMAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[.,]\d+").expect("static pattern"));

/// Prices with cents or `n x m` quantities.
pub static QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+[.,]\d{2}|\d+\s*x\s*\d+").expect("static pattern"));

/// House number + street, English or German style.
pub static STREET_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s+[a-z\s]+(?:st|ave|rd|blvd)\b|[a-zäöüß]+(?:straße|strasse|str\.)\s*\d+")
        .expect("static pattern")
});

/// Any digit, currency or percent sign.
pub static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d|[€$£%]").expect("static pattern"));

/// Only digits and separators.
pub static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s.,]*\d[\d\s.,]*$").expect("static pattern"));

pub fn has_money_marker(text: &str) -> bool {
    text.contains(['€', '$', '£', '%'])
}

/// First category in [`CONTENT_PATTERNS`] with a matching pattern.
pub fn first_content_match(text: &str) -> Option<ChunkType> {
    CONTENT_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(text)))
        .map(|(chunk_type, _)| *chunk_type)
}

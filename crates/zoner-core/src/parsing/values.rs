use crate::error::ZonerError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a money, quantity or percentage string into a decimal.
///
/// Handles formats like:
/// - "80,00 €" -> 80.00 (decimal comma)
/// - "1.511,30 €" -> 1511.30 (dot thousands, comma decimals)
/// - "$1,200.50" -> 1200.50 (comma thousands, dot decimals)
/// - "19 %" -> 19
/// - "1'250.00 CHF" -> 1250.00
/// - "", "-", "N/A" -> None
pub fn parse_amount(s: &str) -> Result<Option<Decimal>, ZonerError> {
    let s = s.trim();

    if s.is_empty() || s == "-" || s == "—" || s.eq_ignore_ascii_case("n/a") || s == "n.a." {
        return Ok(None);
    }

    let stripped = strip_currency(s);
    if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '\'')) {
        return Err(ZonerError::Parse(format!("invalid amount '{s}'")));
    }

    let normalized = normalize_separators(&stripped.replace('\'', ""));
    Decimal::from_str(&normalized)
        .map(Some)
        .map_err(|e| ZonerError::Parse(format!("invalid amount '{s}': {e}")))
}

/// Drop currency symbols/codes, percent signs and whitespace.
fn strip_currency(s: &str) -> String {
    let upper = s.to_uppercase();
    let without_codes = ["EUR", "USD", "GBP", "CHF"]
        .iter()
        .fold(upper, |acc, code| acc.replace(code, ""));
    without_codes
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '€' | '$' | '£' | '%'))
        .collect()
}

/// Rewrite to a plain dot-decimal number.
///
/// With both separators present the last one is the decimal mark. A lone
/// comma is a decimal comma; repeated dots are thousands separators.
fn normalize_separators(s: &str) -> String {
    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');
    match (last_dot, last_comma) {
        (Some(d), Some(c)) if c > d => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) => {
            if s.matches(',').count() > 1 {
                s.replace(',', "")
            } else {
                s.replace(',', ".")
            }
        }
        (Some(_), None) => {
            if s.matches('.').count() > 1 {
                s.replace('.', "")
            } else {
                s.to_string()
            }
        }
        (None, None) => s.to_string(),
    }
}

//! Parsing of packed line-item detail cells.
//!
//! Table detectors often return the quantity, unit, unit price, tax rate
//! and line total of an invoice row stacked in one cell, one per line.

use crate::parsing::values::parse_amount;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::LazyLock;

/// Sub-fields recovered from a detail cell. Unrecognised lines are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_total: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineRule {
    Quantity,
    Unit,
    Money,
    TaxRate,
}

/// Tested in order; the first matching rule claims the line.
static LINE_RULES: LazyLock<Vec<(LineRule, Regex)>> = LazyLock::new(|| {
    [
        (LineRule::Quantity, r"^\d+[,.]?\d*$"),
        (LineRule::Unit, r"(?i)^(?:std\.|stk\.|st\.|stück|hours?|pcs?)\.?$"),
        (LineRule::Money, r"\d+[,.]?\d*\s*[€$£]|[€$£]\s*\d"),
        (LineRule::TaxRate, r"\d+(?:[.,]\d+)?\s*%"),
    ]
    .into_iter()
    .map(|(rule, pattern)| (rule, Regex::new(pattern).expect("static pattern")))
    .collect()
});

/// Fills [`LineItemDetails`] one line at a time. Each field keeps its first value.
#[derive(Debug, Default)]
pub struct LineItemBuilder {
    details: LineItemDetails,
}

impl LineItemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) -> &mut Self {
        let line = line.trim();
        if line.is_empty() {
            return self;
        }

        let rule = LINE_RULES
            .iter()
            .find(|(_, re)| re.is_match(line))
            .map(|(rule, _)| *rule);

        let d = &mut self.details;
        match rule {
            Some(LineRule::Quantity) => fill(&mut d.quantity, line),
            Some(LineRule::Unit) => fill(&mut d.unit, line),
            Some(LineRule::Money) => {
                if d.unit_price.is_none() {
                    d.unit_price = Some(line.to_string());
                } else {
                    fill(&mut d.line_total, line);
                }
            }
            Some(LineRule::TaxRate) => fill(&mut d.tax_rate, line),
            None => tracing::trace!(line, "unrecognised line-item detail"),
        }
        self
    }

    pub fn build(self) -> LineItemDetails {
        self.details
    }
}

fn fill(slot: &mut Option<String>, line: &str) {
    if slot.is_none() {
        *slot = Some(line.to_string());
    }
}

impl LineItemDetails {
    /// Parse a detail cell (sub-fields separated by line breaks).
    pub fn parse(text: &str) -> Self {
        let mut builder = LineItemBuilder::new();
        for line in text.lines() {
            builder.push_line(line);
        }
        builder.build()
    }

    pub fn quantity_value(&self) -> Option<Decimal> {
        numeric(&self.quantity)
    }

    pub fn unit_price_value(&self) -> Option<Decimal> {
        numeric(&self.unit_price)
    }

    pub fn line_total_value(&self) -> Option<Decimal> {
        numeric(&self.line_total)
    }

    pub fn tax_rate_value(&self) -> Option<Decimal> {
        numeric(&self.tax_rate)
    }
}

fn numeric(field: &Option<String>) -> Option<Decimal> {
    field.as_deref().and_then(|s| parse_amount(s).ok().flatten())
}

/// Render one table row as a labelled block.
pub fn render_line_item(index: usize, description: &str, details: &LineItemDetails) -> String {
    let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    let mut out = String::new();
    let _ = writeln!(out, "LINE ITEM {index}:");
    let _ = writeln!(out, "  Description: {description}");
    let _ = writeln!(out, "  Quantity: {}", na(&details.quantity));
    let _ = writeln!(out, "  Unit: {}", na(&details.unit));
    let _ = writeln!(out, "  Unit Price: {}", na(&details.unit_price));
    let _ = writeln!(out, "  Tax Rate: {}", na(&details.tax_rate));
    let _ = writeln!(out, "  Line Total: {}", na(&details.line_total));
    out.push_str(&"-".repeat(30));
    out.push('\n');
    out
}

use rust_decimal::Decimal;
use zoner_core::chunking::line_item::LineItemDetails;
use zoner_core::outcome::SegmentationResult;
use zoner_core::parsing::parse_amount;
use zoner_core::table::TableItem;

pub fn print_chunks(result: &SegmentationResult) {
    if result.chunks.is_empty() {
        println!("No chunks (document has no text).");
        return;
    }

    for (i, chunk) in result.chunks.iter().enumerate() {
        println!(
            "[{}] {} (page {}, confidence {:.2}, {:?})",
            i + 1,
            chunk.chunk_type,
            chunk.page,
            chunk.confidence,
            chunk.derivation
        );
        for line in chunk.content.lines() {
            println!("    {line}");
        }
        println!();
    }

    let s = &result.summary;
    println!("=== Summary ===\n");
    println!("  Chunks:       {}", s.total_chunks);
    for (chunk_type, count) in &s.chunk_types {
        println!("    {:<12} {}", chunk_type.as_str(), count);
    }
    println!("  Average size: {:.1} chars", s.average_chunk_size);
    println!(
        "  Confidence:   {} high, {} medium, {} low",
        s.chunks_by_confidence.high, s.chunks_by_confidence.medium, s.chunks_by_confidence.low
    );
}

pub fn print_table(result: &SegmentationResult) {
    let (Some(table), Some(rendering)) = (&result.table_structure, &result.table_rendering) else {
        println!("No table detected.");
        return;
    };

    println!("{rendering}\n");

    let totals: Vec<Decimal> = table.items.iter().filter_map(line_total).collect();
    if totals.is_empty() {
        return;
    }
    let sum: Decimal = totals.iter().sum();
    println!(
        "Line totals: {} of {} item(s) parsed, sum {}",
        totals.len(),
        table.items.len(),
        sum
    );
    for row in &table.summary_rows {
        let label = row.first().map(|c| c.trim()).unwrap_or("");
        if let Some(amount) = last_amount(row) {
            let marker = if amount == sum { "matches" } else { "differs" };
            println!("  {label}: {amount} ({marker})");
        }
    }
}

/// Line total of an item: the packed detail fields first, then the last amount in the row.
fn line_total(item: &TableItem) -> Option<Decimal> {
    let details = item
        .raw_row
        .get(1..)
        .map(|cells| LineItemDetails::parse(&cells.join("\n")))
        .unwrap_or_default();
    details.line_total_value().or_else(|| last_amount(&item.raw_row))
}

fn last_amount(row: &[String]) -> Option<Decimal> {
    row.iter()
        .rev()
        .find_map(|cell| parse_amount(cell).ok().flatten())
}

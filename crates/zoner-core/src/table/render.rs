use super::TableStructure;

fn cell(value: &str) -> String {
    format!("{value:<15}")
}

fn row_line<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values.into_iter().map(cell).collect::<Vec<_>>().join(" | ")
}

/// Fixed-width text rendering of a reconstructed table.
pub fn render_table_structure(table: &TableStructure) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !table.headers.is_empty() {
        lines.push("=".repeat(80));
        lines.push("TABLE STRUCTURE".to_string());
        lines.push("=".repeat(80));
        let header = row_line(table.headers.iter().map(String::as_str));
        let rule = "-".repeat(header.chars().count());
        lines.push(header);
        lines.push(rule);
    }

    for (i, item) in table.items.iter().enumerate() {
        let n = i + 1;
        let name = item
            .position_name
            .clone()
            .unwrap_or_else(|| format!("Item {n}"));
        lines.push(format!("\nITEM {n}: {name}"));
        lines.push(row_line(
            table
                .headers
                .iter()
                .map(|h| item.cells.get(h).map(String::as_str).unwrap_or("")),
        ));
    }

    if !table.summary_rows.is_empty() {
        lines.push(format!("\n{}", "=".repeat(40)));
        lines.push("SUMMARY".to_string());
        lines.push("=".repeat(40));
        for row in &table.summary_rows {
            lines.push(row_line(row.iter().map(String::as_str)));
        }
    }

    lines.join("\n")
}

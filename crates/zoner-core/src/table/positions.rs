use crate::classify::patterns::{has_money_marker, BARE_NUMBER, NUMERIC_TOKEN};
use crate::config::schema::SegmenterConfig;
use crate::layout::Geometry;
use crate::model::{Fragment, Page, PositionName, PositionSource, RawTable};
use std::collections::HashSet;

/// Fragments scanned after a candidate for a quantity or price.
const LOOKAHEAD: usize = 3;

/// Collect line-item names from the table's description column and from
/// page text, first occurrence of a name wins.
pub fn extract_position_names(
    pages: &[Page],
    table: Option<&RawTable>,
    config: &SegmenterConfig,
) -> Vec<PositionName> {
    let mut seen = HashSet::new();
    let names: Vec<PositionName> = table
        .map(|t| from_description_column(t, config))
        .unwrap_or_default()
        .into_iter()
        .chain(from_page_content(pages, config))
        .filter(|p| seen.insert(p.name.clone()))
        .collect();

    tracing::debug!(count = names.len(), "extracted position names");
    names
}

fn is_numeric_value(text: &str) -> bool {
    BARE_NUMBER.is_match(text) || has_money_marker(text)
}

fn from_description_column(table: &RawTable, config: &SegmenterConfig) -> Vec<PositionName> {
    let Some(header) = table.rows.first() else {
        return Vec::new();
    };
    let Some(column) = header.iter().position(|cell| {
        let lower = cell.to_lowercase();
        config
            .description_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()))
    }) else {
        return Vec::new();
    };

    table
        .data_rows()
        .iter()
        .filter_map(|row| row.get(column))
        .map(|cell| cell.trim())
        .filter(|value| !value.is_empty() && !is_numeric_value(value))
        .map(|value| PositionName {
            name: value.to_string(),
            source: PositionSource::TableColumn,
            bbox: None,
        })
        .collect()
}

/// Python-style `isupper`: at least one cased letter and no lowercase ones.
fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

fn is_candidate(text: &str) -> bool {
    text.split_whitespace().count() >= 2
        && text.chars().count() > 5
        && !is_all_uppercase(text)
        && !is_numeric_value(text)
}

fn from_page_content(pages: &[Page], config: &SegmenterConfig) -> Vec<PositionName> {
    let mut names = Vec::new();
    for page in pages {
        let geometry = Geometry::new(config, page.height);
        let mut fragments: Vec<&Fragment> = page
            .fragments
            .iter()
            .filter(|f| !f.text.trim().is_empty())
            .collect();
        fragments.sort_by(|a, b| geometry.top(&b.bbox).total_cmp(&geometry.top(&a.bbox)));

        for (i, fragment) in fragments.iter().enumerate() {
            let text = fragment.text.trim();
            if !is_candidate(text) {
                continue;
            }
            let followed_by_number = fragments[i + 1..]
                .iter()
                .take(LOOKAHEAD)
                .any(|next| NUMERIC_TOKEN.is_match(&next.text));
            if followed_by_number {
                names.push(PositionName {
                    name: text.to_string(),
                    source: PositionSource::ContentHeuristic,
                    bbox: Some(fragment.bbox),
                });
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn frag(text: &str, top: f32) -> Fragment {
        Fragment::new(text, BBox::new(50.0, top - 10.0, 200.0, top), "Arial", 10.0)
    }

    fn page(fragments: Vec<Fragment>) -> Page {
        Page {
            page: 1,
            fragments,
            height: None,
        }
    }

    fn table() -> RawTable {
        RawTable {
            rows: vec![
                vec!["Pos".into(), "Beschreibung".into(), "Betrag".into()],
                vec!["1".into(), "Beratung vor Ort".into(), "800,00 €".into()],
                vec!["2".into(), "1.200".into(), "5,00 €".into()],
                vec!["3".into(), "  ".into(), "5,00 €".into()],
                vec!["4".into(), "Rabatt 10%".into(), "-5,00 €".into()],
                vec!["5".into()],
            ],
            ..RawTable::default()
        }
    }

    #[test]
    fn test_description_column() {
        let names = extract_position_names(&[], Some(&table()), &SegmenterConfig::default());
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, "Beratung vor Ort");
        assert_eq!(names[0].source, PositionSource::TableColumn);
    }

    #[test]
    fn test_content_heuristic_needs_following_number() {
        let pages = vec![page(vec![
            frag("Vielen Dank für Ihren Auftrag", 100.0),
            frag("Wartung der Anlage", 500.0),
            frag("Stück", 490.0),
            frag("2", 480.0),
            frag("RECHNUNG NUMMER", 700.0),
            frag("1.511,30", 690.0),
        ])];
        let names = extract_position_names(&pages, None, &SegmenterConfig::default());
        let texts: Vec<&str> = names.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(texts, vec!["Wartung der Anlage"]);
        assert_eq!(names[0].source, PositionSource::ContentHeuristic);
        assert!(names[0].bbox.is_some());
    }

    #[test]
    fn test_lookahead_is_three_fragments() {
        let pages = vec![page(vec![
            frag("Montage und Einbau", 500.0),
            frag("a", 490.0),
            frag("b", 480.0),
            frag("c", 470.0),
            frag("4", 460.0),
        ])];
        assert!(extract_position_names(&pages, None, &SegmenterConfig::default()).is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_source() {
        let pages = vec![page(vec![
            frag("Beratung vor Ort", 500.0),
            frag("800,00 €", 490.0),
        ])];
        let names = extract_position_names(&pages, Some(&table()), &SegmenterConfig::default());
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].source, PositionSource::TableColumn);
    }

    #[test]
    fn test_no_input() {
        assert!(extract_position_names(&[], None, &SegmenterConfig::default()).is_empty());
    }
}

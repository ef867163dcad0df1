use crate::layout::Geometry;
use crate::model::Fragment;

/// What the groups are used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// Table-row detection: groups with fewer than two cells are dropped.
    TableRows,
    /// General region grouping: every group is kept.
    Regions,
}

/// Group fragments that share one visual line or region.
///
/// Fragments are ordered top of page first. Walking that order, a fragment
/// joins the current group when its top edge is within `tolerance` of the
/// top edge of the fragment right before it; otherwise it opens a new
/// group. The pass is greedy and never revisits a group. Each finished
/// group is ordered left to right.
pub fn group_fragments(
    mut fragments: Vec<Fragment>,
    tolerance: f32,
    mode: GroupingMode,
    geometry: &Geometry,
) -> Vec<Vec<Fragment>> {
    // Stable sort keeps input order among equal tops.
    fragments.sort_by(|a, b| geometry.top(&b.bbox).total_cmp(&geometry.top(&a.bbox)));

    let mut groups: Vec<Vec<Fragment>> = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();
    let mut last_top: Option<f32> = None;

    for fragment in fragments {
        let top = geometry.top(&fragment.bbox);
        match last_top {
            Some(prev) if (prev - top).abs() <= tolerance => current.push(fragment),
            Some(_) => {
                groups.push(std::mem::take(&mut current));
                current.push(fragment);
            }
            None => current.push(fragment),
        }
        last_top = Some(top);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    for group in &mut groups {
        group.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }

    if mode == GroupingMode::TableRows {
        groups.retain(|g| g.len() >= 2);
    }

    tracing::debug!(
        groups = groups.len(),
        tolerance,
        ?mode,
        "grouped fragments"
    );

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SegmenterConfig;
    use crate::model::BBox;

    fn frag(text: &str, x0: f32, top: f32) -> Fragment {
        Fragment::new(text, BBox::new(x0, top - 10.0, x0 + 40.0, top), "Arial", 10.0)
    }

    fn texts(groups: &[Vec<Fragment>]) -> Vec<Vec<&str>> {
        groups
            .iter()
            .map(|g| g.iter().map(|f| f.text.as_str()).collect())
            .collect()
    }

    fn geometry() -> Geometry {
        Geometry::new(&SegmenterConfig::default(), None)
    }

    #[test]
    fn test_rows_top_first_and_left_to_right() {
        let fragments = vec![
            frag("b2", 200.0, 600.0),
            frag("a1", 50.0, 700.0),
            frag("a2", 200.0, 702.0),
            frag("b1", 50.0, 598.0),
        ];
        let groups = group_fragments(fragments, 5.0, GroupingMode::Regions, &geometry());
        assert_eq!(texts(&groups), vec![vec!["a1", "a2"], vec!["b1", "b2"]]);
    }

    #[test]
    fn test_chaining_compares_with_previous_fragment_only() {
        // 700 -> 696 -> 692: each step is within 5, the ends are not.
        let fragments = vec![
            frag("x", 10.0, 700.0),
            frag("y", 20.0, 696.0),
            frag("z", 30.0, 692.0),
        ];
        let groups = group_fragments(fragments, 5.0, GroupingMode::Regions, &geometry());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn test_table_rows_drop_single_cells() {
        let fragments = vec![
            frag("Rechnung", 50.0, 780.0),
            frag("Menge", 50.0, 500.0),
            frag("Preis", 150.0, 501.0),
        ];
        let rows = group_fragments(fragments.clone(), 5.0, GroupingMode::TableRows, &geometry());
        assert_eq!(texts(&rows), vec![vec!["Menge", "Preis"]]);

        let regions = group_fragments(fragments, 5.0, GroupingMode::Regions, &geometry());
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_regrouping_flattened_groups_is_idempotent() {
        let fragments = vec![
            frag("c", 300.0, 400.0),
            frag("a", 10.0, 700.0),
            frag("d", 20.0, 380.0),
            frag("b", 90.0, 690.0),
            frag("e", 50.0, 100.0),
        ];
        let g = geometry();
        let first = group_fragments(fragments, 20.0, GroupingMode::Regions, &g);
        let flattened: Vec<Fragment> = first.iter().flatten().cloned().collect();
        let second = group_fragments(flattened, 20.0, GroupingMode::Regions, &g);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_fragments(Vec::new(), 5.0, GroupingMode::Regions, &geometry());
        assert!(groups.is_empty());
    }
}

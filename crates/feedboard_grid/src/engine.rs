// Grid Engine - Computes the board's cell matrix
//
// The pipeline always runs in this order:
//   1. assign axes (feeds by rank, horses in array order, archived dropped)
//   2. paginate columns
//   3. derive sparse rows from the visible columns only
//   4. paginate rows
//   5. fill cells

use std::collections::{HashMap, HashSet};

use feedboard_types::{
    AxisEntity, Cell, DietEntry, Dose, Feed, GridOutput, Horse, Orientation, PageSize, TimeMode,
};

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Everything `compute_grid` needs: a store snapshot plus a view configuration
#[derive(Debug, Clone, Copy)]
pub struct GridParams<'a> {
    pub horses: &'a [Horse],
    pub feeds: &'a [Feed],
    pub diet: &'a [DietEntry],
    pub orientation: Orientation,
    pub time_mode: TimeMode,
    /// Column-axis page index
    pub page: usize,
    pub page_size: PageSize,
    /// Row-axis page index
    pub row_page: usize,
    pub row_page_size: PageSize,
}

impl<'a> GridParams<'a> {
    /// Horse-major, AM, first page, no pagination on either axis
    pub fn new(horses: &'a [Horse], feeds: &'a [Feed], diet: &'a [DietEntry]) -> Self {
        Self {
            horses,
            feeds,
            diet,
            orientation: Orientation::default(),
            time_mode: TimeMode::default(),
            page: 0,
            page_size: PageSize::Unbounded,
            row_page: 0,
            row_page_size: PageSize::Unbounded,
        }
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn time_mode(mut self, time_mode: TimeMode) -> Self {
        self.time_mode = time_mode;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn row_page(mut self, row_page: usize) -> Self {
        self.row_page = row_page;
        self
    }

    pub fn row_page_size(mut self, row_page_size: PageSize) -> Self {
        self.row_page_size = row_page_size;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Axis Entities
// ─────────────────────────────────────────────────────────────────────────────

/// Borrowed axis entry used while planning; cloned only for the output
#[derive(Debug, Clone, Copy)]
enum AxisRef<'a> {
    Horse(&'a Horse),
    Feed(&'a Feed),
}

impl<'a> AxisRef<'a> {
    fn id(&self) -> &'a str {
        match self {
            AxisRef::Horse(h) => &h.id,
            AxisRef::Feed(f) => &f.id,
        }
    }

    fn to_entity(self) -> AxisEntity {
        match self {
            AxisRef::Horse(h) => AxisEntity::Horse(h.clone()),
            AxisRef::Feed(f) => AxisEntity::Feed(f.clone()),
        }
    }
}

/// Active doses keyed by `(horse_id, feed_id)`
type DoseIndex<'a> = HashMap<(&'a str, &'a str), Dose<'a>>;

/// Columns and sparse rows before row pagination
struct Plan<'a> {
    columns: Vec<AxisRef<'a>>,
    sparse_rows: Vec<AxisRef<'a>>,
    total_column_pages: usize,
    doses: DoseIndex<'a>,
}

impl<'a> Plan<'a> {
    fn build(params: &GridParams<'a>) -> Self {
        let horses = params
            .horses
            .iter()
            .filter(|h| h.is_visible())
            .map(AxisRef::Horse);

        // sort_by_key is stable, so equal ranks keep their input order
        let mut feeds: Vec<&Feed> = params.feeds.iter().collect();
        feeds.sort_by_key(|f| f.rank);
        let feeds = feeds.into_iter().map(AxisRef::Feed);

        let (primary, secondary): (Vec<_>, Vec<_>) = match params.orientation {
            Orientation::HorseMajor => (horses.collect(), feeds.collect()),
            Orientation::FeedMajor => (feeds.collect(), horses.collect()),
        };

        let total_column_pages = params.page_size.total_pages(primary.len());
        let window = params.page_size.window(primary.len(), params.page);
        let columns = primary[window].to_vec();

        let doses = index_doses(params.diet, params.time_mode);

        let visible: HashSet<&str> = columns.iter().map(|c| c.id()).collect();
        let fed_rows: HashSet<&str> = doses
            .keys()
            .filter_map(|&(horse_id, feed_id)| {
                let (column_id, row_id) = match params.orientation {
                    Orientation::HorseMajor => (horse_id, feed_id),
                    Orientation::FeedMajor => (feed_id, horse_id),
                };
                visible.contains(column_id).then_some(row_id)
            })
            .collect();

        let sparse_rows = secondary
            .into_iter()
            .filter(|r| fed_rows.contains(r.id()))
            .collect();

        Self {
            columns,
            sparse_rows,
            total_column_pages,
            doses,
        }
    }
}

/// Index the active entries for one time mode; the first entry for a pair wins
fn index_doses(diet: &[DietEntry], time_mode: TimeMode) -> DoseIndex<'_> {
    let mut doses = DoseIndex::with_capacity(diet.len());
    for entry in diet {
        let dose = entry.dose(time_mode);
        if dose.is_active() {
            doses
                .entry((entry.horse_id.as_str(), entry.feed_id.as_str()))
                .or_insert(dose);
        }
    }
    doses
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Compute the grid a board shows for the given snapshot and view
///
/// Total over all inputs: out-of-range pages produce empty axes while the
/// page totals still describe the real data.
pub fn compute_grid(params: &GridParams<'_>) -> GridOutput {
    let plan = Plan::build(params);

    let sparse_len = plan.sparse_rows.len();
    let row_window = params.row_page_size.window(sparse_len, params.row_page);
    let rows = &plan.sparse_rows[row_window];

    let cells: Vec<Vec<Cell>> = plan
        .columns
        .iter()
        .map(|column| {
            rows.iter()
                .map(|row| {
                    let key = match params.orientation {
                        Orientation::HorseMajor => (column.id(), row.id()),
                        Orientation::FeedMajor => (row.id(), column.id()),
                    };
                    plan.doses.get(&key).copied().map(Cell::from).unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let remaining_rows = params
        .row_page_size
        .remaining_after(sparse_len, params.row_page);

    let output = GridOutput {
        columns: plan.columns.iter().map(|c| c.to_entity()).collect(),
        rows: rows.iter().map(|r| r.to_entity()).collect(),
        cells,
        total_column_pages: plan.total_column_pages,
        total_row_pages: params.row_page_size.total_pages(sparse_len),
        has_more_rows: remaining_rows > 0,
        remaining_rows,
    };

    tracing::trace!(
        orientation = ?params.orientation,
        time_mode = %params.time_mode,
        page = params.page,
        row_page = params.row_page,
        columns = output.columns.len(),
        rows = output.rows.len(),
        sparse_rows = sparse_len,
        "Computed grid"
    );

    output
}

/// Column-page and row-page totals for the column page in `params`
///
/// Cheaper than `compute_grid` when only the page counts are needed.
pub fn page_totals(params: &GridParams<'_>) -> (usize, usize) {
    let plan = Plan::build(params);
    (
        plan.total_column_pages,
        params.row_page_size.total_pages(plan.sparse_rows.len()),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::fixtures::{BOARD, barn, names, one_horse_ten_feeds};

    fn size(n: usize) -> PageSize {
        PageSize::limited(n).unwrap()
    }

    #[test]
    fn test_horse_major_am_rows_by_rank() {
        let b = barn();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet)
                .time_mode(TimeMode::Am)
                .page_size(size(10)),
        );

        assert_eq!(names(&grid.columns), ["Apollo", "Bella", "Charlie"]);
        assert_eq!(names(&grid.rows), ["Vitamins", "Oats"]);

        let oats = grid.row_index("oats").unwrap();
        assert_eq!(grid.cells[0][oats].value, Some(2.0));
        assert_eq!(grid.total_column_pages, 1);
        assert_eq!(grid.total_row_pages, 1);
        assert!(!grid.has_more_rows);
        assert_eq!(grid.remaining_rows, 0);
    }

    #[test]
    fn test_cells_shape_and_empty_pairs() {
        let b = barn();
        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &b.diet));

        assert_eq!(grid.cells.len(), grid.columns.len());
        for column in &grid.cells {
            assert_eq!(column.len(), grid.rows.len());
        }

        // Bella only eats in the evening
        let bella = grid.column_index("bella").unwrap();
        assert!(grid.cells[bella].iter().all(Cell::is_empty));

        let charlie = grid.column_index("charlie").unwrap();
        let vitamins = grid.row_index("vitamins").unwrap();
        assert_eq!(grid.cell(charlie, vitamins).unwrap().value, Some(0.5));

        // Apollo has no vitamins
        let apollo = grid.column_index("apollo").unwrap();
        assert_eq!(grid.cell(apollo, vitamins), Some(&Cell::empty()));
    }

    #[test]
    fn test_pm_mode_uses_pm_doses() {
        let b = barn();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet).time_mode(TimeMode::Pm),
        );

        assert_eq!(names(&grid.rows), ["Vitamins", "Hay", "Oats"]);
        let bella = grid.column_index("bella").unwrap();
        let hay = grid.row_index("hay").unwrap();
        assert_eq!(grid.cells[bella][hay].value, Some(1.0));

        // Apollo's oats are morning only
        let apollo = grid.column_index("apollo").unwrap();
        let oats = grid.row_index("oats").unwrap();
        assert!(grid.cells[apollo][oats].is_empty());
    }

    #[test]
    fn test_sparse_rows_follow_visible_columns() {
        let b = barn();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet)
                .page_size(size(1))
                .page(0),
        );

        assert_eq!(names(&grid.columns), ["Apollo"]);
        assert_eq!(names(&grid.rows), ["Oats"]);
        assert_eq!(grid.cells, vec![vec![Cell { value: Some(2.0), variant: None }]]);
        assert_eq!(grid.total_column_pages, 3);
    }

    #[test]
    fn test_second_column_page() {
        let b = barn();
        let params = GridParams::new(&b.horses, &b.feeds, &b.diet).page_size(size(2));

        let first = compute_grid(&params);
        assert_eq!(first.total_column_pages, 2);
        assert_eq!(names(&first.columns), ["Apollo", "Bella"]);
        assert_eq!(names(&first.rows), ["Oats"]);

        let second = compute_grid(&params.page(1));
        assert_eq!(second.total_column_pages, 2);
        assert_eq!(names(&second.columns), ["Charlie"]);
        assert_eq!(names(&second.rows), ["Vitamins", "Oats"]);
    }

    #[test]
    fn test_row_pagination() {
        let b = one_horse_ten_feeds();
        let params = GridParams::new(&b.horses, &b.feeds, &b.diet).row_page_size(size(3));

        let first = compute_grid(&params);
        assert_eq!(first.rows.len(), 3);
        assert_eq!(first.remaining_rows, 7);
        assert!(first.has_more_rows);
        assert_eq!(first.total_row_pages, 4);
        assert_eq!(names(&first.rows), ["Feed 0", "Feed 1", "Feed 2"]);

        let last = compute_grid(&params.row_page(3));
        assert_eq!(last.rows.len(), 1);
        assert_eq!(last.remaining_rows, 0);
        assert!(!last.has_more_rows);
        assert_eq!(last.total_row_pages, 4);
        assert_eq!(last.cells[0].len(), 1);
    }

    #[test]
    fn test_row_page_arithmetic_law() {
        let b = one_horse_ten_feeds();
        for row_size in 1..=11 {
            for row_page in 0..12 {
                let grid = compute_grid(
                    &GridParams::new(&b.horses, &b.feeds, &b.diet)
                        .row_page_size(size(row_size))
                        .row_page(row_page),
                );
                let expected = 10usize.saturating_sub((row_page + 1) * row_size);
                assert_eq!(grid.remaining_rows, expected);
                assert_eq!(grid.has_more_rows, grid.remaining_rows > 0);
                assert!(grid.rows.len() <= row_size);
            }
        }
    }

    #[test]
    fn test_row_page_past_end_is_empty() {
        let b = one_horse_ten_feeds();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet)
                .row_page_size(size(3))
                .row_page(9),
        );
        assert!(grid.rows.is_empty());
        assert_eq!(grid.cells, vec![Vec::<Cell>::new()]);
        assert_eq!(grid.total_row_pages, 4);
    }

    #[test]
    fn test_column_page_past_end_is_empty() {
        let b = barn();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet)
                .page_size(size(2))
                .page(5),
        );
        assert!(grid.columns.is_empty());
        assert!(grid.rows.is_empty());
        assert!(grid.cells.is_empty());
        assert_eq!(grid.total_column_pages, 2);
        assert_eq!(grid.total_row_pages, 1);
    }

    #[test]
    fn test_column_pages_cover_every_horse_once() {
        let mut b = barn();
        b.horses.push(Horse::new("dusty", BOARD, "Dusty").archived());
        b.horses.push(Horse::new("echo", BOARD, "Echo"));

        for page_size in 1..=5 {
            let params = GridParams::new(&b.horses, &b.feeds, &b.diet).page_size(size(page_size));
            let total = compute_grid(&params).total_column_pages;

            let mut seen = Vec::new();
            for page in 0..total {
                let grid = compute_grid(&params.page(page));
                assert!(grid.columns.len() <= page_size);
                seen.extend(grid.columns.iter().map(|c| c.id().to_string()));
            }
            assert_eq!(seen, ["apollo", "bella", "charlie", "echo"]);
        }
    }

    #[test]
    fn test_unbounded_page_holds_everything() {
        let b = barn();
        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &b.diet));
        assert_eq!(grid.total_column_pages, 1);
        assert_eq!(grid.columns.len(), 3);
    }

    #[test]
    fn test_unbounded_columns_do_not_imply_unbounded_rows() {
        let b = one_horse_ten_feeds();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet)
                .page_size(PageSize::Unbounded)
                .row_page_size(size(4)),
        );
        assert_eq!(grid.rows.len(), 4);
        assert_eq!(grid.total_row_pages, 3);
    }

    #[test]
    fn test_feed_major_orientation() {
        let b = barn();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet).orientation(Orientation::FeedMajor),
        );

        assert_eq!(names(&grid.columns), ["Vitamins", "Hay", "Oats"]);
        assert_eq!(names(&grid.rows), ["Apollo", "Charlie"]);

        let oats = grid.column_index("oats").unwrap();
        let apollo = grid.row_index("apollo").unwrap();
        assert_eq!(grid.cells[oats][apollo].value, Some(2.0));

        // Hay is a column even though nobody eats it in the morning
        let hay = grid.column_index("hay").unwrap();
        assert!(grid.cells[hay].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_feed_major_sparse_rows_follow_visible_feeds() {
        let b = barn();
        let grid = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet)
                .orientation(Orientation::FeedMajor)
                .page_size(size(1)),
        );
        assert_eq!(names(&grid.columns), ["Vitamins"]);
        assert_eq!(names(&grid.rows), ["Charlie"]);
    }

    /// Every active (horse, feed, value, variant) visible on an unpaginated grid
    fn active_pairs(grid: &GridOutput, orientation: Orientation) -> BTreeSet<(String, String, String)> {
        let mut pairs = BTreeSet::new();
        for (c, column) in grid.columns.iter().enumerate() {
            for (r, row) in grid.rows.iter().enumerate() {
                let cell = &grid.cells[c][r];
                if cell.is_empty() {
                    continue;
                }
                let (horse, feed) = match orientation {
                    Orientation::HorseMajor => (column.id(), row.id()),
                    Orientation::FeedMajor => (row.id(), column.id()),
                };
                pairs.insert((
                    horse.to_string(),
                    feed.to_string(),
                    format!("{:?}/{:?}", cell.value, cell.variant),
                ));
            }
        }
        pairs
    }

    #[test]
    fn test_orientation_symmetry() {
        let mut b = barn();
        b.diet.push(DietEntry::new("bella", "vitamins").am_variant("paste"));

        for mode in [TimeMode::Am, TimeMode::Pm] {
            let params = GridParams::new(&b.horses, &b.feeds, &b.diet).time_mode(mode);
            let horse_major = compute_grid(&params.orientation(Orientation::HorseMajor));
            let feed_major = compute_grid(&params.orientation(Orientation::FeedMajor));

            let by_horse = active_pairs(&horse_major, Orientation::HorseMajor);
            let by_feed = active_pairs(&feed_major, Orientation::FeedMajor);
            assert!(!by_horse.is_empty());
            assert_eq!(by_horse, by_feed);
        }
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let horses = vec![Horse::new("h", BOARD, "Horse")];
        let feeds = vec![
            Feed::new("a", BOARD, "A", 1),
            Feed::new("b", BOARD, "B", 0),
            Feed::new("c", BOARD, "C", 1),
            Feed::new("d", BOARD, "D", -2),
        ];
        let diet: Vec<DietEntry> = feeds
            .iter()
            .map(|f| DietEntry::new("h", f.id.clone()).am(1.0))
            .collect();

        let rows = compute_grid(&GridParams::new(&horses, &feeds, &diet));
        assert_eq!(names(&rows.rows), ["D", "B", "A", "C"]);

        let columns = compute_grid(
            &GridParams::new(&horses, &feeds, &diet).orientation(Orientation::FeedMajor),
        );
        assert_eq!(names(&columns.columns), ["D", "B", "A", "C"]);
    }

    #[test]
    fn test_horses_keep_input_order() {
        let horses = vec![
            Horse::new("z", BOARD, "Zephyr"),
            Horse::new("a", BOARD, "Ash"),
            Horse::new("m", BOARD, "Maple"),
        ];
        let feeds = vec![Feed::new("hay", BOARD, "Hay", 0)];
        let diet = vec![
            DietEntry::new("m", "hay").am(1.0),
            DietEntry::new("z", "hay").am(1.0),
        ];

        let grid = compute_grid(
            &GridParams::new(&horses, &feeds, &diet).orientation(Orientation::FeedMajor),
        );
        assert_eq!(names(&grid.rows), ["Zephyr", "Maple"]);
    }

    #[test]
    fn test_archived_horses_excluded_from_both_axes() {
        let mut b = barn();
        b.horses.push(Horse::new("dusty", BOARD, "Dusty").archived());
        b.diet.push(DietEntry::new("dusty", "hay").am(4.0));

        let horse_major = compute_grid(&GridParams::new(&b.horses, &b.feeds, &b.diet));
        assert!(horse_major.column_index("dusty").is_none());
        assert!(horse_major.row_index("hay").is_none());

        let feed_major = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet).orientation(Orientation::FeedMajor),
        );
        assert!(feed_major.row_index("dusty").is_none());
    }

    #[test]
    fn test_zero_and_null_doses_do_not_activate() {
        let b = barn();
        let diet = vec![
            DietEntry::new("apollo", "hay").am(0.0),
            DietEntry::new("bella", "oats"),
        ];
        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &diet));
        assert!(grid.rows.is_empty());
        assert_eq!(grid.columns.len(), 3);
    }

    #[test]
    fn test_variant_only_cell() {
        let b = barn();
        let diet = vec![DietEntry::new("bella", "hay").am_variant("soaked")];
        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &diet));

        assert_eq!(names(&grid.rows), ["Hay"]);
        let bella = grid.column_index("bella").unwrap();
        assert_eq!(
            grid.cells[bella][0],
            Cell {
                value: None,
                variant: Some("soaked".to_string())
            }
        );
    }

    #[test]
    fn test_zero_amount_with_variant_is_emitted_verbatim() {
        let b = barn();
        let diet = vec![DietEntry::new("apollo", "hay").am(0.0).am_variant("wet")];
        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &diet));
        assert_eq!(grid.cells[0][0].value, Some(0.0));
        assert_eq!(grid.cells[0][0].variant.as_deref(), Some("wet"));
    }

    #[test]
    fn test_empty_diet() {
        let b = barn();
        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &[]));
        assert_eq!(grid.columns.len(), 3);
        assert!(grid.rows.is_empty());
        assert_eq!(grid.cells, vec![Vec::<Cell>::new(); 3]);
        assert_eq!(grid.total_row_pages, 1);
        assert!(!grid.has_more_rows);
    }

    #[test]
    fn test_no_entities() {
        let grid = compute_grid(&GridParams::new(&[], &[], &[]).page_size(size(4)));
        assert!(grid.columns.is_empty());
        assert!(grid.rows.is_empty());
        assert!(grid.cells.is_empty());
        assert_eq!(grid.total_column_pages, 1);
        assert_eq!(grid.total_row_pages, 1);
    }

    #[test]
    fn test_dangling_entries_are_invisible() {
        let b = barn();
        let mut diet = b.diet.clone();
        diet.push(DietEntry::new("ghost", "oats").am(9.0));
        diet.push(DietEntry::new("apollo", "missing-feed").am(9.0));

        let with_ghosts = compute_grid(&GridParams::new(&b.horses, &b.feeds, &diet));
        let without = compute_grid(&GridParams::new(&b.horses, &b.feeds, &b.diet));
        assert_eq!(with_ghosts, without);
    }

    #[test]
    fn test_first_duplicate_entry_wins() {
        let b = barn();
        let diet = vec![
            DietEntry::new("apollo", "oats").am(2.0),
            DietEntry::new("apollo", "oats").am(5.0),
        ];
        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &diet));
        assert_eq!(grid.cells[0][0].value, Some(2.0));
    }

    #[test]
    fn test_horse_note_is_surfaced() {
        let mut b = barn();
        b.horses[0] = b.horses[0].clone().with_note("Bute with breakfast");

        let grid = compute_grid(&GridParams::new(&b.horses, &b.feeds, &b.diet));
        assert_eq!(grid.columns[0].note(), Some("Bute with breakfast"));
        assert_eq!(grid.rows[0].note(), None);

        let feed_major = compute_grid(
            &GridParams::new(&b.horses, &b.feeds, &b.diet).orientation(Orientation::FeedMajor),
        );
        let apollo = feed_major.row_index("apollo").unwrap();
        assert_eq!(feed_major.rows[apollo].note(), Some("Bute with breakfast"));
    }

    #[test]
    fn test_compute_is_idempotent_and_leaves_inputs_alone() {
        let b = barn();
        let before = (b.horses.clone(), b.feeds.clone(), b.diet.clone());
        let params = GridParams::new(&b.horses, &b.feeds, &b.diet)
            .page_size(size(2))
            .row_page_size(size(1));

        assert_eq!(compute_grid(&params), compute_grid(&params));
        assert_eq!((b.horses, b.feeds, b.diet), before);
    }

    #[test]
    fn test_page_totals_match_compute_grid() {
        let b = barn();
        for page in 0..3 {
            let params = GridParams::new(&b.horses, &b.feeds, &b.diet)
                .page_size(size(2))
                .row_page_size(size(1))
                .page(page);
            let grid = compute_grid(&params);
            assert_eq!(
                page_totals(&params),
                (grid.total_column_pages, grid.total_row_pages)
            );
        }
    }
}

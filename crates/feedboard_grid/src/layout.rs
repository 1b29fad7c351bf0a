// Page Layout - Linear paging with a row-page count per column page
//
// Sparse filtering means each column page can have a different number of
// row pages. The layout measures them all so "next page" never lands on an
// empty row page and never skips a real one.

use feedboard_types::PageCoords;

use crate::engine::{GridParams, page_totals};

/// Row-page counts for every column page of a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// `row_pages[column_page]`, each at least one
    row_pages: Vec<usize>,
}

impl PageLayout {
    /// Measure the layout for a snapshot and view; the page indices in
    /// `params` are ignored
    pub fn measure(params: &GridParams<'_>) -> Self {
        let first = params.page(0).row_page(0);
        let (total_column_pages, first_rows) = page_totals(&first);

        let mut row_pages = Vec::with_capacity(total_column_pages);
        row_pages.push(first_rows);
        for column_page in 1..total_column_pages {
            let (_, rows) = page_totals(&first.page(column_page));
            row_pages.push(rows);
        }

        tracing::trace!(
            column_pages = total_column_pages,
            total_pages = row_pages.iter().sum::<usize>(),
            "Measured page layout"
        );

        Self { row_pages }
    }

    /// Every column page has the same number of row pages
    pub fn uniform(total_column_pages: usize, total_row_pages: usize) -> Self {
        Self {
            row_pages: vec![total_row_pages.max(1); total_column_pages.max(1)],
        }
    }

    pub fn total_column_pages(&self) -> usize {
        self.row_pages.len()
    }

    /// Row pages for one column page
    pub fn row_pages(&self, column_page: usize) -> Option<usize> {
        self.row_pages.get(column_page).copied()
    }

    /// Total linear pages
    pub fn total_pages(&self) -> usize {
        self.row_pages.iter().sum()
    }

    /// Coordinates of a linear page, rows first
    pub fn coords(&self, linear_index: usize) -> Option<PageCoords> {
        let mut remaining = linear_index;
        for (column_page, &rows) in self.row_pages.iter().enumerate() {
            if remaining < rows {
                return Some(PageCoords::new(column_page, remaining));
            }
            remaining -= rows;
        }
        None
    }

    /// Linear page of a coordinate pair
    pub fn linear_index(&self, coords: PageCoords) -> Option<usize> {
        let rows = self.row_pages(coords.column_page)?;
        if coords.row_page >= rows {
            return None;
        }
        let before: usize = self.row_pages[..coords.column_page].iter().sum();
        Some(before + coords.row_page)
    }

    /// Bring any linear index into range by wrapping around
    pub fn wrap(&self, linear_index: usize) -> usize {
        linear_index % self.total_pages().max(1)
    }

    /// The page after `linear_index`, wrapping to the first
    pub fn next(&self, linear_index: usize) -> usize {
        self.wrap(self.wrap(linear_index) + 1)
    }

    /// The page before `linear_index`, wrapping to the last
    pub fn prev(&self, linear_index: usize) -> usize {
        let total = self.total_pages().max(1);
        (self.wrap(linear_index) + total - 1) % total
    }
}

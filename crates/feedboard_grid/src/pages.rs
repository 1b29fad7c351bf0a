// Page Coordinates - One linear page index over two page axes
//
// Rows advance first: a viewer sees every row page of a column page before
// the board moves on to the next block of columns.

use feedboard_types::PageCoords;

/// Number of linear pages for a column/row page grid
pub fn total_2d_pages(total_column_pages: usize, total_row_pages: usize) -> usize {
    total_column_pages.saturating_mul(total_row_pages)
}

/// Split a linear page index into column and row pages (rows first)
///
/// A row page count of zero is treated as one.
pub fn page_coords_2d(linear_index: usize, total_row_pages: usize) -> PageCoords {
    let rows = total_row_pages.max(1);
    PageCoords {
        column_page: linear_index / rows,
        row_page: linear_index % rows,
    }
}

/// Inverse of [`page_coords_2d`]
pub fn linear_page_index(coords: PageCoords, total_row_pages: usize) -> usize {
    let rows = total_row_pages.max(1);
    coords
        .column_page
        .saturating_mul(rows)
        .saturating_add(coords.row_page)
}

//! Board Frames
//!
//! A frame is one linear page of a board, ready to send to a display.

use serde::Serialize;

use feedboard_grid::{PageLayout, compute_grid};
use feedboard_types::{GridOutput, Orientation, TimeMode};

use super::config::Board;

/// One rendered page of the board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFrame {
    pub grid: GridOutput,
    /// Linear page index, always within `0..total_pages`
    pub page: usize,
    pub total_pages: usize,
    pub column_page: usize,
    pub row_page: usize,
    pub orientation: Orientation,
    pub time_mode: TimeMode,
}

impl Board {
    /// Page layout for the board in a given time mode
    pub fn layout(&self, time_mode: TimeMode) -> PageLayout {
        PageLayout::measure(&self.grid_params(time_mode))
    }

    /// Render linear page `page`, wrapping it into range
    pub fn frame(&self, page: usize, time_mode: TimeMode) -> BoardFrame {
        let params = self.grid_params(time_mode);
        let layout = PageLayout::measure(&params);
        let page = layout.wrap(page);
        let coords = layout.coords(page).unwrap_or_default();

        let grid = compute_grid(&params.page(coords.column_page).row_page(coords.row_page));

        BoardFrame {
            grid,
            page,
            total_pages: layout.total_pages(),
            column_page: coords.column_page,
            row_page: coords.row_page,
            orientation: params.orientation,
            time_mode,
        }
    }
}

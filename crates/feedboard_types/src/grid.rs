// Grid projections - what the board actually renders
//
// These are derived by the grid engine on every render and never written
// back to the store.

use serde::{Deserialize, Serialize};

use crate::entities::{Dose, Feed, Horse};

/// Which entity type runs along the columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Horses are columns, feeds are rows
    #[default]
    HorseMajor,
    /// Feeds are columns, horses are rows
    FeedMajor,
}

/// A horse or feed placed on one of the grid axes
///
/// Horses carry their note so the renderer can show it without a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AxisEntity {
    Horse(Horse),
    Feed(Feed),
}

impl AxisEntity {
    pub fn id(&self) -> &str {
        match self {
            AxisEntity::Horse(h) => &h.id,
            AxisEntity::Feed(f) => &f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AxisEntity::Horse(h) => &h.name,
            AxisEntity::Feed(f) => &f.name,
        }
    }

    /// The horse note, when this entity is a horse
    pub fn note(&self) -> Option<&str> {
        match self {
            AxisEntity::Horse(h) => h.note.as_deref(),
            AxisEntity::Feed(_) => None,
        }
    }
}

/// One grid cell: the dose for a (horse, feed) pair in the current time mode
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: Option<f64>,
    pub variant: Option<String>,
}

impl Cell {
    /// A cell with nothing to feed
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.variant.is_none()
    }
}

impl From<Dose<'_>> for Cell {
    fn from(dose: Dose<'_>) -> Self {
        Self {
            value: dose.amount,
            variant: dose.variant.map(str::to_string),
        }
    }
}

/// The renderable grid for one page of each axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOutput {
    /// Visible primary-axis entities
    pub columns: Vec<AxisEntity>,
    /// Visible secondary-axis entities after sparse filtering
    pub rows: Vec<AxisEntity>,
    /// `cells[column][row]`
    pub cells: Vec<Vec<Cell>>,
    pub total_column_pages: usize,
    pub total_row_pages: usize,
    /// More rows exist below the current row page
    pub has_more_rows: bool,
    /// Rows not yet shown below the current row page
    pub remaining_rows: usize,
}

impl GridOutput {
    /// Cell at a column/row position, if both are on this page
    pub fn cell(&self, column: usize, row: usize) -> Option<&Cell> {
        self.cells.get(column)?.get(row)
    }

    /// Position of a row by entity id
    pub fn row_index(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == id)
    }

    /// Position of a column by entity id
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id() == id)
    }
}

/// A (column page, row page) pair addressed by a single linear page index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCoords {
    pub column_page: usize,
    pub row_page: usize,
}

impl PageCoords {
    pub fn new(column_page: usize, row_page: usize) -> Self {
        Self {
            column_page,
            row_page,
        }
    }
}

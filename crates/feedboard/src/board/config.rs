//! Board Configuration Types
//!
//! Defines the structure of a board directory on disk.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use feedboard_grid::GridParams;
use feedboard_types::{DietEntry, Feed, Horse, Orientation, PageSize, TimeMode};

use super::time_mode::{TimeModePolicy, TimeModeSetting};

/// Board manifest (board.toml)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BoardManifest {
    pub board: BoardInfo,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Board information
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BoardInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// How the board display lays out and pages the grid
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayConfig {
    #[serde(default)]
    #[ts(type = "\"horse-major\" | \"feed-major\"")]
    pub orientation: Orientation,
    #[serde(default)]
    pub time_mode: TimeModeSetting,
    /// Columns per page; omitted means one page of everything
    #[serde(default)]
    #[ts(type = "number | null")]
    pub page_size: Option<NonZeroUsize>,
    /// Rows per page; omitted means no row paging
    #[serde(default)]
    #[ts(type = "number | null")]
    pub row_page_size: Option<NonZeroUsize>,
    /// Seconds between automatic page turns; 0 disables rotation
    #[serde(default = "default_rotate_seconds")]
    pub rotate_seconds: u64,
    /// Default lifetime of a manual AM/PM override
    #[serde(default = "default_override_minutes")]
    pub override_minutes: u32,
    /// Local hour at which AUTO switches to PM
    #[serde(default = "default_pm_starts_at_hour")]
    pub pm_starts_at_hour: u32,
}

fn default_rotate_seconds() -> u64 {
    15
}

fn default_override_minutes() -> u32 {
    120
}

fn default_pm_starts_at_hour() -> u32 {
    12
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            time_mode: TimeModeSetting::default(),
            page_size: None,
            row_page_size: None,
            rotate_seconds: default_rotate_seconds(),
            override_minutes: default_override_minutes(),
            pm_starts_at_hour: default_pm_starts_at_hour(),
        }
    }
}

impl DisplayConfig {
    pub fn page_size(&self) -> PageSize {
        self.page_size.map_or(PageSize::Unbounded, PageSize::Limited)
    }

    pub fn row_page_size(&self) -> PageSize {
        self.row_page_size.map_or(PageSize::Unbounded, PageSize::Limited)
    }

    pub fn time_mode_policy(&self) -> TimeModePolicy {
        TimeModePolicy {
            setting: self.time_mode,
            pm_starts_at_hour: self.pm_starts_at_hour,
        }
    }
}

/// Loaded board with its entity snapshot
#[derive(Debug, Clone)]
pub struct Board {
    /// Board root path
    pub path: PathBuf,
    /// Board manifest
    pub manifest: BoardManifest,
    pub horses: Vec<Horse>,
    pub feeds: Vec<Feed>,
    pub diet: Vec<DietEntry>,
}

impl Board {
    /// Get board ID
    pub fn id(&self) -> &str {
        &self.manifest.board.id
    }

    /// Get board name
    pub fn name(&self) -> &str {
        &self.manifest.board.name
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.manifest.display
    }

    /// Grid parameters for this board on its first page
    pub fn grid_params(&self, time_mode: TimeMode) -> GridParams<'_> {
        let display = self.display();
        GridParams::new(&self.horses, &self.feeds, &self.diet)
            .orientation(display.orientation)
            .time_mode(time_mode)
            .page_size(display.page_size())
            .row_page_size(display.row_page_size())
    }
}

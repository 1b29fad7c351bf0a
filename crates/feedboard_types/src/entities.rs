// Board entities - the records owned by the board store
//
// The grid engine only ever borrows these. Field names follow the
// front-end's camelCase JSON.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Time Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Half of the day a board is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeMode {
    #[default]
    Am,
    Pm,
}

impl std::fmt::Display for TimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeMode::Am => f.write_str("AM"),
            TimeMode::Pm => f.write_str("PM"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Horses and Feeds
// ─────────────────────────────────────────────────────────────────────────────

/// A horse on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
    pub id: String,
    pub board_id: String,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl Horse {
    /// Create an active horse with no note
    pub fn new(id: impl Into<String>, board_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            board_id: board_id.into(),
            name: name.into(),
            note: None,
            archived: false,
        }
    }

    /// Builder: attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Builder: mark as archived
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Archived horses never appear on the grid
    pub fn is_visible(&self) -> bool {
        !self.archived
    }
}

/// A feed (grain, hay, supplement, medication)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: String,
    pub board_id: String,
    pub name: String,
    #[serde(default)]
    pub unit_type: String,
    #[serde(default)]
    pub unit_label: String,
    /// Display priority; lower sorts first
    #[serde(default)]
    pub rank: i64,
}

impl Feed {
    pub fn new(
        id: impl Into<String>,
        board_id: impl Into<String>,
        name: impl Into<String>,
        rank: i64,
    ) -> Self {
        Self {
            id: id.into(),
            board_id: board_id.into(),
            name: name.into(),
            unit_type: String::new(),
            unit_label: String::new(),
            rank,
        }
    }

    /// Builder: set the unit type and its display label
    pub fn with_unit(mut self, unit_type: impl Into<String>, unit_label: impl Into<String>) -> Self {
        self.unit_type = unit_type.into();
        self.unit_label = unit_label.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Diet Entries
// ─────────────────────────────────────────────────────────────────────────────

/// "Horse X receives feed Y", with separate AM and PM doses
///
/// Identity is the `(horse_id, feed_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietEntry {
    pub horse_id: String,
    pub feed_id: String,
    #[serde(default)]
    pub am_amount: Option<f64>,
    #[serde(default)]
    pub am_variant: Option<String>,
    #[serde(default)]
    pub pm_amount: Option<f64>,
    #[serde(default)]
    pub pm_variant: Option<String>,
}

impl DietEntry {
    /// Create an entry with no doses
    pub fn new(horse_id: impl Into<String>, feed_id: impl Into<String>) -> Self {
        Self {
            horse_id: horse_id.into(),
            feed_id: feed_id.into(),
            am_amount: None,
            am_variant: None,
            pm_amount: None,
            pm_variant: None,
        }
    }

    /// Builder: set the AM amount
    pub fn am(mut self, amount: f64) -> Self {
        self.am_amount = Some(amount);
        self
    }

    /// Builder: set the PM amount
    pub fn pm(mut self, amount: f64) -> Self {
        self.pm_amount = Some(amount);
        self
    }

    /// Builder: set the AM variant
    pub fn am_variant(mut self, variant: impl Into<String>) -> Self {
        self.am_variant = Some(variant.into());
        self
    }

    /// Builder: set the PM variant
    pub fn pm_variant(mut self, variant: impl Into<String>) -> Self {
        self.pm_variant = Some(variant.into());
        self
    }

    /// The dose for one half of the day
    pub fn dose(&self, mode: TimeMode) -> Dose<'_> {
        match mode {
            TimeMode::Am => Dose {
                amount: self.am_amount,
                variant: self.am_variant.as_deref(),
            },
            TimeMode::Pm => Dose {
                amount: self.pm_amount,
                variant: self.pm_variant.as_deref(),
            },
        }
    }

    /// Whether this entry shows up on a board in the given time mode
    pub fn is_active(&self, mode: TimeMode) -> bool {
        self.dose(mode).is_active()
    }
}

/// One half-day's amount/variant pair borrowed from a [`DietEntry`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dose<'a> {
    pub amount: Option<f64>,
    pub variant: Option<&'a str>,
}

impl Dose<'_> {
    /// A dose is active when it has a non-zero amount or any variant.
    ///
    /// This is the only activity rule; AM and PM both go through it.
    pub fn is_active(&self) -> bool {
        let has_amount = self.amount.is_some_and(|a| a != 0.0 && !a.is_nan());
        has_amount || self.variant.is_some()
    }
}

// Page sizes for the two grid axes

use std::num::NonZeroUsize;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Error building a [`PageSize`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageSizeError {
    #[error("Page size must be at least 1")]
    Zero,
}

/// How many entities fit on one page of an axis
///
/// Serialized as a plain number, with `null` meaning [`PageSize::Unbounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<usize>", into = "Option<usize>")]
pub enum PageSize {
    /// No pagination: a single page holds everything
    #[default]
    Unbounded,
    Limited(NonZeroUsize),
}

impl PageSize {
    /// A finite page size; zero is rejected
    pub fn limited(size: usize) -> Result<Self, PageSizeError> {
        NonZeroUsize::new(size)
            .map(PageSize::Limited)
            .ok_or(PageSizeError::Zero)
    }

    /// The finite size, if any
    pub fn get(&self) -> Option<usize> {
        match self {
            PageSize::Unbounded => None,
            PageSize::Limited(n) => Some(n.get()),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, PageSize::Unbounded)
    }

    /// Number of pages needed for `len` items; never less than one
    pub fn total_pages(&self, len: usize) -> usize {
        match self {
            PageSize::Unbounded => 1,
            PageSize::Limited(n) => len.div_ceil(n.get()).max(1),
        }
    }

    /// Index range of `page` within a list of `len` items
    ///
    /// Pages past the end yield an empty range at `len`.
    pub fn window(&self, len: usize, page: usize) -> Range<usize> {
        match self {
            PageSize::Unbounded if page == 0 => 0..len,
            PageSize::Unbounded => len..len,
            PageSize::Limited(n) => {
                let start = page.saturating_mul(n.get()).min(len);
                let end = start.saturating_add(n.get()).min(len);
                start..end
            }
        }
    }

    /// Items left after `page` and every page before it
    pub fn remaining_after(&self, len: usize, page: usize) -> usize {
        match self {
            PageSize::Unbounded => 0,
            PageSize::Limited(n) => {
                let shown = page.saturating_add(1).saturating_mul(n.get());
                len.saturating_sub(shown)
            }
        }
    }
}

impl TryFrom<Option<usize>> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: Option<usize>) -> Result<Self, Self::Error> {
        match value {
            None => Ok(PageSize::Unbounded),
            Some(size) => PageSize::limited(size),
        }
    }
}

impl From<PageSize> for Option<usize> {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

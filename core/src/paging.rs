//! Paging value types.
//!
//! Data sources speak 1-based page numbers, pagination controls speak
//! 0-based page indices. Keeping the two as distinct types makes the
//! `index + 1` conversion explicit at every boundary.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error;

/// Errors raised when constructing paging values from raw integers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingError {
    /// Page numbers are 1-based.
    #[error("page number must be at least 1")]
    ZeroPageNumber,

    /// A page must hold at least one row.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A 1-based page number as reported by, and requested from, a data source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Creates a page number, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError::ZeroPageNumber`] if `value` is 0.
    pub const fn new(value: u32) -> Result<Self, PagingError> {
        match NonZeroU32::new(value) {
            Some(n) => Ok(Self(n)),
            None => Err(PagingError::ZeroPageNumber),
        }
    }

    /// Returns the raw 1-based value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Converts to the 0-based index used by pagination controls
    #[must_use]
    pub const fn to_index(self) -> PageIndex {
        PageIndex(self.0.get() - 1)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PagingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageNumber> for u32 {
    fn from(page: PageNumber) -> Self {
        page.get()
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 0-based page index as selected in pagination controls.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PageIndex(u32);

impl PageIndex {
    /// Index of the first page.
    pub const FIRST: Self = Self(0);

    /// Creates a page index
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw 0-based value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Converts to the 1-based page number data sources expect.
    ///
    /// `None` for `u32::MAX`, whose page number does not fit in a `u32`.
    #[must_use]
    pub const fn to_page_number(self) -> Option<PageNumber> {
        match NonZeroU32::MIN.checked_add(self.0) {
            Some(n) => Some(PageNumber(n)),
            None => None,
        }
    }

    /// The following index
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The preceding index, or `None` on the first page
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self.0.checked_sub(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl std::fmt::Display for PageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of rows shown per page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Rows per page when nothing else is configured.
    pub const DEFAULT: Self = Self(NonZeroU32::MIN.saturating_add(9));

    /// Creates a page size, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError::ZeroPageSize`] if `value` is 0.
    pub const fn new(value: u32) -> Result<Self, PagingError> {
        match NonZeroU32::new(value) {
            Some(n) => Ok(Self(n)),
            None => Err(PagingError::ZeroPageSize),
        }
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PagingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pagination metadata reported by a data source alongside a page of items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// The page the items belong to
    pub current_page: PageNumber,
    /// Total number of items across all pages
    pub total_count: u64,
}

impl PageMeta {
    /// Creates page metadata
    #[must_use]
    pub const fn new(current_page: PageNumber, total_count: u64) -> Self {
        Self {
            current_page,
            total_count,
        }
    }

    /// Number of pages needed to show `total_count` rows at `size` per page
    #[must_use]
    pub fn page_count(&self, size: PageSize) -> u64 {
        page_count(self.total_count, size)
    }
}

/// Number of pages needed to show `total` rows at `size` rows per page.
#[must_use]
pub fn page_count(total: u64, size: PageSize) -> u64 {
    total.div_ceil(u64::from(size.get()))
}

/// The 1-based, inclusive range of rows a page displays, as in "11-20 of 25".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    /// First displayed row, 0 when there is nothing to show
    pub from: u64,
    /// Last displayed row
    pub to: u64,
}

impl RowRange {
    /// Computes the displayed range for `index` at `size` rows per page.
    #[must_use]
    pub fn for_page(total: u64, index: PageIndex, size: PageSize) -> Self {
        let size = u64::from(size.get());
        let start = u64::from(index.get()).saturating_mul(size);
        let from = if total == 0 { 0 } else { start.saturating_add(1) };
        let to = total.min(start.saturating_add(size));
        Self { from, to }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn page_number_rejects_zero() {
        assert_eq!(PageNumber::new(0), Err(PagingError::ZeroPageNumber));
        assert_eq!(PageNumber::new(3).map(PageNumber::get), Ok(3));
    }

    #[test]
    fn page_size_rejects_zero() {
        assert_eq!(PageSize::new(0), Err(PagingError::ZeroPageSize));
        assert_eq!(PageSize::DEFAULT.get(), 10);
    }

    #[test]
    fn number_and_index_convert() {
        let third = PageNumber::new(3).unwrap();
        assert_eq!(third.to_index(), PageIndex::new(2));
        assert_eq!(PageIndex::new(2).to_page_number(), Some(third));
        assert_eq!(PageIndex::FIRST.to_page_number(), Some(PageNumber::FIRST));
    }

    #[test]
    fn last_index_has_no_page_number() {
        assert_eq!(PageIndex::new(u32::MAX).to_page_number(), None);
        assert_eq!(
            PageIndex::new(u32::MAX - 1).to_page_number().map(PageNumber::get),
            Some(u32::MAX)
        );
    }

    #[test]
    fn page_count_with_largest_page_size() {
        let size = PageSize::new(u32::MAX).unwrap();
        assert_eq!(page_count(0, size), 0);
        assert_eq!(page_count(u64::from(u32::MAX), size), 1);
        assert_eq!(page_count(u64::MAX, size), u64::MAX.div_ceil(u64::from(u32::MAX)));
    }

    #[test]
    fn previous_stops_at_first_page() {
        assert_eq!(PageIndex::FIRST.previous(), None);
        assert_eq!(PageIndex::new(1).previous(), Some(PageIndex::FIRST));
    }

    #[test]
    fn page_number_deserialization_enforces_invariant() {
        let ok: PageNumber = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<PageNumber>("0").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "4");
    }

    #[test]
    fn page_meta_deserializes_wire_names() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"current_page":3,"total_count":25}"#).unwrap();
        assert_eq!(meta.current_page.get(), 3);
        assert_eq!(meta.total_count, 25);
        assert_eq!(meta.page_count(PageSize::DEFAULT), 3);
    }

    #[test]
    fn row_range_examples() {
        let size = PageSize::DEFAULT;
        assert_eq!(
            RowRange::for_page(25, PageIndex::new(2), size),
            RowRange { from: 21, to: 25 }
        );
        assert_eq!(
            RowRange::for_page(25, PageIndex::FIRST, size),
            RowRange { from: 1, to: 10 }
        );
        assert_eq!(
            RowRange::for_page(0, PageIndex::FIRST, size),
            RowRange { from: 0, to: 0 }
        );
    }

    proptest! {
        #[test]
        fn index_round_trips_through_page_number(raw in any::<u32>()) {
            let index = PageIndex::new(raw);
            match index.to_page_number() {
                Some(number) => prop_assert_eq!(number.to_index(), index),
                None => prop_assert_eq!(raw, u32::MAX),
            }
        }

        #[test]
        fn page_count_covers_every_row(total in 0u64..100_000, size in 1u32..500) {
            let size = PageSize::new(size).unwrap();
            let pages = page_count(total, size);
            prop_assert!(pages * u64::from(size.get()) >= total);
            if pages > 0 {
                prop_assert!((pages - 1) * u64::from(size.get()) < total);
            }
        }
    }
}

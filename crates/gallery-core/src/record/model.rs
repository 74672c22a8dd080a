//! Record and page domain models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::FetchError;

/// Stable unique identity of a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One catalog entry.
///
/// Records are value snapshots: once fetched they are never mutated, only
/// stored, compared by identity and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: Option<String>,
    pub place_of_origin: Option<String>,
    pub artist_display: Option<String>,
    pub inscriptions: Option<String>,
    pub date_start: Option<i32>,
    pub date_end: Option<i32>,
}

impl Record {
    /// Creates a record carrying only its identity and a title.
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        }
    }

    /// Title for display, falling back to a placeholder.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// A single query against the record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub index: usize,
    /// Maximum number of records per page
    pub size: usize,
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// One-based page number, as remote paginated APIs expect it.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Position of the first record of this page in the whole collection.
    pub fn offset(&self) -> usize {
        self.index * self.size
    }
}

/// An ordered slice of records returned by one source query.
///
/// `total` is the collection size as reported by the source at fetch time.
/// It is a snapshot: two pages of the same collection may disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub records: Vec<Record>,
    pub total: usize,
}

impl Page {
    pub fn new(index: usize, records: Vec<Record>, total: usize) -> Self {
        Self {
            index,
            records,
            total,
        }
    }

    /// An empty first page, used before anything has been loaded.
    pub fn empty() -> Self {
        Self::new(0, Vec::new(), 0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identities of the records on this page, in page order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.iter().map(|r| r.id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Checks the page contract: at most `page_size` records, no repeated ids.
    pub fn validate(&self, page_size: usize) -> Result<(), FetchError> {
        if self.records.len() > page_size {
            return Err(FetchError::malformed(
                self.index,
                format!(
                    "page holds {} records, more than the page size {}",
                    self.records.len(),
                    page_size
                ),
            ));
        }

        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.id) {
                return Err(FetchError::malformed(
                    self.index,
                    format!("record {} appears more than once", record.id),
                ));
            }
        }

        Ok(())
    }
}

/// Number of pages needed to cover `total` records, `ceil(total / page_size)`.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(index: usize, ids: &[u64]) -> Page {
        let records = ids.iter().map(|id| Record::new(*id, format!("Artwork {id}"))).collect();
        Page::new(index, records, 50)
    }

    #[test]
    fn test_page_request_numbering() {
        let request = PageRequest::new(0, 12);
        assert_eq!(request.number(), 1);
        assert_eq!(PageRequest::new(3, 12).offset(), 36);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(50, 12), 5);
        assert_eq!(page_count(48, 12), 4);
        assert_eq!(page_count(0, 12), 0);
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn test_validate_accepts_well_formed_page() {
        assert!(page_of(0, &[1, 2, 3]).validate(12).is_ok());
        assert!(Page::empty().validate(12).is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_page() {
        let err = page_of(2, &[1, 2, 3]).validate(2).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.page(), 2);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let err = page_of(1, &[7, 8, 7]).validate(12).unwrap_err();
        assert!(err.to_string().contains("record 7 appears more than once"));
    }

    #[test]
    fn test_display_title_fallback() {
        let mut record = Record::new(1u64, "Nighthawks");
        assert_eq!(record.display_title(), "Nighthawks");
        record.title = None;
        assert_eq!(record.display_title(), "Untitled");
    }
}

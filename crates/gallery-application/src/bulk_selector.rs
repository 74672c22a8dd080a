//! Bulk Selector
//!
//! Selects the first N records of the collection, crossing page boundaries
//! as needed. Pages are fetched from the first one upward in small batches of
//! concurrent requests; results are merged in page order so the outcome does
//! not depend on which response arrives first.

use futures::future::join_all;
use gallery_core::error::FetchError;
use gallery_core::record::{PageRequest, Record, RecordSource, page_count};
use gallery_core::selection::SelectionStore;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// How a bulk selection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkCompletion {
    /// The store already held at least `target` records; nothing was fetched
    AlreadySatisfied,
    /// The target was reached
    Reached,
    /// Every page was walked before reaching the target
    Exhausted,
}

/// Summary of a finished bulk selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub target: usize,
    /// Records newly inserted into the store
    pub added: usize,
    /// Store cardinality after the merge
    pub selected: usize,
    pub pages_requested: usize,
    pub batches: usize,
    pub completion: BulkCompletion,
}

/// Errors raised by a bulk selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BulkSelectError {
    /// The requested count is outside `[1, total]`
    #[error("Number of rows to select must be between 1 and {max}, got {target}")]
    InvalidTarget { target: usize, max: usize },

    /// A page fetch failed mid-walk. Records gathered from earlier pages were
    /// committed before returning.
    #[error("Bulk selection stopped at page {page} after adding {added} records: {source}")]
    Interrupted {
        page: usize,
        added: usize,
        selected: usize,
        source: FetchError,
    },
}

impl BulkSelectError {
    /// Number of records committed before the failure.
    pub fn added(&self) -> usize {
        match self {
            Self::InvalidTarget { .. } => 0,
            Self::Interrupted { added, .. } => *added,
        }
    }
}

/// Walks the record source to select the first N records.
pub struct BulkSelector {
    source: Arc<dyn RecordSource>,
    page_size: usize,
    batch_size: usize,
}

impl BulkSelector {
    /// Creates a selector.
    ///
    /// # Arguments
    ///
    /// * `source` - Record source to walk
    /// * `page_size` - Records per page, same as the displayed pages
    /// * `batch_size` - Concurrent fetches per batch (at least 1)
    pub fn new(source: Arc<dyn RecordSource>, page_size: usize, batch_size: usize) -> Self {
        Self {
            source,
            page_size,
            batch_size: batch_size.max(1),
        }
    }

    /// Grows the selection until it holds `target` records or the collection
    /// runs out.
    ///
    /// The store is only read up front (to learn which ids are already
    /// selected) and written once at the end, as an insert-if-absent merge.
    /// Selections made while the walk is in flight are therefore kept.
    ///
    /// # Arguments
    ///
    /// * `selection` - The session selection store
    /// * `target` - Desired total number of selected records
    /// * `total` - Collection total most recently observed; bounds the walk
    ///
    /// # Errors
    ///
    /// Returns `BulkSelectError::Interrupted` when a fetch fails. Records from
    /// pages preceding the failed one have been merged by then; the failed
    /// page and any later page of its batch are dropped.
    pub async fn select_first_n(
        &self,
        selection: &RwLock<SelectionStore>,
        target: usize,
        total: usize,
    ) -> Result<BulkOutcome, BulkSelectError> {
        let mut seen = selection.read().await.ids();
        let mut selected_count = seen.len();

        if selected_count >= target {
            tracing::debug!(
                "Bulk selection of {} skipped, {} already selected",
                target,
                selected_count
            );
            return Ok(BulkOutcome {
                target,
                added: 0,
                selected: selected_count,
                pages_requested: 0,
                batches: 0,
                completion: BulkCompletion::AlreadySatisfied,
            });
        }

        let max_pages = page_count(total, self.page_size);
        let mut picked: Vec<Record> = Vec::new();
        let mut page = 0;
        let mut batches = 0;
        let mut pages_requested = 0;

        tracing::info!(
            "Bulk selecting {} records (total {}, {} pages)",
            target,
            total,
            max_pages
        );

        while selected_count < target && page < max_pages {
            let batch_end = (page + self.batch_size).min(max_pages);
            let indices: Vec<usize> = (page..batch_end).collect();
            page = batch_end;
            batches += 1;
            pages_requested += indices.len();

            tracing::debug!("Fetching batch {}: pages {:?}", batches, indices);

            let results = join_all(
                indices
                    .iter()
                    .map(|&index| self.source.fetch_page(PageRequest::new(index, self.page_size))),
            )
            .await;

            // join_all keeps request order, which is page order
            for (&index, result) in indices.iter().zip(results) {
                let fetched = match result {
                    Ok(fetched) => fetched,
                    Err(e) => {
                        let (added, selected) = Self::commit(selection, picked).await;
                        tracing::warn!(
                            "Bulk selection interrupted at page {}: {} ({} records kept)",
                            index,
                            e,
                            added
                        );
                        return Err(BulkSelectError::Interrupted {
                            page: index,
                            added,
                            selected,
                            source: e,
                        });
                    }
                };

                for record in fetched.records {
                    if selected_count >= target {
                        break;
                    }
                    if seen.insert(record.id) {
                        picked.push(record);
                        selected_count += 1;
                    }
                }

                if selected_count >= target {
                    break;
                }
            }
        }

        let completion = if selected_count >= target {
            BulkCompletion::Reached
        } else {
            BulkCompletion::Exhausted
        };
        let (added, selected) = Self::commit(selection, picked).await;

        tracing::info!(
            "Bulk selection {:?}: added {}, {} selected, {} pages in {} batches",
            completion,
            added,
            selected,
            pages_requested,
            batches
        );

        Ok(BulkOutcome {
            target,
            added,
            selected,
            pages_requested,
            batches,
            completion,
        })
    }

    async fn commit(selection: &RwLock<SelectionStore>, picked: Vec<Record>) -> (usize, usize) {
        let mut store = selection.write().await;
        let added = store.merge(picked);
        (added, store.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CollectionSource;
    use gallery_core::record::RecordId;

    fn selector(source: &Arc<CollectionSource>) -> BulkSelector {
        BulkSelector::new(source.clone(), 12, 3)
    }

    fn ids(store: &SelectionStore) -> Vec<u64> {
        store.records().iter().map(|r| r.id.0).collect()
    }

    #[tokio::test]
    async fn test_selects_first_n_records_in_collection_order() {
        let source = Arc::new(CollectionSource::new(50));
        let selection = RwLock::new(SelectionStore::new());

        let outcome = selector(&source).select_first_n(&selection, 20, 50).await.unwrap();

        assert_eq!(outcome.completion, BulkCompletion::Reached);
        assert_eq!(outcome.added, 20);
        assert_eq!(outcome.selected, 20);
        assert_eq!(ids(&*selection.read().await), (0..20).collect::<Vec<u64>>());
        // Pages 0 and 1 cover the target; page 2 is fetched by the batch but contributes nothing
        assert!(!selection.read().await.contains(RecordId(24)));
    }

    #[tokio::test]
    async fn test_selects_min_of_target_and_total() {
        for target in [1, 12, 13, 36, 49, 50] {
            let source = Arc::new(CollectionSource::new(50));
            let selection = RwLock::new(SelectionStore::new());

            selector(&source).select_first_n(&selection, target, 50).await.unwrap();

            let store = selection.read().await;
            assert_eq!(store.count(), target);
            assert_eq!(ids(&store), (0..target as u64).collect::<Vec<u64>>());
        }
    }

    #[tokio::test]
    async fn test_target_beyond_total_selects_everything() {
        let source = Arc::new(CollectionSource::new(50));
        let selection = RwLock::new(SelectionStore::new());

        let outcome = selector(&source).select_first_n(&selection, 75, 50).await.unwrap();

        assert_eq!(outcome.completion, BulkCompletion::Exhausted);
        assert_eq!(outcome.selected, 50);
        assert_eq!(source.requested_pages(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_batches_are_clipped_at_last_page() {
        let source = Arc::new(CollectionSource::new(50));
        let selection = RwLock::new(SelectionStore::new());

        let outcome = selector(&source).select_first_n(&selection, 50, 50).await.unwrap();

        assert_eq!(outcome.batches, 2);
        assert_eq!(outcome.pages_requested, 5);
        assert_eq!(outcome.completion, BulkCompletion::Reached);
        // Each request records how many fetches were already running: the
        // second batch only starts once the first has drained
        assert_eq!(
            *source.requests.lock().unwrap(),
            vec![(0, 0), (1, 1), (2, 2), (3, 0), (4, 1)]
        );
        assert!(source.max_in_flight() <= 3);
    }

    #[tokio::test]
    async fn test_keeps_existing_selection_and_fills_from_first_page() {
        let source = Arc::new(CollectionSource::new(50));
        let selection = RwLock::new(SelectionStore::new());
        {
            let mut store = selection.write().await;
            for id in 36..41u64 {
                store.select(Record::new(id, format!("Artwork {id}")));
            }
        }

        let outcome = selector(&source).select_first_n(&selection, 12, 50).await.unwrap();

        let store = selection.read().await;
        assert_eq!(outcome.added, 7);
        assert_eq!(store.count(), 12);
        assert!((36..41).all(|id| store.contains(RecordId(id))));
        assert!((0..7).all(|id| store.contains(RecordId(id))));
        assert!(!store.contains(RecordId(7)));
    }

    #[tokio::test]
    async fn test_skips_already_selected_records_on_the_way() {
        let source = Arc::new(CollectionSource::new(50));
        let selection = RwLock::new(SelectionStore::new());
        selection.write().await.merge(vec![Record::new(2u64, "a"), Record::new(5u64, "b")]);

        let outcome = selector(&source).select_first_n(&selection, 6, 50).await.unwrap();

        assert_eq!(outcome.added, 4);
        assert_eq!(ids(&*selection.read().await), vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_target_already_met_fetches_nothing() {
        let source = Arc::new(CollectionSource::new(50));
        let selection = RwLock::new(SelectionStore::new());
        selection
            .write()
            .await
            .merge((0..10u64).map(|id| Record::new(id, "x")));

        let outcome = selector(&source).select_first_n(&selection, 10, 50).await.unwrap();

        assert_eq!(outcome.completion, BulkCompletion::AlreadySatisfied);
        assert_eq!(outcome.added, 0);
        assert!(source.requested_pages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_collection_is_exhausted_immediately() {
        let source = Arc::new(CollectionSource::new(0));
        let selection = RwLock::new(SelectionStore::new());

        let outcome = selector(&source).select_first_n(&selection, 5, 0).await.unwrap();

        assert_eq!(outcome.completion, BulkCompletion::Exhausted);
        assert!(source.requested_pages().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_pages_before_the_failed_one() {
        let source = Arc::new(CollectionSource::new(50));
        source.fail_on(1);
        let selection = RwLock::new(SelectionStore::new());

        let err = selector(&source)
            .select_first_n(&selection, 40, 50)
            .await
            .unwrap_err();

        match err {
            BulkSelectError::Interrupted {
                page,
                added,
                selected,
                ref source,
            } => {
                assert_eq!(page, 1);
                assert_eq!(added, 12);
                assert_eq!(selected, 12);
                assert!(source.is_transport());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Page 2 succeeded but follows the failed page, so it is dropped
        assert_eq!(ids(&*selection.read().await), (0..12).collect::<Vec<u64>>());
        assert_eq!(source.requested_pages(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_failure_in_second_batch_keeps_first_batch() {
        let source = Arc::new(CollectionSource::new(50));
        source.fail_on(3);
        let selection = RwLock::new(SelectionStore::new());

        let err = selector(&source)
            .select_first_n(&selection, 50, 50)
            .await
            .unwrap_err();

        assert_eq!(err.added(), 36);
        assert_eq!(selection.read().await.count(), 36);
    }

    #[tokio::test]
    async fn test_batch_size_one_walks_sequentially() {
        let source = Arc::new(CollectionSource::new(30));
        let selection = RwLock::new(SelectionStore::new());

        let outcome = BulkSelector::new(source.clone(), 12, 1)
            .select_first_n(&selection, 30, 30)
            .await
            .unwrap();

        assert_eq!(outcome.batches, 3);
        assert_eq!(source.max_in_flight(), 1);
    }
}

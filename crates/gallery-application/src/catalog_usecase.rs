//! Catalog use case.
//!
//! Coordinates the displayed page, the session selection and bulk selection
//! on behalf of a rendering surface. The surface feeds three kinds of events
//! in (navigation, per-page checked sets, bulk targets) and reads the page,
//! the visible selection, the selection count and the loading flag back.

use std::sync::Arc;
use tokio::sync::RwLock;

use gallery_core::config::CatalogConfig;
use gallery_core::error::{FetchError, GalleryError, Result};
use gallery_core::record::{Page, Record, RecordId, RecordSource, page_count};
use gallery_core::selection::{SelectionDelta, SelectionStore};
use gallery_core::view::{PageCache, PageLoad, ViewState};

use crate::bulk_selector::{BulkOutcome, BulkSelectError, BulkSelector};

/// Session controller owning the page cache and the selection store.
pub struct CatalogUseCase {
    pages: PageCache,
    selection: Arc<RwLock<SelectionStore>>,
    bulk: BulkSelector,
}

impl CatalogUseCase {
    /// Creates a use case over a record source.
    pub fn new(source: Arc<dyn RecordSource>, config: &CatalogConfig) -> Self {
        Self {
            pages: PageCache::new(source.clone(), config.page_size),
            selection: Arc::new(RwLock::new(SelectionStore::new())),
            bulk: BulkSelector::new(source, config.page_size, config.bulk_batch_size),
        }
    }

    /// Handles a navigation event.
    ///
    /// A failed fetch leaves the previous page displayed; the error is
    /// returned so the surface can report it.
    pub async fn navigate(&self, index: usize) -> std::result::Result<PageLoad, FetchError> {
        self.pages.load_page(index).await
    }

    /// Reloads the displayed page.
    pub async fn refresh(&self) -> std::result::Result<PageLoad, FetchError> {
        self.pages.refresh().await
    }

    /// Handles the checked set the surface reports for the visible page.
    ///
    /// Ids that are not on the visible page are ignored.
    pub async fn update_page_selection(&self, checked: &[RecordId]) -> SelectionDelta {
        let page = self.pages.current_page().await;
        let checked_records: Vec<Record> = page
            .records
            .iter()
            .filter(|record| checked.contains(&record.id))
            .cloned()
            .collect();

        if checked_records.len() < checked.len() {
            tracing::debug!(
                "Ignoring {} checked ids not on page {}",
                checked.len() - checked_records.len(),
                page.index
            );
        }

        self.selection
            .write()
            .await
            .reconcile(&page.records, &checked_records)
    }

    /// Toggles one row of the visible page and returns its new state.
    pub async fn toggle(&self, id: RecordId) -> Result<bool> {
        let page = self.pages.current_page().await;
        let record = page
            .records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| {
                GalleryError::invalid_input(format!("Record {} is not on page {}", id, page.index))
            })?;

        Ok(self.selection.write().await.toggle(record))
    }

    /// Checks a bulk target against the last observed collection total.
    pub async fn validate_bulk_target(&self, target: usize) -> std::result::Result<usize, BulkSelectError> {
        let max = self.pages.total_count().await.unwrap_or(0);
        if target == 0 || target > max {
            return Err(BulkSelectError::InvalidTarget { target, max });
        }
        Ok(target)
    }

    /// Handles a bulk-select submission: selects the first `target` records
    /// of the collection.
    pub async fn submit_bulk_selection(
        &self,
        target: usize,
    ) -> std::result::Result<BulkOutcome, BulkSelectError> {
        let target = self.validate_bulk_target(target).await?;
        let total = self.pages.total_count().await.unwrap_or(0);
        self.bulk.select_first_n(&self.selection, target, total).await
    }

    /// Selected records of the displayed page, in page order.
    pub async fn visible_selection(&self) -> Vec<Record> {
        let page = self.pages.current_page().await;
        self.selection
            .read()
            .await
            .visible_selection(&page)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of selected records across the whole collection.
    pub async fn selected_count(&self) -> usize {
        self.selection.read().await.count()
    }

    /// Every selected record, ordered by id.
    pub async fn selected_records(&self) -> Vec<Record> {
        self.selection
            .read()
            .await
            .records()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Drops the whole selection and returns how many records were selected.
    pub async fn clear_selection(&self) -> usize {
        let cleared = self.selection.write().await.clear();
        tracing::info!("Cleared {} selected records", cleared);
        cleared
    }

    /// Number of pages in the collection, once a page has been loaded.
    pub async fn page_count(&self) -> Option<usize> {
        let total = self.pages.total_count().await?;
        Some(page_count(total, self.pages.page_size()))
    }

    pub async fn current_page(&self) -> Page {
        self.pages.current_page().await
    }

    pub async fn is_loading(&self) -> bool {
        self.pages.is_loading().await
    }

    pub async fn view_state(&self) -> ViewState {
        self.pages.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk_selector::BulkCompletion;
    use crate::test_support::CollectionSource;

    fn usecase(total: usize) -> (Arc<CollectionSource>, CatalogUseCase) {
        let source = Arc::new(CollectionSource::new(total));
        let usecase = CatalogUseCase::new(source.clone(), &CatalogConfig::default());
        (source, usecase)
    }

    #[tokio::test]
    async fn test_navigation_updates_view() {
        let (_, usecase) = usecase(50);

        usecase.navigate(2).await.unwrap();

        let state = usecase.view_state().await;
        assert_eq!(state.page.index, 2);
        assert_eq!(state.total, Some(50));
        assert!(!usecase.is_loading().await);
    }

    #[tokio::test]
    async fn test_page_count_follows_total() {
        let (_, usecase) = usecase(50);
        assert_eq!(usecase.page_count().await, None);

        usecase.navigate(0).await.unwrap();
        assert_eq!(usecase.page_count().await, Some(5));
    }

    #[tokio::test]
    async fn test_refresh_reloads_displayed_page() {
        let (source, usecase) = usecase(50);
        usecase.navigate(2).await.unwrap();

        assert!(usecase.refresh().await.unwrap().is_applied());
        assert_eq!(source.requested_pages(), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_selection_survives_navigation() {
        let (_, usecase) = usecase(50);
        usecase.navigate(3).await.unwrap();
        usecase
            .update_page_selection(&[RecordId(36), RecordId(37), RecordId(40)])
            .await;

        usecase.navigate(0).await.unwrap();
        assert!(usecase.visible_selection().await.is_empty());
        assert_eq!(usecase.selected_count().await, 3);

        usecase.navigate(3).await.unwrap();
        let visible: Vec<RecordId> = usecase.visible_selection().await.iter().map(|r| r.id).collect();
        assert_eq!(visible, vec![RecordId(36), RecordId(37), RecordId(40)]);
    }

    #[tokio::test]
    async fn test_update_ignores_ids_off_page() {
        let (_, usecase) = usecase(50);
        usecase.navigate(0).await.unwrap();

        let delta = usecase.update_page_selection(&[RecordId(1), RecordId(30)]).await;

        assert_eq!(delta.added, vec![RecordId(1)]);
        assert_eq!(usecase.selected_count().await, 1);
    }

    #[tokio::test]
    async fn test_toggle_requires_visible_record() {
        let (_, usecase) = usecase(50);
        usecase.navigate(1).await.unwrap();

        assert!(usecase.toggle(RecordId(12)).await.unwrap());
        assert!(!usecase.toggle(RecordId(12)).await.unwrap());
        assert!(usecase.toggle(RecordId(0)).await.unwrap_err().is_invalid_input());
    }

    #[tokio::test]
    async fn test_bulk_target_is_validated_against_total() {
        let (source, usecase) = usecase(50);

        // Nothing loaded yet: no total, no valid target
        assert_eq!(
            usecase.submit_bulk_selection(5).await.unwrap_err(),
            BulkSelectError::InvalidTarget { target: 5, max: 0 }
        );

        usecase.navigate(0).await.unwrap();
        assert!(usecase.submit_bulk_selection(0).await.is_err());
        assert!(usecase.submit_bulk_selection(51).await.is_err());
        assert_eq!(source.requested_pages(), vec![0]);
    }

    #[tokio::test]
    async fn test_bulk_selection_shows_on_visible_pages() {
        let (_, usecase) = usecase(50);
        usecase.navigate(1).await.unwrap();

        let outcome = usecase.submit_bulk_selection(20).await.unwrap();

        assert_eq!(outcome.completion, BulkCompletion::Reached);
        assert_eq!(usecase.selected_count().await, 20);
        // Page 1 holds ids 12..24; the first 8 of them are selected
        let visible = usecase.visible_selection().await;
        assert_eq!(visible.len(), 8);
        assert_eq!(visible.last().map(|r| r.id), Some(RecordId(19)));
    }

    #[tokio::test]
    async fn test_deselect_after_bulk_selection() {
        let (_, usecase) = usecase(50);
        usecase.navigate(0).await.unwrap();
        usecase.submit_bulk_selection(30).await.unwrap();

        let checked: Vec<RecordId> = (0..12u64).filter(|id| *id != 4).map(RecordId).collect();
        let delta = usecase.update_page_selection(&checked).await;

        assert_eq!(delta.removed, vec![RecordId(4)]);
        assert_eq!(usecase.selected_count().await, 29);
    }

    #[tokio::test]
    async fn test_clear_selection() {
        let (_, usecase) = usecase(50);
        usecase.navigate(0).await.unwrap();
        usecase.submit_bulk_selection(15).await.unwrap();

        assert_eq!(usecase.clear_selection().await, 15);
        assert_eq!(usecase.selected_count().await, 0);
        assert!(usecase.selected_records().await.is_empty());
    }
}

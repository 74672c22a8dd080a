//! Page cache driving the displayed page and the loading flag.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::FetchError;
use crate::record::{Page, PageRequest, RecordSource};

/// Result of a page load that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    /// The page is now the displayed page
    Applied(Page),
    /// A newer navigation was issued while this one was in flight; the
    /// response was dropped
    Superseded { index: usize },
}

impl PageLoad {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Snapshot of what the view should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// The displayed page
    pub page: Page,
    /// Zero-based page index most recently requested by navigation
    pub cursor: usize,
    /// Collection total from the last applied page, `None` before the first load
    pub total: Option<usize>,
    /// `true` while the latest load is in flight
    pub loading: bool,
    latest_token: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: Page::empty(),
            cursor: 0,
            total: None,
            loading: false,
            latest_token: 0,
        }
    }
}

/// Holds the currently displayed page and refreshes it on navigation.
///
/// `PageCache` is responsible for:
/// - Fetching the page for a navigation event
/// - Keeping the previous page when a fetch fails
/// - Driving the loading flag
/// - Dropping responses of navigations that have since been superseded
///
/// Every load takes a request token; a response is applied only if its token
/// is still the latest issued, so the most recent navigation always wins.
pub struct PageCache {
    source: Arc<dyn RecordSource>,
    page_size: usize,
    state: RwLock<ViewState>,
}

impl PageCache {
    /// Creates a new `PageCache` over a record source.
    ///
    /// # Arguments
    ///
    /// * `source` - The paginated record source
    /// * `page_size` - Records per page
    pub fn new(source: Arc<dyn RecordSource>, page_size: usize) -> Self {
        Self {
            source,
            page_size,
            state: RwLock::new(ViewState::default()),
        }
    }

    /// Loads the page at `index` and makes it the displayed page.
    ///
    /// # Returns
    ///
    /// - `Ok(PageLoad::Applied)`: the page replaced the displayed page
    /// - `Ok(PageLoad::Superseded)`: a newer navigation was issued meanwhile
    /// - `Err(FetchError)`: the fetch failed; the previous page stays displayed
    pub async fn load_page(&self, index: usize) -> Result<PageLoad, FetchError> {
        let token = {
            let mut state = self.state.write().await;
            state.latest_token += 1;
            state.cursor = index;
            state.loading = true;
            state.latest_token
        };

        tracing::debug!("Loading page {} (token {})", index, token);

        let result = self
            .source
            .fetch_page(PageRequest::new(index, self.page_size))
            .await
            .and_then(|page| {
                page.validate(self.page_size)?;
                Ok(page)
            });

        let mut state = self.state.write().await;
        if state.latest_token != token {
            tracing::debug!(
                "Dropping response for page {} (token {}, latest {})",
                index,
                token,
                state.latest_token
            );
            return Ok(PageLoad::Superseded { index });
        }

        state.loading = false;
        match result {
            Ok(page) => {
                if state.total.is_some_and(|total| total != page.total) {
                    tracing::debug!(
                        "Collection total changed from {:?} to {}",
                        state.total,
                        page.total
                    );
                }
                state.total = Some(page.total);
                state.page = page.clone();
                tracing::info!(
                    "Displaying page {} ({} records, total {})",
                    index,
                    page.len(),
                    page.total
                );
                Ok(PageLoad::Applied(page))
            }
            Err(e) => {
                tracing::warn!("Failed to load page {}: {}", index, e);
                Err(e)
            }
        }
    }

    /// Reloads the page under the cursor.
    pub async fn refresh(&self) -> Result<PageLoad, FetchError> {
        let cursor = self.state.read().await.cursor;
        self.load_page(cursor).await
    }

    /// Returns a copy of the displayed page.
    pub async fn current_page(&self) -> Page {
        self.state.read().await.page.clone()
    }

    /// Returns the last collection total observed, if any page was loaded.
    pub async fn total_count(&self) -> Option<usize> {
        self.state.read().await.total
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Returns a copy of the whole view state.
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

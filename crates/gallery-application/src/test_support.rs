//! In-memory record source shared by the application tests.

use async_trait::async_trait;
use gallery_core::error::FetchError;
use gallery_core::record::{Page, PageRequest, Record, RecordSource};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A collection of `total` records whose ids equal their position.
pub struct CollectionSource {
    total: usize,
    failing: Mutex<HashSet<usize>>,
    /// `(page index, fetches in flight when it started)` per request, in issue order
    pub requests: Mutex<Vec<(usize, usize)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CollectionSource {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            failing: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn fail_on(&self, index: usize) {
        self.failing.lock().unwrap().insert(index);
    }

    pub fn requested_pages(&self) -> Vec<usize> {
        self.requests.lock().unwrap().iter().map(|(page, _)| *page).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for CollectionSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, FetchError> {
        let before = self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.max_in_flight.fetch_max(before + 1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((request.index, before));

        // Let the other fetches of the batch start before this one completes
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(&request.index) {
            return Err(FetchError::transport(request.index, "connection reset by peer"));
        }

        let start = request.offset().min(self.total);
        let end = (start + request.size).min(self.total);
        let records = (start..end)
            .map(|i| Record::new(i as u64, format!("Artwork {i}")))
            .collect();
        Ok(Page::new(request.index, records, self.total))
    }
}

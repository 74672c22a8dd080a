//! Displayed-page state.
//!
//! Holds exactly one page of records at a time together with the pagination
//! cursor, the last observed collection total and the loading flag.

mod page_cache;

pub use page_cache::{PageCache, PageLoad, ViewState};

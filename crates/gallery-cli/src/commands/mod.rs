pub mod browse;
pub mod page;
pub mod render;
pub mod select;

use gallery_application::CatalogUseCase;

/// Converts a one-based page number from the command line to a page index.
pub fn page_index(number: u64) -> usize {
    number.saturating_sub(1) as usize
}

/// Prints the displayed page with its selection marks and the selection count.
pub async fn show_page(catalog: &CatalogUseCase) {
    let page = catalog.current_page().await;
    let visible = catalog.visible_selection().await;
    render::print_page(&page, &visible, catalog.selected_count().await);
}

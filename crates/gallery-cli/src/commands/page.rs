use anyhow::{Context, Result};
use gallery_application::CatalogUseCase;

use super::{page_index, show_page};

pub async fn run(catalog: &CatalogUseCase, number: u64) -> Result<()> {
    catalog
        .navigate(page_index(number))
        .await
        .with_context(|| format!("Failed to fetch page {}", number))?;

    show_page(catalog).await;

    Ok(())
}

use anyhow::{Context, Result};
use colored::Colorize;
use gallery_application::{BulkCompletion, BulkOutcome, BulkSelectError, CatalogUseCase};

use super::{page_index, render, show_page};

pub async fn run(catalog: &CatalogUseCase, count: usize, page: u64, list: bool) -> Result<()> {
    // The walk is bounded by the total the displayed page reports
    catalog
        .navigate(page_index(page))
        .await
        .with_context(|| format!("Failed to fetch page {}", page))?;

    let result = catalog.submit_bulk_selection(count).await;
    if let Err(e @ BulkSelectError::InvalidTarget { .. }) = &result {
        anyhow::bail!("{}", e);
    }

    report(&result);
    show_page(catalog).await;

    if list {
        let selected = catalog.selected_records().await;
        tracing::debug!("Selected ids: {}", render::id_list(&selected));
        println!();
        render::print_records(&selected);
    }

    result.map(|_| ()).map_err(Into::into)
}

/// Prints how a bulk selection ended.
pub fn report(result: &Result<BulkOutcome, BulkSelectError>) {
    match result {
        Ok(outcome) => match outcome.completion {
            BulkCompletion::AlreadySatisfied => {
                println!("✅ {} artworks already selected", outcome.selected)
            }
            BulkCompletion::Reached => println!(
                "✅ Selected the first {} artworks ({} pages fetched)",
                outcome.selected, outcome.pages_requested
            ),
            BulkCompletion::Exhausted => println!(
                "✅ Catalog exhausted: selected all {} artworks",
                outcome.selected
            ),
        },
        Err(e @ BulkSelectError::InvalidTarget { .. }) => {
            println!("{}", format!("❌ {}", e).red());
        }
        Err(e) => {
            println!("{}", format!("⚠️  {}", e).yellow());
            println!("   Kept {} artworks selected before the failure", e.added());
        }
    }
}

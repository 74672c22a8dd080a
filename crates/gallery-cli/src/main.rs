use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use gallery_application::CatalogUseCase;
use gallery_core::config::CatalogConfig;
use gallery_infrastructure::{ConfigService, HttpRecordSource};

mod commands;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Gallery CLI - browse the artwork catalog and build cross-page selections", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the artworks API base url
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of the catalog
    Page {
        /// Page number, starting at 1
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,
    },
    /// Browse the catalog interactively, keeping the selection across pages
    Browse {
        /// Page to start on, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,
    },
    /// Select the first N artworks of the catalog, across pages
    SelectFirst {
        /// Number of artworks to select
        count: usize,

        /// Page to display afterwards, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Print every selected artwork, not only the ones on the displayed page
        #[arg(long)]
        list: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new_default()?,
    };

    let mut config = service
        .get_config()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;

    if let Some(url) = &cli.base_url {
        config = config.with_api_base_url(url.clone());
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    tracing::debug!("Using catalog at {}", config.api_base_url);

    let source = HttpRecordSource::from_config(&config)?;
    let catalog = CatalogUseCase::new(Arc::new(source), &config);

    match cli.command {
        Commands::Page { number } => commands::page::run(&catalog, number).await?,
        Commands::Browse { page } => commands::browse::run(&catalog, page).await?,
        Commands::SelectFirst { count, page, list } => {
            commands::select::run(&catalog, count, page, list).await?
        }
    }

    Ok(())
}

//! # The Main Entry Point of a Scrape
//!
//! Loads the configuration and downloads the paintings of every configured painter.
//!
//! # Steps:
//! 1. Loads the configuration
//! 2. Creates the assets and paintings folders
//! 3. Scrapes each painter's catalogue, one page at a time
//!
//! Any error stops the run. Paintings stored before the error stay in the catalog,
//! so running again resumes where it stopped.

use crate::configuration::{self, Settings};
use crate::foundation::catalog::{ensure_parent_dir, CatalogStore};
use crate::http_client::HttpFetcher;
use crate::process::{self, ScrapeContext};
use crate::sites::TableGallery;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;
use url::Url;

pub async fn run(cfg_file: &Path) -> anyhow::Result<()> {
    let settings = configuration::get_configuration(cfg_file)
        .with_context(|| format!("Unable to parse configuration file {}", cfg_file.display()))?;

    scrape_all(&settings).await
}

pub async fn scrape_all(settings: &Settings) -> anyhow::Result<()> {
    let paintings_dir = settings.paintings_path();
    fs::create_dir_all(&paintings_dir)
        .with_context(|| format!("Unable to create {}", paintings_dir.display()))?;

    let store = CatalogStore::new(settings.catalog_path());
    ensure_parent_dir(store.path())?;
    info!(catalog = %store.path().display(), paintings = %paintings_dir.display(), "assets ready");

    let fetcher = HttpFetcher::new(settings.request_timeout())?;
    let ctx = ScrapeContext {
        fetcher: &fetcher,
        store: &store,
        paintings_dir: &paintings_dir,
        image_extension: &settings.image_extension,
    };

    for source in &settings.artists {
        let listing_url = Url::parse(&source.url)
            .with_context(|| format!("Invalid catalogue URL for {}: {}", source.name, source.url))?;
        let site = TableGallery::new(source.selectors.clone());

        println!(
            "\x1b[1m\x1b[34mDownloading the paintings of {}...\x1b[0m",
            source.name
        );
        let summary = process::process_artist(&ctx, &site, &source.name, &listing_url)
            .await
            .with_context(|| format!("Failed to scrape the paintings of {}", source.name))?;

        println!(
            "\x1b[1m\x1b[32mAll the paintings of {} have been downloaded.\x1b[0m ({} new, {} already present)",
            source.name, summary.downloaded, summary.already_present
        );
    }

    Ok(())
}

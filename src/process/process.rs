//! This module drives the scraping of one painter: it walks the catalogue listing,
//! reads every detail page and stores each new painting with its metadata.
//!
//! Rows are handled one at a time and the first error stops the whole artist.

use crate::foundation::catalog::{Artwork, CatalogStore};
use crate::foundation::utils::{normalize_label, prepare_image_name};
use crate::http_client::{Fetcher, Result};
use crate::sites::SiteScraper;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Where and how paintings are stored.
pub struct ScrapeContext<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub store: &'a CatalogStore,
    pub paintings_dir: &'a Path,
    pub image_extension: &'a str,
}

/// What [`merge_artwork`] did with a painting, with the image file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Downloaded(String),
    AlreadyExists(String),
}

/// Counts for one painter's run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArtistSummary {
    pub downloaded: usize,
    pub already_present: usize,
}

/// Scrapes every painting listed on `listing_url`.
///
/// # Arguments
///
/// * `ctx` - Fetcher, catalog and paintings directory to use.
/// * `site` - Extraction rules for the gallery hosting the listing.
/// * `artist` - Display name of the painter, e.g. `René Magritte`.
/// * `listing_url` - The painter's catalogue page.
///
pub async fn process_artist(
    ctx: &ScrapeContext<'_>,
    site: &dyn SiteScraper,
    artist: &str,
    listing_url: &Url,
) -> Result<ArtistSummary> {
    info!(artist, url = %listing_url, "fetching listing");
    let listing = site.fetch_listing(ctx.fetcher, listing_url).await?;
    let progress = create_progress_bar(listing.len() as u64);

    let mut summary = ArtistSummary::default();
    for detail_url in listing.detail_urls() {
        let detail_url = detail_url?;
        progress.set_message(detail_url.path().to_string());

        let artwork = site.extract_detail(ctx.fetcher, artist, &detail_url).await?;
        match merge_artwork(ctx, &artwork).await? {
            MergeOutcome::Downloaded(filename) => {
                progress.suspend(|| println!("\x1b[32mFile {filename} downloaded.\x1b[0m"));
                summary.downloaded += 1;
            }
            MergeOutcome::AlreadyExists(filename) => {
                progress.suspend(|| println!("\x1b[33mFile {filename} already exists.\x1b[0m"));
                summary.already_present += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(summary)
}

/// Stores one painting unless its file name is already in the catalog.
///
/// The catalog stays locked from the presence check until the rewrite. The image
/// is written before the catalog, so a failed download never leaves a record
/// pointing at a missing file.
pub async fn merge_artwork(ctx: &ScrapeContext<'_>, artwork: &Artwork) -> Result<MergeOutcome> {
    let artist_key = normalize_label(&artwork.artist);
    let filename = prepare_image_name(&artwork.artist, &artwork.title, ctx.image_extension);

    let mut catalog = ctx.store.lock_async().await?;
    if catalog.contains(&artist_key, &filename) {
        debug!(artist = %artist_key, %filename, "already in catalog");
        return Ok(MergeOutcome::AlreadyExists(filename));
    }

    let bytes = ctx.fetcher.get_bytes(&artwork.image_url).await?;
    tokio::fs::write(ctx.paintings_dir.join(&filename), &bytes).await?;

    catalog.insert(&artist_key, &filename, artwork.to_record());
    catalog.commit()?;

    info!(artist = %artist_key, %filename, bytes = bytes.len(), "downloaded");
    Ok(MergeOutcome::Downloaded(filename))
}

/// Progress bar counting detail pages, shown as `Downloading 3/120`.
fn create_progress_bar(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {elapsed_precise} [{bar:40.cyan/blue}] Downloading {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    progress
}

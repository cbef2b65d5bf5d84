//! Galleries laid out as one big table of paintings, each row linking to a page
//! with the painting's heading, picture and write-up. renemagritte.org is built
//! this way.

use crate::foundation::catalog::Artwork;
use crate::foundation::utils::{collapse_whitespace, split_heading};
use crate::http_client::{Fetcher, Result, ScrapeError};
use crate::sites::{site_root, Listing, SiteScraper};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// CSS selectors locating each piece of a table gallery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GallerySelectors {
    /// Table holding the paintings on the catalogue page.
    pub listing_table: String,
    /// One painting per match inside the listing table.
    pub listing_row: String,
    /// Link to the detail page within a row.
    pub listing_link: String,
    /// Heading carrying `Title, year`.
    pub heading: String,
    pub detail_table: String,
    /// Picture inside the detail table.
    pub detail_image: String,
    /// Block with the painting's description.
    pub content: String,
}

impl Default for GallerySelectors {
    fn default() -> Self {
        Self {
            listing_table: "table".to_string(),
            listing_row: "tr".to_string(),
            listing_link: "a[href]".to_string(),
            heading: "h1".to_string(),
            detail_table: "table".to_string(),
            detail_image: "img".to_string(),
            content: "div.art-PostContent".to_string(),
        }
    }
}

pub struct TableGallery {
    selectors: GallerySelectors,
}

impl TableGallery {
    pub fn new(selectors: GallerySelectors) -> Self {
        Self { selectors }
    }

    pub fn parse_listing(&self, html: &str, page_url: &Url) -> Result<Listing> {
        let document = Html::parse_document(html);
        let table = first_match(&document.root_element(), &self.selectors.listing_table, page_url)?;

        let row_selector = compile(&self.selectors.listing_row, page_url)?;
        let link_selector = compile(&self.selectors.listing_link, page_url)?;
        let rows: Vec<Option<String>> = table
            .select(&row_selector)
            .map(|row| {
                row.select(&link_selector)
                    .next()
                    .and_then(|link| link.value().attr("href"))
                    .map(str::to_string)
            })
            .collect();

        if rows.is_empty() {
            return Err(ScrapeError::structure(page_url.as_str(), &self.selectors.listing_row));
        }

        debug!(url = %page_url, rows = rows.len(), "parsed listing");
        Ok(Listing::new(
            page_url.clone(),
            site_root(page_url)?,
            &self.selectors.listing_link,
            rows,
        ))
    }

    pub fn parse_detail(&self, artist: &str, html: &str, page_url: &Url) -> Result<Artwork> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let heading = first_match(&root, &self.selectors.heading, page_url)?
            .text()
            .collect::<String>();
        let (title, date) = split_heading(&heading);
        if title.is_empty() {
            return Err(ScrapeError::parse(
                page_url.as_str(),
                format!("heading `{}` has no title", heading.trim()),
            ));
        }

        let table = first_match(&root, &self.selectors.detail_table, page_url)?;
        let src = first_match(&table, &self.selectors.detail_image, page_url)?
            .value()
            .attr("src")
            .ok_or_else(|| {
                let selector = format!("{}[src]", self.selectors.detail_image);
                ScrapeError::structure(page_url.as_str(), &selector)
            })?;
        let image_url = site_root(page_url)?.join(src).map_err(|e| {
            ScrapeError::parse(page_url.as_str(), format!("image source `{src}`: {e}"))
        })?;

        let content = first_match(&root, &self.selectors.content, page_url)?;
        let description = collapse_whitespace(&content.text().collect::<String>());

        Ok(Artwork {
            artist: artist.to_string(),
            title,
            date,
            description,
            image_url,
            page_url: page_url.clone(),
        })
    }
}

impl Default for TableGallery {
    fn default() -> Self {
        Self::new(GallerySelectors::default())
    }
}

#[async_trait]
impl SiteScraper for TableGallery {
    async fn fetch_listing(&self, fetcher: &dyn Fetcher, listing_url: &Url) -> Result<Listing> {
        let html = fetcher.get_text(listing_url).await?;
        self.parse_listing(&html, listing_url)
    }

    async fn extract_detail(
        &self,
        fetcher: &dyn Fetcher,
        artist: &str,
        detail_url: &Url,
    ) -> Result<Artwork> {
        let html = fetcher.get_text(detail_url).await?;
        self.parse_detail(artist, &html, detail_url)
    }
}

fn compile(css: &str, page_url: &Url) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::parse(page_url.as_str(), format!("invalid selector `{css}`: {e}")))
}

fn first_match<'a>(scope: &ElementRef<'a>, css: &str, page_url: &Url) -> Result<ElementRef<'a>> {
    let selector = compile(css, page_url)?;
    scope
        .select(&selector)
        .next()
        .ok_or_else(|| ScrapeError::structure(page_url.as_str(), css))
}

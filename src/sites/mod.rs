//! Site-specific extraction rules.
//!
//! The pipeline only sees [`SiteScraper`]; each gallery layout provides its own
//! implementation.

mod listing;
mod table_gallery;

pub use listing::Listing;
pub use table_gallery::{GallerySelectors, TableGallery};

use crate::foundation::catalog::Artwork;
use crate::http_client::{Fetcher, Result};
use async_trait::async_trait;
use url::Url;

#[async_trait]
pub trait SiteScraper: Send + Sync {
    /// Fetches a catalogue page and lists the detail pages it links to.
    ///
    /// # Arguments
    /// * `fetcher` - Used for the single GET of the catalogue page.
    /// * `listing_url` - Absolute URL of the catalogue page.
    async fn fetch_listing(&self, fetcher: &dyn Fetcher, listing_url: &Url) -> Result<Listing>;

    /// Fetches one detail page and reads the painting it describes.
    ///
    /// # Arguments
    /// * `fetcher` - Used for the single GET of the detail page.
    /// * `artist` - Display name of the painter, copied into the result.
    /// * `detail_url` - Absolute URL of the detail page.
    async fn extract_detail(
        &self,
        fetcher: &dyn Fetcher,
        artist: &str,
        detail_url: &Url,
    ) -> Result<Artwork>;
}

/// Root of the site hosting `page_url`, e.g. `https://www.renemagritte.org/`.
/// Relative links found on the site's pages are resolved against it.
pub fn site_root(page_url: &Url) -> Result<Url> {
    Ok(page_url.join("/")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_root() {
        let url = Url::parse("https://www.renemagritte.org/rene-magritte-paintings.jsp?page=2").unwrap();
        assert_eq!(site_root(&url).unwrap().as_str(), "https://www.renemagritte.org/");

        let nested = Url::parse("http://127.0.0.1:8080/gallery/painter/list.html").unwrap();
        assert_eq!(site_root(&nested).unwrap().as_str(), "http://127.0.0.1:8080/");
    }
}

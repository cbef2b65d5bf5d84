use crate::http_client::{Result, ScrapeError};
use url::Url;

/// Rows of a catalogue table, in page order.
///
/// Links are only resolved while iterating, so a row without a link is reported
/// when the pipeline reaches it and not before. [`Listing::detail_urls`] can be
/// called any number of times; each call starts again from the first row.
#[derive(Debug, Clone)]
pub struct Listing {
    page_url: Url,
    root: Url,
    link_selector: String,
    rows: Vec<Option<String>>,
}

impl Listing {
    pub fn new(page_url: Url, root: Url, link_selector: &str, rows: Vec<Option<String>>) -> Self {
        Self {
            page_url,
            root,
            link_selector: link_selector.to_string(),
            rows,
        }
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn detail_urls(&self) -> impl Iterator<Item = Result<Url>> + '_ {
        self.rows.iter().map(move |href| match href {
            Some(href) => Ok(self.root.join(href)?),
            None => Err(ScrapeError::structure(
                self.page_url.as_str(),
                &self.link_selector,
            )),
        })
    }
}

mod fetcher;
mod scrape_error;

pub use fetcher::*;
pub use scrape_error::{Result, ScrapeError};

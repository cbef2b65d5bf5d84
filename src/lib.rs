pub mod configuration;
pub mod foundation;
pub mod http_client;
pub mod process;
pub mod sites;
pub mod startup;

pub use configuration::*;
pub use foundation::catalog::*;
pub use http_client::{Fetcher, HttpFetcher, ScrapeError};
pub use process::{merge_artwork, process_artist, ArtistSummary, MergeOutcome, ScrapeContext};
pub use sites::{GallerySelectors, Listing, SiteScraper, TableGallery};

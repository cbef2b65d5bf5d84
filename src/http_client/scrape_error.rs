use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Structure error at {url}: no element matching `{selector}`")]
    Structure { url: String, selector: String },

    #[error("Parse error at {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    pub fn fetch(url: &str, source: reqwest::Error) -> Self {
        ScrapeError::Fetch {
            url: url.to_string(),
            source,
        }
    }

    pub fn structure(url: &str, selector: &str) -> Self {
        ScrapeError::Structure {
            url: url.to_string(),
            selector: selector.to_string(),
        }
    }

    pub fn parse(url: &str, message: impl Into<String>) -> Self {
        ScrapeError::Parse {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

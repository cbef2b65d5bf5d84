use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Metadata stored for one downloaded painting, keyed by its image file name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ArtworkRecord {
    pub description: String,
    #[serde(with = "year_or_none")]
    pub date: Option<String>,
    pub url: String, // detail page the record was scraped from
}

/// `artist key -> image file name -> record`, the whole `artists.json` document.
pub type ArtistCatalog = BTreeMap<String, BTreeMap<String, ArtworkRecord>>;

/// Everything read from one painting detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub artist: String,
    pub title: String,
    pub date: Option<String>,
    pub description: String,
    pub image_url: Url,
    pub page_url: Url,
}

impl Artwork {
    pub fn to_record(&self) -> ArtworkRecord {
        ArtworkRecord {
            description: self.description.clone(),
            date: self.date.clone(),
            url: self.page_url.to_string(),
        }
    }
}

/// The gallery front-end reads `date` as a plain string, so a missing year is
/// written as `"None"`.
mod year_or_none {
    use serde::{Deserialize, Deserializer, Serializer};

    const MISSING: &str = "None";

    pub fn serialize<S: Serializer>(date: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(date.as_deref().unwrap_or(MISSING))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok((raw != MISSING && !raw.is_empty()).then_some(raw))
    }
}

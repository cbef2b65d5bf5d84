use once_cell::sync::Lazy;
use regex::Regex;

static APOSTROPHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"'+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PATH_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\]+").unwrap());
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());

/// Replaces the accented Latin letters used in French titles by their base letter.
///
/// Only à â ä é è ê ë î ï ô ö ù û ü ÿ ç are touched. Any other character,
/// accented or not, is kept as is.
///
/// # Examples
///
/// ```
/// use paintscrape::foundation::utils::remove_accents;
///
/// assert_eq!(remove_accents("fenêtre ouverte"), "fenetre ouverte");
/// assert_eq!(remove_accents("señor"), "señor");
/// ```
pub fn remove_accents(word: &str) -> String {
    word.chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ÿ' => 'y',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Lowercases, trims and strips accents from a label.
///
/// This is the key used for artists in the catalog document. Applying it twice
/// gives the same result as applying it once.
///
/// # Examples
///
/// ```
/// use paintscrape::foundation::utils::normalize_label;
///
/// assert_eq!(normalize_label("  René Magritte "), "rene magritte");
/// ```
pub fn normalize_label(label: &str) -> String {
    remove_accents(label.to_lowercase().trim())
}

/// Builds the image file name for a painting: `artist_name-painting_name.<extension>`.
///
/// Both parts are normalized with [`normalize_label`], then apostrophes, runs of
/// whitespace and path separators are turned into underscores.
///
/// # Examples
///
/// ```
/// use paintscrape::foundation::utils::prepare_image_name;
///
/// let name = prepare_image_name("René Magritte", "L'Empire des Lumières", "jpg");
/// assert_eq!(name, "rene_magritte-l_empire_des_lumieres.jpg");
/// ```
pub fn prepare_image_name(author: &str, name: &str, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        filename_token(author),
        filename_token(name),
        extension
    )
}

fn filename_token(label: &str) -> String {
    let normalized = normalize_label(label);
    let without_apostrophes = APOSTROPHES.replace_all(&normalized, "_");
    let without_whitespace = WHITESPACE.replace_all(&without_apostrophes, "_");
    PATH_SEPARATORS
        .replace_all(&without_whitespace, "_")
        .into_owned()
}

/// Collapses every run of whitespace, newlines included, into one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a painting heading such as `"Golconda, 1953"` into its title and year.
///
/// The heading is cut at its first comma. The year is the first run of four ASCII
/// digits after that comma. A heading without a comma never carries a year, and a comma
/// with no four-digit run after it gives `None` as well.
///
/// # Examples
///
/// ```
/// use paintscrape::foundation::utils::split_heading;
///
/// assert_eq!(
///     split_heading("The Lovers, c. 1928"),
///     ("The Lovers".to_string(), Some("1928".to_string()))
/// );
/// assert_eq!(split_heading("The Lovers"), ("The Lovers".to_string(), None));
/// ```
pub fn split_heading(heading: &str) -> (String, Option<String>) {
    match heading.split_once(',') {
        Some((title, remainder)) => {
            let date = YEAR
                .find(remainder.trim())
                .map(|year| year.as_str().to_string());
            (title.trim().to_string(), date)
        }
        None => (heading.trim().to_string(), None),
    }
}

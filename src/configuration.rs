use crate::sites::GallerySelectors;
use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
    #[serde(default = "default_paintings_dir")]
    pub paintings_dir: String,
    #[serde(default = "default_image_extension")]
    pub image_extension: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_artists")]
    pub artists: Vec<ArtistSource>,
}

/// A painter and the catalogue page listing their paintings.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub selectors: GallerySelectors,
}

impl ArtistSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            selectors: GallerySelectors::default(),
        }
    }
}

impl Settings {
    pub fn catalog_path(&self) -> PathBuf {
        self.assets_root.join(&self.catalog_file)
    }

    pub fn paintings_path(&self) -> PathBuf {
        self.assets_root.join(&self.paintings_dir)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("src/assets")
}

fn default_catalog_file() -> String {
    "artists.json".to_string()
}

fn default_paintings_dir() -> String {
    "paintings".to_string()
}

fn default_image_extension() -> String {
    "jpg".to_string()
}

fn default_artists() -> Vec<ArtistSource> {
    vec![ArtistSource::new(
        "René Magritte",
        "https://www.renemagritte.org/rene-magritte-paintings.jsp",
    )]
}

/// Loads settings from defaults, then `cfg_file` if it exists, then
/// `PAINTSCRAPE_*` environment variables.
pub fn get_configuration(cfg_file: &Path) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(
            config::File::from(cfg_file)
                .format(config::FileFormat::Yaml)
                .required(false),
        )
        .add_source(config::Environment::with_prefix("PAINTSCRAPE"))
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigFolder {
    pub fn new() -> Self {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::in_home(Path::new(&home_dir))
    }

    pub fn in_home(home_dir: &Path) -> Self {
        let config_dir = home_dir.join(".paintscrape");
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }
}

impl Default for ConfigFolder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_config(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");

    if cfg_folder.config_file.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    write_template(&cfg_folder)?;

    println!("\x1b[32mConfiguration file created at:");
    println!("  -> {}", cfg_folder.config_file.display());
    println!("\x1b[0mEdit it to change the assets folder or add painters.");

    Ok(())
}

fn write_template(cfg_folder: &ConfigFolder) -> io::Result<()> {
    fs::create_dir_all(&cfg_folder.config_dir)?;
    fs::write(&cfg_folder.config_file, include_str!("config_template.yaml"))
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration file already exists.");
    println!("Do you want to overwrite it? (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}

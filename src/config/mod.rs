use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Google Maps Platform API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub const DEFAULT_CITY: &str = "台中市";
pub const DEFAULT_RADIUS_M: u32 = 1500;
pub const DEFAULT_OVERLAP: f64 = 0.6;
pub const DEFAULT_LANGUAGE: &str = "zh-TW";
pub const DEFAULT_REGION: &str = "tw";
pub const DEFAULT_PLACE_TYPE: &str = "cafe";
pub const DEFAULT_OUTPUT: &str = "taichung_cafes.csv";
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 800;

/// Contents of a `cafegrid.toml` file. Every key is optional.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub overlap: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub place_type: Option<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub photo_max_width: Option<u32>,
    #[serde(default)]
    pub api: Option<ApiConfig>,
    #[serde(default)]
    pub pacing: Option<PacingConfig>,
}

fn default_geocode_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_nearby_url() -> String {
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json".to_string()
}

fn default_details_url() -> String {
    "https://maps.googleapis.com/maps/api/place/details/json".to_string()
}

fn default_photo_url() -> String {
    "https://maps.googleapis.com/maps/api/place/photo".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Places API endpoints and HTTP client settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_nearby_url")]
    pub nearby_url: String,
    #[serde(default = "default_details_url")]
    pub details_url: String,
    #[serde(default = "default_photo_url")]
    pub photo_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            nearby_url: default_nearby_url(),
            details_url: default_details_url(),
            photo_url: default_photo_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Point every endpoint at `base`, keeping the Google path layout
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocode_url: format!("{base}/maps/api/geocode/json"),
            nearby_url: format!("{base}/maps/api/place/nearbysearch/json"),
            details_url: format!("{base}/maps/api/place/details/json"),
            photo_url: format!("{base}/maps/api/place/photo"),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_page_token_delay_ms() -> u64 {
    2000
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_cell_delay_ms() -> u64 {
    500
}

fn default_details_delay_ms() -> u64 {
    250
}

fn default_max_pages() -> u32 {
    3
}

fn default_token_retries() -> u32 {
    3
}

/// Pauses between requests and pagination limits
///
/// A fresh `next_page_token` is rejected with INVALID_REQUEST until the
/// platform has activated it, hence the token delay and bounded retries.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PacingConfig {
    #[serde(default = "default_page_token_delay_ms")]
    pub page_token_delay_ms: u64,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_cell_delay_ms")]
    pub cell_delay_ms: u64,
    #[serde(default = "default_details_delay_ms")]
    pub details_delay_ms: u64,
    /// Nearby Search serves at most 3 pages (60 results)
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_token_retries")]
    pub token_retries: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            page_token_delay_ms: default_page_token_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
            cell_delay_ms: default_cell_delay_ms(),
            details_delay_ms: default_details_delay_ms(),
            max_pages: default_max_pages(),
            token_retries: default_token_retries(),
        }
    }
}

impl PacingConfig {
    /// No pauses at all; for tests and mock servers
    pub fn immediate() -> Self {
        Self {
            page_token_delay_ms: 0,
            page_delay_ms: 0,
            cell_delay_ms: 0,
            details_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn page_token_delay(&self) -> Duration {
        Duration::from_millis(self.page_token_delay_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn cell_delay(&self) -> Duration {
        Duration::from_millis(self.cell_delay_ms)
    }

    pub fn details_delay(&self) -> Duration {
        Duration::from_millis(self.details_delay_ms)
    }
}

impl FileConfig {
    /// Read a config file that the user named explicitly
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Search the usual locations and return the first config that parses
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("cafegrid.toml"));
    paths.push(PathBuf::from(".cafegrid.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("cafegrid").join("config.toml"));
        paths.push(config_dir.join("cafegrid.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".cafegrid.toml"));
    }

    paths
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub city: Option<String>,
    pub radius: Option<u32>,
    pub overlap: Option<f64>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub place_type: Option<String>,
    pub output: Option<PathBuf>,
    pub photo_max_width: Option<u32>,
    pub verbose: bool,
}

/// Fully resolved run settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub city: String,
    pub radius_m: u32,
    pub overlap: f64,
    pub language: String,
    pub region: String,
    pub place_type: String,
    pub output: PathBuf,
    pub photo_max_width: u32,
    pub verbose: bool,
    pub api: ApiConfig,
    pub pacing: PacingConfig,
}

impl Settings {
    /// Merge command line > config file > built-in defaults
    pub fn resolve(cli: Overrides, file: Option<FileConfig>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            city: cli
                .city
                .or(file.city)
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            radius_m: cli.radius.or(file.radius).unwrap_or(DEFAULT_RADIUS_M),
            overlap: cli.overlap.or(file.overlap).unwrap_or(DEFAULT_OVERLAP),
            language: cli
                .language
                .or(file.language)
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            region: cli
                .region
                .or(file.region)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            place_type: cli
                .place_type
                .or(file.place_type)
                .unwrap_or_else(|| DEFAULT_PLACE_TYPE.to_string()),
            output: cli
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            photo_max_width: cli
                .photo_max_width
                .or(file.photo_max_width)
                .unwrap_or(DEFAULT_PHOTO_MAX_WIDTH),
            verbose: cli.verbose,
            api: file.api.unwrap_or_default(),
            pacing: file.pacing.unwrap_or_default(),
        }
    }
}

/// Read the API key from the environment, failing when it is unset or blank
pub fn api_key_from_env() -> Result<String> {
    api_key_from(std::env::var(API_KEY_ENV).ok())
}

fn api_key_from(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => bail!("Set the {} environment variable first", API_KEY_ENV),
    }
}

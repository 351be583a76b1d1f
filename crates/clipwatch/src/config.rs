//! Settings persistence for clipwatch.
//!
//! Three JSON files live side by side in the data directory:
//!
//! - `config.json`: `{"interval": <seconds>}`
//! - `ng_words.json`: array of words to mask
//! - `url_mapping.json`: object mapping URL prefixes to replacements
//!
//! A missing file is created with defaults on first load. A file that exists
//! but does not parse is an error; it is never overwritten with defaults.

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::rules::{NgWordList, RuleSet, UrlMapping};
use crate::state::validate_interval;

/// Main settings file name.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// NG word list file name.
pub const NG_WORDS_FILE_NAME: &str = "ng_words.json";

/// URL mapping file name.
pub const URL_MAPPING_FILE_NAME: &str = "url_mapping.json";

/// Prefix for environment overrides (`CLIPWATCH_INTERVAL=1.0`).
pub const ENV_PREFIX: &str = "CLIPWATCH_";

/// Poll interval used when nothing else is configured.
pub const DEFAULT_INTERVAL: f64 = 0.5;

/// Persisted settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between clipboard polls.
    pub interval: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not a positive number.
    pub fn validate(&self) -> Result<()> {
        validate_interval(self.interval).map_err(|_| Error::ConfigValidation {
            message: format!(
                "interval must be a positive number of seconds within range, got {}",
                self.interval
            ),
        })?;
        Ok(())
    }
}

/// NG words seeded into a fresh `ng_words.json`.
#[must_use]
pub fn default_ng_words() -> NgWordList {
    NgWordList::new(vec!["password is 1234".to_string()])
}

/// URL mapping seeded into a fresh `url_mapping.json`.
#[must_use]
pub fn default_url_mapping() -> UrlMapping {
    [
        ("https://x.com/", "https://fixvx.com/"),
        ("https://twitter.com/", "https://fixvx.com/"),
    ]
    .into_iter()
    .collect()
}

/// Reads and writes the settings files in one directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Keep settings in `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Keep settings in `dir`, or in the working directory when `None`.
    #[must_use]
    pub fn in_dir_or_cwd(dir: Option<PathBuf>) -> Self {
        Self::new(dir.unwrap_or_else(|| PathBuf::from(".")))
    }

    /// The settings directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `config.json`.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Path of `ng_words.json`.
    #[must_use]
    pub fn ng_words_path(&self) -> PathBuf {
        self.dir.join(NG_WORDS_FILE_NAME)
    }

    /// Path of `url_mapping.json`.
    #[must_use]
    pub fn url_mapping_path(&self) -> PathBuf {
        self.dir.join(URL_MAPPING_FILE_NAME)
    }

    /// Load `config.json`, creating it with defaults if absent.
    ///
    /// Values are layered as defaults, then the file, then `CLIPWATCH_*`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, does not parse, or
    /// holds an invalid interval.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        self.seed_if_absent(&path, &Config::default())?;

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Json::file(&path))
            .merge(Env::prefixed(ENV_PREFIX).only(&["interval"]))
            .extract()?;
        config.validate()?;

        debug!(path = %path.display(), interval = config.interval, "Configuration loaded");
        Ok(config)
    }

    /// Persist `config.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or cannot be written.
    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.validate()?;
        self.write_json(&self.config_path(), config)
    }

    /// Load `ng_words.json`, creating it with defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or does not parse.
    pub fn load_ng_words(&self) -> Result<NgWordList> {
        let path = self.ng_words_path();
        self.seed_if_absent(&path, &default_ng_words())?;
        let words: NgWordList = self.read_json(&path)?;
        info!(count = words.len(), words = ?words.words(), "NG words loaded");
        Ok(words)
    }

    /// Load `url_mapping.json`, creating it with defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or does not parse.
    pub fn load_url_mapping(&self) -> Result<UrlMapping> {
        let path = self.url_mapping_path();
        self.seed_if_absent(&path, &default_url_mapping())?;
        let mapping: UrlMapping = self.read_json(&path)?;
        info!(count = mapping.len(), "URL mapping loaded");
        Ok(mapping)
    }

    /// Load both rule tables.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be created or does not parse.
    pub fn load_rules(&self) -> Result<RuleSet> {
        Ok(RuleSet::new(self.load_ng_words()?, self.load_url_mapping()?))
    }

    fn seed_if_absent<T: Serialize>(&self, path: &Path, defaults: &T) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        info!(path = %path.display(), "Creating settings file with defaults");
        self.write_json(path, defaults)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let raw = fs::read_to_string(path).map_err(|source| Error::SettingsFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| Error::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let file_err = |source: std::io::Error| Error::SettingsFile {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(file_err)?;
        fs::write(path, to_pretty_json(value)?).map_err(file_err)?;
        Ok(())
    }
}

/// Pretty-print with four-space indentation, leaving non-ASCII unescaped.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

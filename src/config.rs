use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::etsy::listings::{ListingField, DEFAULT_FIELDS};
use crate::terms::stop_words::StopWordSet;

/// Number of terms reported per shop unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// The shops analyzed on startup.
pub const DEFAULT_SEED_SHOPS: [&str; 10] = [
    "Element83",
    "LDawningScott",
    "PegandAwl",
    "SinScissorsBoutique",
    "OxAndPine",
    "volaris",
    "moderntextures",
    "CarveCraftworks",
    "EbanisteriaCavallaro",
    "SheetMusicEphemera",
];

/// Environment configuration: credentials and endpoints.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Etsy Open API key (ETSY_API_KEY)
    pub api_key: String,
    /// Etsy API base URL (ETSY_API_URL, defaults to the public v3 endpoint)
    pub api_url: String,
    /// Analysis config file named by SHOPWORDS_CONFIG, if any
    pub analysis_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            api_key: env::var("ETSY_API_KEY").unwrap_or_default(),
            api_url: env::var("ETSY_API_URL")
                .unwrap_or_else(|_| crate::etsy::client::DEFAULT_API_URL.to_string()),
            analysis_path: env::var_os("SHOPWORDS_CONFIG")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Check that the Etsy API key is configured.
    /// Call this before creating a client that will talk to Etsy.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "ETSY_API_KEY not set. Add it to your .env file or export it.\n\
                 See .env.example for the available variables."
            );
        }
        Ok(())
    }

    /// Where to read analysis options from.
    ///
    /// An explicit `--config` path wins, then SHOPWORDS_CONFIG, then
    /// `<config dir>/shopwords/config.json` if that file exists.
    pub fn analysis_config_path(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        cli_path
            .map(Path::to_path_buf)
            .or_else(|| self.analysis_path.clone())
            .or_else(|| default_analysis_path().filter(|p| p.is_file()))
    }
}

/// `<platform config dir>/shopwords/config.json`
pub fn default_analysis_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shopwords").join("config.json"))
}

/// Problems with the analysis config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("top_n must be at least 1")]
    ZeroTopN,

    #[error("fields must name at least one of: title, description, tags")]
    NoFields,

    #[error("unknown stop word preset {0:?} (expected \"listing\" or \"english\")")]
    UnknownPreset(String),
}

/// Everything the analyzer and aggregator need, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub stop_words: StopWordSet,
    pub top_n: NonZeroUsize,
    pub fields: Vec<ListingField>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            stop_words: StopWordSet::listing(),
            top_n: NonZeroUsize::new(DEFAULT_TOP_N).unwrap_or(NonZeroUsize::MIN),
            fields: DEFAULT_FIELDS.to_vec(),
        }
    }
}

/// Analysis settings plus the seed shop list.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub settings: AnalysisSettings,
    pub seed_shops: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            settings: AnalysisSettings::default(),
            seed_shops: DEFAULT_SEED_SHOPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// On-disk shape of the analysis config. Every key is optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalysisFile {
    stop_words: Option<StopWordsEntry>,
    top_n: Option<usize>,
    seed_shops: Option<Vec<String>>,
    fields: Option<Vec<ListingField>>,
}

/// `"stop_words": "english"` or `"stop_words": ["THE", "AND", ...]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StopWordsEntry {
    Preset(String),
    Words(Vec<String>),
}

impl AnalysisConfig {
    /// Load from a file, or return the defaults when `path` is None.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse a JSON config document, filling unset keys with defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: AnalysisFile = serde_json::from_str(text)?;
        let mut config = Self::default();

        if let Some(entry) = file.stop_words {
            config.settings.stop_words = match entry {
                StopWordsEntry::Preset(name) => match name.to_ascii_lowercase().as_str() {
                    "listing" => StopWordSet::listing(),
                    "english" => StopWordSet::english(),
                    _ => return Err(ConfigError::UnknownPreset(name)),
                },
                StopWordsEntry::Words(words) => StopWordSet::from_words(words),
            };
        }

        if let Some(top_n) = file.top_n {
            config.settings.top_n = NonZeroUsize::new(top_n).ok_or(ConfigError::ZeroTopN)?;
        }

        if let Some(fields) = file.fields {
            if fields.is_empty() {
                return Err(ConfigError::NoFields);
            }
            let mut unique = Vec::with_capacity(fields.len());
            for field in fields {
                if !unique.contains(&field) {
                    unique.push(field);
                }
            }
            config.settings.fields = unique;
        }

        if let Some(shops) = file.seed_shops {
            config.seed_shops = shops
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.settings.top_n.get(), 5);
        assert_eq!(config.settings.stop_words.len(), 37);
        assert_eq!(
            config.settings.fields,
            vec![ListingField::Title, ListingField::Description]
        );
        assert_eq!(config.seed_shops.len(), 10);
        assert_eq!(config.seed_shops[0], "Element83");
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        let config = AnalysisConfig::from_json("{}").unwrap();
        assert_eq!(config.settings.top_n.get(), DEFAULT_TOP_N);
        assert_eq!(config.seed_shops.len(), DEFAULT_SEED_SHOPS.len());
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "stop_words": ["the", "And"],
            "top_n": 3,
            "seed_shops": ["  ShopOne ", "", "ShopTwo"],
            "fields": ["title", "tags", "title"]
        }"#;
        let config = AnalysisConfig::from_json(json).unwrap();
        assert_eq!(config.settings.stop_words.sorted(), vec!["AND", "THE"]);
        assert_eq!(config.settings.top_n.get(), 3);
        assert_eq!(config.seed_shops, vec!["ShopOne", "ShopTwo"]);
        assert_eq!(
            config.settings.fields,
            vec![ListingField::Title, ListingField::Tags]
        );
    }

    #[test]
    fn test_english_preset() {
        let config = AnalysisConfig::from_json(r#"{"stop_words": "English"}"#).unwrap();
        assert!(config.settings.stop_words.len() > 37);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let err = AnalysisConfig::from_json(r#"{"stop_words": "klingon"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(ref p) if p == "klingon"));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let err = AnalysisConfig::from_json(r#"{"top_n": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTopN));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let err = AnalysisConfig::from_json(r#"{"fields": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoFields));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = AnalysisConfig::from_json(r#"{"api_key": "x"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = AnalysisConfig::load(Some(Path::new("/nonexistent/shopwords.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_require_api_key() {
        let config = Config {
            api_key: "  ".to_string(),
            api_url: crate::etsy::client::DEFAULT_API_URL.to_string(),
            analysis_path: None,
        };
        assert!(config.require_api_key().is_err());
    }
}

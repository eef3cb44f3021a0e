use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::models::SearchOptions;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub corpus: CorpusSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    #[serde(default = "default_users_table")]
    pub users_table: String,
    #[serde(default = "default_tutors_table")]
    pub tutors_table: String,
}

fn default_users_table() -> String { "user".to_string() }
fn default_tutors_table() -> String { "tutor".to_string() }

/// Where tutor profiles come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusSettings {
    #[serde(default = "default_corpus_backend")]
    pub backend: CorpusBackend,
    #[serde(default = "default_seed_file")]
    pub seed_file: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            backend: default_corpus_backend(),
            seed_file: default_seed_file(),
        }
    }
}

fn default_corpus_backend() -> CorpusBackend { CorpusBackend::Memory }
fn default_seed_file() -> String { "data/sample_tutors.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    /// none | hash | http | local
    #[serde(default = "default_embedding_backend")]
    pub backend: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,
    #[serde(default)]
    pub serialize: bool,
    #[serde(default = "default_true")]
    pub probe_on_start: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: default_embedding_backend(),
            model: default_model(),
            dimension: default_dimension(),
            endpoint: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            cache_size: default_cache_size(),
            serialize: false,
            probe_on_start: true,
        }
    }
}

fn default_embedding_backend() -> String { "none".to_string() }
fn default_model() -> String { "all-MiniLM-L6-v2".to_string() }
fn default_dimension() -> usize { 384 }
fn default_timeout_ms() -> u64 { 2000 }
fn default_cache_size() -> u64 { 10_000 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSettings {
    pub top_k: Option<usize>,
    pub min_score: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with EDUBRIDGE__)
    /// 5. DATABASE_URL and HF_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., EDUBRIDGE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("EDUBRIDGE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Cross-section checks serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corpus.backend == CorpusBackend::Postgres && self.database.is_none() {
            return Err(ConfigError::Message(
                "corpus.backend = \"postgres\" requires a [database] section".to_string(),
            ));
        }
        Ok(())
    }

    /// Engine defaults derived from the search and embedding sections
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            top_k: self.search.top_k,
            min_score: self.search.min_score,
            embed_timeout: Duration::from_millis(self.embedding.timeout_ms),
        }
    }
}

/// Apply well-known environment variables on top of the layered config
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(key) = env::var("HF_API_KEY") {
        builder = builder.set_override("embedding.api_key", key)?;
    }

    builder.build()
}

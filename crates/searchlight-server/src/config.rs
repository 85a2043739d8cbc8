//! Configuration for the Searchlight server
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags (each with an environment variable fallback), an optional TOML
//! file given with `--config`, and built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use searchlight_logging::{FileConfig, LogConfig, RotationStrategy, SubscriberBuilder};
use searchlight_sitemap::SEARCH_PAGE_LIMIT;
use searchlight_storage::DEFAULT_CAPACITY;
use searchlight_upstream::{DEFAULT_BLOG_API_URL, DEFAULT_TIMEOUT, DEFAULT_VIDEO_API_URL};
use serde::Deserialize;
use thiserror::Error;

/// Default listen host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default public URL of the site
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A setting is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Where the logs are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Lost on restart
    #[default]
    Memory,
    /// JSON snapshots in the data directory
    File,
}

/// Console log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines
    #[default]
    Json,
    /// Human-readable
    Pretty,
}

/// CLI arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "searchlight")]
#[command(about = "Search query and blog analytics logs with sitemap generation")]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(long, env = "SEARCHLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen host
    #[arg(long, env = "SEARCHLIGHT_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, env = "SEARCHLIGHT_PORT")]
    pub port: Option<u16>,

    /// Public URL used in sitemaps and robots.txt
    #[arg(long, env = "SEARCHLIGHT_BASE_URL")]
    pub base_url: Option<String>,

    /// WordPress custom posts endpoint
    #[arg(long, env = "SEARCHLIGHT_BLOG_API_URL")]
    pub blog_api_url: Option<String>,

    /// Video index backend
    #[arg(long, env = "SEARCHLIGHT_VIDEO_API_URL")]
    pub video_api_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "SEARCHLIGHT_UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Storage backend
    #[arg(long, value_enum, env = "SEARCHLIGHT_STORAGE")]
    pub storage: Option<StorageKind>,

    /// Directory for file storage
    #[arg(long, env = "SEARCHLIGHT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Maximum entries kept per log
    #[arg(long, env = "SEARCHLIGHT_CAPACITY")]
    pub capacity: Option<usize>,

    /// Maximum search pages per sitemap
    #[arg(long, env = "SEARCHLIGHT_SEARCH_SITEMAP_LIMIT")]
    pub search_sitemap_limit: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SEARCHLIGHT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Console log format
    #[arg(long, value_enum, env = "SEARCHLIGHT_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Also write JSONL logs to this directory
    #[arg(long, env = "SEARCHLIGHT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// On-disk TOML layout
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub upstream: UpstreamSection,
    pub storage: StorageSection,
    pub sitemap: SitemapSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamSection {
    pub blog_api_url: Option<String>,
    pub video_api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub mode: Option<StorageKind>,
    pub data_dir: Option<PathBuf>,
    pub capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapSection {
    pub search_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    pub directory: Option<PathBuf>,
    pub rotation: Option<RotationStrategy>,
}

impl ConfigFile {
    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse TOML text
    pub fn parse(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }
}

/// Resolved storage choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    Memory,
    File { data_dir: PathBuf },
}

/// Resolved logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
    pub directory: Option<PathBuf>,
    pub rotation: RotationStrategy,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            directory: None,
            rotation: RotationStrategy::Daily,
        }
    }
}

impl LoggingSettings {
    /// Subscriber builder for these settings
    pub fn subscriber(&self) -> SubscriberBuilder {
        let base = match self.format {
            LogFormat::Json => SubscriberBuilder::new(),
            LogFormat::Pretty => SubscriberBuilder::new().with_config(LogConfig::development()),
        };
        let builder = base.with_level(self.level.clone());
        match &self.directory {
            Some(directory) => builder.with_file_output(FileConfig {
                directory: directory.clone(),
                rotation: self.rotation,
                ..FileConfig::default()
            }),
            None => builder,
        }
    }
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public URL of the site, without a trailing slash
    pub base_url: String,
    pub blog_api_url: String,
    pub video_api_url: String,
    pub upstream_timeout: Duration,
    pub storage: StorageMode,
    /// Maximum entries kept per log
    pub capacity: usize,
    /// Maximum search pages per sitemap
    pub search_sitemap_limit: usize,
    pub logging: LoggingSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            blog_api_url: DEFAULT_BLOG_API_URL.to_string(),
            video_api_url: DEFAULT_VIDEO_API_URL.to_string(),
            upstream_timeout: DEFAULT_TIMEOUT,
            storage: StorageMode::Memory,
            capacity: DEFAULT_CAPACITY,
            search_sitemap_limit: SEARCH_PAGE_LIMIT,
            logging: LoggingSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Resolve from CLI arguments, reading `--config` if given
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(args, file)
    }

    /// Layer CLI values over file values over defaults
    pub fn merge(args: &CliArgs, file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_kind = args.storage.or(file.storage.mode).unwrap_or_default();
        let data_dir = args
            .data_dir
            .clone()
            .or(file.storage.data_dir)
            .unwrap_or_else(|| PathBuf::from("./data"));
        let storage = match storage_kind {
            StorageKind::Memory => StorageMode::Memory,
            StorageKind::File => StorageMode::File { data_dir },
        };

        let timeout_secs = args.upstream_timeout_secs.or(file.upstream.timeout_secs);

        let config = Self {
            host: args.host.clone().or(file.server.host).unwrap_or(defaults.host),
            port: args.port.or(file.server.port).unwrap_or(defaults.port),
            base_url: args
                .base_url
                .clone()
                .or(file.server.base_url)
                .unwrap_or(defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            blog_api_url: args
                .blog_api_url
                .clone()
                .or(file.upstream.blog_api_url)
                .unwrap_or(defaults.blog_api_url),
            video_api_url: args
                .video_api_url
                .clone()
                .or(file.upstream.video_api_url)
                .unwrap_or(defaults.video_api_url),
            upstream_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.upstream_timeout),
            storage,
            capacity: args
                .capacity
                .or(file.storage.capacity)
                .unwrap_or(defaults.capacity),
            search_sitemap_limit: args
                .search_sitemap_limit
                .or(file.sitemap.search_limit)
                .unwrap_or(defaults.search_sitemap_limit),
            logging: LoggingSettings {
                level: args
                    .log_level
                    .clone()
                    .or(file.logging.level)
                    .unwrap_or(defaults.logging.level),
                format: args
                    .log_format
                    .or(file.logging.format)
                    .unwrap_or(defaults.logging.format),
                directory: args.log_dir.clone().or(file.logging.directory),
                rotation: file.logging.rotation.unwrap_or(defaults.logging.rotation),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check ranges and URL shapes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.search_sitemap_limit == 0 {
            return Err(ConfigError::Invalid(
                "search sitemap limit must be at least 1".into(),
            ));
        }
        if self.upstream_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "upstream timeout must be positive".into(),
            ));
        }
        for (name, url) in [
            ("base_url", &self.base_url),
            ("blog_api_url", &self.blog_api_url),
            ("video_api_url", &self.video_api_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

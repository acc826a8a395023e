use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Cli, Command};
use crate::fetcher::{DEFAULT_HEAD_TIMEOUT, DEFAULT_TIMEOUT};
use crate::page_report::ScoringRules;
use crate::sitemap::WalkerSettings;
use crate::taxonomy::Taxonomy;
use crate::toxicity::ToxicityRules;
use crate::velocity::VelocitySettings;

pub const DEFAULT_LINK_CHECK_LIMIT: usize = 10;

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Page fetch timeout in seconds
    pub timeout: Option<u64>,

    /// Link liveness (HEAD) timeout in seconds
    pub head_timeout: Option<u64>,

    /// Number of pages fetched concurrently during a sitemap walk
    pub concurrency: Option<usize>,

    /// Delay between page fetches in milliseconds
    pub delay_ms: Option<u64>,

    /// Maximum number of URLs gathered from a sitemap (index)
    pub max_sitemap_urls: Option<usize>,

    /// Maximum number of sitemap pages to crawl
    pub max_pages: Option<usize>,

    /// Hard ceiling for max_pages
    pub max_pages_ceiling: Option<usize>,

    /// Overall sitemap walk deadline in seconds
    pub deadline: Option<u64>,

    /// Number of links checked by --check-links
    pub link_check_limit: Option<usize>,

    /// Extra spam keywords for toxicity scoring
    pub spam_keywords: Option<Vec<String>>,

    /// Extra suspicious TLDs for toxicity scoring
    pub suspicious_tlds: Option<Vec<String>>,

    /// Extra generic anchor phrases for toxicity scoring
    pub generic_anchors: Option<Vec<String>>,

    /// Keyword list overrides per link category
    pub categories: Option<HashMap<String, Vec<String>>>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("linkscope.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|p| {
                if p.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(p))
                }
            })
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_config_dir = config_home.join("linkscope");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(app_config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Loads the file named by `--config`, or the first default path that exists
    pub fn load(cli: &Cli) -> Result<Self> {
        match &cli.config {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::from_default_paths()?.unwrap_or_default()),
        }
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        let command = match &cli.command {
            Command::Page {
                url,
                check_links,
                link_check_limit,
            } => Command::Page {
                url: url.clone(),
                check_links: *check_links,
                link_check_limit: link_check_limit.or(self.link_check_limit),
            },
            Command::Sitemap {
                url,
                max_pages,
                deadline,
            } => Command::Sitemap {
                url: url.clone(),
                max_pages: max_pages.or(self.max_pages),
                deadline: deadline.or(self.deadline),
            },
            Command::Backlinks { domain, seed } => Command::Backlinks {
                domain: domain.clone(),
                seed: *seed,
            },
            other @ (Command::Batch { .. }
            | Command::Outbound { .. }
            | Command::SitemapUrls { .. }) => other.clone(),
        };

        Cli {
            command,
            output: cli.output.clone().or_else(|| self.output.clone()),
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: cli.verbose || self.verbose.unwrap_or(false),
            timeout: cli.timeout.or(self.timeout),
            head_timeout: cli.head_timeout.or(self.head_timeout),
            concurrency: cli.concurrency.or(self.concurrency),
            delay_ms: cli.delay_ms.or(self.delay_ms),
            max_sitemap_urls: cli.max_sitemap_urls.or(self.max_sitemap_urls),
            config: cli.config.clone(),
        }
    }
}

/// Fetch timeouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub head_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            head_timeout: DEFAULT_HEAD_TIMEOUT,
        }
    }
}

/// Immutable engine configuration, built once at startup and shared by every
/// component (usually behind an `Arc`).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub taxonomy: Taxonomy,
    pub scoring: ScoringRules,
    pub toxicity: ToxicityRules,
    pub velocity: VelocitySettings,
    pub http: HttpSettings,
    pub walker: WalkerSettings,
    pub link_check_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
            scoring: ScoringRules::default(),
            toxicity: ToxicityRules::default(),
            velocity: VelocitySettings::default(),
            http: HttpSettings::default(),
            walker: WalkerSettings::default(),
            link_check_limit: DEFAULT_LINK_CHECK_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Builds the engine configuration from merged CLI arguments and the config file's
    /// tuning sections.
    pub fn build(cli: &Cli, file: &Config) -> Result<Self> {
        let mut engine = EngineConfig::default();

        if let Some(overrides) = &file.categories {
            engine.taxonomy = Taxonomy::with_overrides(overrides)?;
        }

        engine.toxicity.extend(
            file.spam_keywords.as_deref().unwrap_or_default(),
            file.suspicious_tlds.as_deref().unwrap_or_default(),
            file.generic_anchors.as_deref().unwrap_or_default(),
        );

        if let Some(secs) = cli.timeout {
            engine.http.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = cli.head_timeout {
            engine.http.head_timeout = Duration::from_secs(secs);
        }
        if engine.http.timeout.is_zero() || engine.http.head_timeout.is_zero() {
            bail!("Timeouts must be at least 1 second");
        }

        let walker = &mut engine.walker;
        if let Some(ceiling) = file.max_pages_ceiling {
            walker.max_pages_ceiling = ceiling;
        }
        if let Some(concurrency) = cli.concurrency {
            walker.concurrency = concurrency;
        }
        if walker.concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }
        if let Some(delay) = cli.delay_ms {
            walker.delay = Duration::from_millis(delay);
        }
        if let Some(max_urls) = cli.max_sitemap_urls {
            walker.max_sitemap_urls = max_urls;
        }

        match &cli.command {
            Command::Sitemap {
                max_pages,
                deadline,
                ..
            } => {
                if let Some(max_pages) = max_pages {
                    walker.max_pages = *max_pages;
                }
                walker.deadline = deadline.map(Duration::from_secs);
            }
            Command::Page {
                link_check_limit, ..
            } => {
                if let Some(limit) = link_check_limit {
                    engine.link_check_limit = *limit;
                }
            }
            Command::Backlinks { .. }
            | Command::Batch { .. }
            | Command::Outbound { .. }
            | Command::SitemapUrls { .. } => {}
        }

        Ok(engine)
    }
}

//! Configuration module for the CampusHub sync subsystem.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder for programmatic
//! use (tests, platform glue).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::Collection;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for the sync subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub sync: SyncConfig,
    pub conflicts: ConflictsConfig,
    pub paging: PagingConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Synchronization and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Minutes between periodic sync passes per collection.
    pub interval_minutes: u64,
    /// Maximum attempts per cycle for retryable failures.
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts (seconds).
    pub backoff_base_secs: u64,
    /// Collections managed by the periodic scheduler.
    pub collections: Vec<String>,
}

/// Rule mapping a collection-name pattern to a merge strategy.
///
/// Patterns are globs over collection names, evaluated first-match-wins
/// by the policy engine in the conflict crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRuleConfig {
    /// Glob pattern over collection names (e.g. `notes`, `events*`).
    pub pattern: String,
    /// Strategy to apply: `server_wins`, `client_wins`, `last_write_wins`,
    /// or `manual`.
    pub strategy: String,
}

/// Conflict resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictsConfig {
    /// Strategy used when no rule matches.
    pub default_strategy: String,
    /// Per-collection overrides, first match wins.
    pub rules: Vec<StrategyRuleConfig>,
}

/// Pagination settings for remote list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size used when a request does not specify one.
    pub default_page_size: u32,
    /// Upper bound enforced on requested page sizes.
    pub max_page_size: u32,
}

/// Local cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Emit JSON-formatted log lines instead of human-readable ones.
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/campushub/sync.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("campushub")
            .join("sync.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 15,
            max_attempts: 3,
            backoff_base_secs: 1,
            collections: vec![
                "notes".to_string(),
                "events".to_string(),
                "mentorship".to_string(),
                "placements".to_string(),
            ],
        }
    }
}

impl Default for ConflictsConfig {
    fn default() -> Self {
        Self {
            default_strategy: "last_write_wins".to_string(),
            rules: Vec::new(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("campushub")
                .join("cache.db"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.interval_minutes"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for merge strategies.
const VALID_STRATEGIES: &[&str] = &["server_wins", "client_wins", "last_write_wins", "manual"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- sync ---
        if self.sync.interval_minutes == 0 {
            errors.push(ValidationError {
                field: "sync.interval_minutes".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.max_attempts == 0 {
            errors.push(ValidationError {
                field: "sync.max_attempts".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.backoff_base_secs == 0 {
            errors.push(ValidationError {
                field: "sync.backoff_base_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.collections.is_empty() {
            errors.push(ValidationError {
                field: "sync.collections".into(),
                message: "at least one collection must be configured".into(),
            });
        }
        for name in &self.sync.collections {
            if let Err(e) = Collection::new(name.clone()) {
                errors.push(ValidationError {
                    field: "sync.collections".into(),
                    message: e.to_string(),
                });
            }
        }

        // --- conflicts ---
        if !VALID_STRATEGIES.contains(&self.conflicts.default_strategy.as_str()) {
            errors.push(ValidationError {
                field: "conflicts.default_strategy".into(),
                message: format!(
                    "invalid strategy '{}'; valid options: {}",
                    self.conflicts.default_strategy,
                    VALID_STRATEGIES.join(", ")
                ),
            });
        }
        for rule in &self.conflicts.rules {
            if !VALID_STRATEGIES.contains(&rule.strategy.as_str()) {
                errors.push(ValidationError {
                    field: "conflicts.rules".into(),
                    message: format!(
                        "invalid strategy '{}' for pattern '{}'",
                        rule.strategy, rule.pattern
                    ),
                });
            }
        }

        // --- paging ---
        if self.paging.default_page_size == 0 {
            errors.push(ValidationError {
                field: "paging.default_page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.paging.max_page_size == 0 {
            errors.push(ValidationError {
                field: "paging.max_page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.paging.default_page_size > self.paging.max_page_size {
            errors.push(ValidationError {
                field: "paging.default_page_size".into(),
                message: format!(
                    "default_page_size ({}) must not exceed max_page_size ({})",
                    self.paging.default_page_size, self.paging.max_page_size
                ),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use campushub_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .sync_interval_minutes(5)
///     .conflicts_default_strategy("server_wins")
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- sync ---

    pub fn sync_interval_minutes(mut self, minutes: u64) -> Self {
        self.config.sync.interval_minutes = minutes;
        self
    }

    pub fn sync_max_attempts(mut self, attempts: u32) -> Self {
        self.config.sync.max_attempts = attempts;
        self
    }

    pub fn sync_backoff_base_secs(mut self, seconds: u64) -> Self {
        self.config.sync.backoff_base_secs = seconds;
        self
    }

    pub fn sync_collections(mut self, collections: Vec<String>) -> Self {
        self.config.sync.collections = collections;
        self
    }

    // --- conflicts ---

    pub fn conflicts_default_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.config.conflicts.default_strategy = strategy.into();
        self
    }

    pub fn conflicts_rule(
        mut self,
        pattern: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        self.config.conflicts.rules.push(StrategyRuleConfig {
            pattern: pattern.into(),
            strategy: strategy.into(),
        });
        self
    }

    // --- paging ---

    pub fn paging_default_page_size(mut self, size: u32) -> Self {
        self.config.paging.default_page_size = size;
        self
    }

    pub fn paging_max_page_size(mut self, size: u32) -> Self {
        self.config.paging.max_page_size = size;
        self
    }

    // --- cache ---

    pub fn cache_db_path(mut self, path: PathBuf) -> Self {
        self.config.cache.db_path = path;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_json(mut self, json: bool) -> Self {
        self.config.logging.json = json;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! Layered configuration for a story run.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from storyloom.toml)
//! - User config in home directory (~/.config/storyloom/storyloom.toml)
//! - User config in current directory (./storyloom.toml)
//! - An explicit file, when one is given

use crate::RetryPolicy;
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use storyloom_error::{ConfigError, StoryloomError, StoryloomResult};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../storyloom.toml");

/// Generation service connection settings.
///
/// ```toml
/// [provider]
/// name = "openrouter"
/// base_url = "https://openrouter.ai/api/v1/chat/completions"
/// model = "meta-llama/llama-3.1-8b-instruct:free"
/// api_key_env = "OPENROUTER_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider name reported in logs
    pub name: String,
    /// Chat-completions endpoint URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens per response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    300
}

/// Request pacing for the generation service.
///
/// Absent limits are unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,
    /// Requests in flight at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Retry policies for the two kinds of service calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Creative generation calls
    #[serde(default = "RetryPolicy::none")]
    pub generation: RetryPolicy,
    /// Reformat, parse and validate attempts at the structured boundaries
    #[serde(default = "RetryPolicy::none")]
    pub extraction: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            generation: RetryPolicy::none(),
            extraction: RetryPolicy::none(),
        }
    }
}

/// Orchestration settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct PipelineConfig {
    /// Chapters generated at once; acts within a chapter are always sequential
    #[serde(default = "default_one")]
    max_concurrent_chapters: usize,
    /// Characters of act text quoted in progress events
    #[serde(default = "default_preview_chars")]
    preview_chars: usize,
    /// Characters of the finished story quoted in the final progress event
    #[serde(default = "default_story_preview_chars")]
    story_preview_chars: usize,
}

fn default_one() -> usize {
    1
}

fn default_preview_chars() -> usize {
    100
}

fn default_story_preview_chars() -> usize {
    200
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_chapters: default_one(),
            preview_chars: default_preview_chars(),
            story_preview_chars: default_story_preview_chars(),
        }
    }
}

impl PipelineConfig {
    /// Set the chapter concurrency bound, clamped to at least one.
    pub fn with_max_concurrent_chapters(mut self, n: usize) -> Self {
        self.max_concurrent_chapters = n.max(1);
        self
    }

    /// Set the act preview length.
    pub fn with_preview_chars(mut self, n: usize) -> Self {
        self.preview_chars = n;
        self
    }
}

/// Top-level Storyloom configuration.
///
/// # Example
///
/// ```no_run
/// use storyloom_rate_limit::StoryloomConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryloomConfig::load()?;
/// println!("Model: {}", config.provider.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoryloomConfig {
    /// Generation service settings
    pub provider: ProviderConfig,
    /// Request pacing
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Retry policies
    #[serde(default)]
    pub retry: RetryConfig,
    /// Orchestration settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl StoryloomConfig {
    /// Bundled defaults only.
    #[instrument]
    pub fn bundled() -> StoryloomResult<Self> {
        Self::finish(Self::defaults_builder())
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped when absent.
    #[instrument]
    pub fn load() -> StoryloomResult<Self> {
        Self::load_with(None)
    }

    /// Load the layered configuration, then apply an explicit file on top.
    ///
    /// The explicit file must exist.
    #[instrument]
    pub fn load_with(explicit: Option<&Path>) -> StoryloomResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults_builder();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyloom/storyloom.toml");
            builder = builder.add_source(
                File::from(home_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(File::with_name("storyloom").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        Self::finish(builder)
    }

    /// Load bundled defaults overridden by a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StoryloomResult<Self> {
        debug!("Loading configuration from file");
        let builder = Self::defaults_builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml).required(true));
        Self::finish(builder)
    }

    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> StoryloomResult<()> {
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::new("provider.model must not be empty").into());
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::new("provider.base_url must not be empty").into());
        }
        if self.retry.generation.max_attempts == 0 || self.retry.extraction.max_attempts == 0 {
            return Err(ConfigError::new("retry max_attempts must be at least 1").into());
        }
        if self.pipeline.max_concurrent_chapters == 0 {
            return Err(
                ConfigError::new("pipeline.max_concurrent_chapters must be at least 1").into(),
            );
        }
        if let Some(0) = self.rate_limit.rpm {
            return Err(ConfigError::new("rate_limit.rpm must be at least 1 when set").into());
        }
        if let Some(0) = self.rate_limit.max_concurrent {
            return Err(
                ConfigError::new("rate_limit.max_concurrent must be at least 1 when set").into(),
            );
        }
        Ok(())
    }

    fn defaults_builder() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> StoryloomResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        debug!(
            provider = %config.provider.name,
            model = %config.provider.model,
            "Configuration loaded"
        );
        Ok(config)
    }
}

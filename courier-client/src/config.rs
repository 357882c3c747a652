//! Bot configuration.

use std::fmt;
use std::sync::Arc;

use courier_codec::{DEFAULT_CHUNK_SIZE, EncoderConfig, MIN_CHUNK_SIZE};

use crate::retry::{NoRetries, RetryPolicy};

/// Public Bot API server.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Failures while building a [`Config`] or a [`Bot`](crate::Bot).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("bot token is missing (set BOT_TOKEN)")]
    MissingToken,
    #[error("invalid upload chunk size {0:?}")]
    InvalidChunkSize(String),
}

/// Configuration for [`Bot::new`](crate::Bot::new).
#[derive(Clone)]
pub struct Config {
    /// Token issued by @BotFather.
    pub token:        String,
    /// Base URL of the Bot API server, without a trailing `/bot…`.
    pub api_url:      String,
    /// Bytes read per chunk when streaming uploads. Clamped to at least 1 KiB.
    pub chunk_size:   usize,
    /// Consulted by [`Bot::call_with_retry`](crate::Bot::call_with_retry); [`NoRetries`] by default.
    pub retry_policy: Arc<dyn RetryPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token:        String::new(),
            api_url:      DEFAULT_API_URL.to_owned(),
            chunk_size:   DEFAULT_CHUNK_SIZE,
            retry_policy: Arc::new(NoRetries),
        }
    }
}

impl Config {
    /// A default configuration for `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), ..Self::default() }
    }

    /// Read `BOT_TOKEN`, `BOT_API_URL` and `BOT_UPLOAD_CHUNK_SIZE`.
    ///
    /// Only the token is mandatory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("BOT_TOKEN").filter(|t| !t.is_empty()).ok_or(ConfigError::MissingToken)?;
        let mut config = Self::new(token);
        if let Some(url) = lookup("BOT_API_URL").filter(|u| !u.is_empty()) {
            config.api_url = url;
        }
        if let Some(raw) = lookup("BOT_UPLOAD_CHUNK_SIZE") {
            config.chunk_size = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidChunkSize(raw.clone()))?;
        }
        Ok(config)
    }

    /// The encoder settings derived from this configuration.
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig { chunk_size: self.chunk_size.max(MIN_CHUNK_SIZE) }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

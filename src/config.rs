use std::env;
use std::fmt;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const CHANNEL_ID_VAR: &str = "CHANNEL_ID";
const BOT_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
const API_BASE_VAR: &str = "DISCORD_API_BASE";

/// Credentials and API origin for one uploader. Read-only after construction.
#[derive(Clone)]
pub struct UploaderConfig {
    channel_id: String,
    bot_token: String,
    api_base: String,
}

impl UploaderConfig {
    pub fn new(channel_id: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Load from the process environment, honouring a `.env` file if present.
    pub fn from_env() -> AppResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Failed to read .env file: {}", e),
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; `lookup` returns `None` for unset names.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| AppError::Config(format!("{} is not set", name)))
        };

        let channel_id = required(CHANNEL_ID_VAR)?;
        let bot_token = required(BOT_TOKEN_VAR)?;

        let mut config = Self::new(channel_id, bot_token);
        if let Some(api_base) = lookup(API_BASE_VAR) {
            log::info!("Using API base override {}", api_base);
            config = config.with_api_base(api_base);
        }

        validate_config(&config)?;
        Ok(config)
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn messages_url(&self) -> String {
        format!("{}/channels/{}/messages", self.api_base, self.channel_id)
    }

    pub fn authorization_header(&self) -> String {
        format!("Bot {}", self.bot_token)
    }
}

impl fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("channel_id", &self.channel_id)
            .field("bot_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

pub fn validate_config(config: &UploaderConfig) -> AppResult<()> {
    if config.channel_id.trim().is_empty() {
        return Err(AppError::validation("channel_id", "Channel ID cannot be empty"));
    }

    if config.bot_token.trim().is_empty() {
        return Err(AppError::validation("bot_token", "Bot token cannot be empty"));
    }

    if !(config.api_base.starts_with("https://") || config.api_base.starts_with("http://")) {
        return Err(AppError::validation("api_base", "Must be an http(s) URL"));
    }

    Ok(())
}

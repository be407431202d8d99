//! Application configuration structures.
//!
//! Settings live in the `[Tracker]` section of an INI-style file:
//!
//! ```ini
//! [Tracker]
//! consumer_key = ...
//! consumer_secret = ...
//! access_key = ...
//! access_secret = ...
//! ; optional
//! baseurl = https://www.lotro.com/en/forums/
//! maxlen = 280
//! ```
//!
//! Option names are case-insensitive. Values may be wrapped in quotes.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use ini::{Ini, ParseOption};

use crate::error::{AppError, Result};

/// Name of the settings section.
pub const SECTION: &str = "Tracker";

/// Path of the tracker listing, relative to the forum root.
pub const TRACKER_PATH: &str = "post_tracker.php?tracker=devtracker";

/// Root application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Forum root, with trailing slash
    pub base_url: String,

    /// Status messages must be strictly shorter than this
    pub max_len: usize,

    /// Tag placed after `#` at the start of every message
    pub hashtag: String,

    /// Status update endpoint
    pub api_url: String,

    /// User-Agent header for outgoing requests
    pub user_agent: String,

    /// Tracker fetch timeout in seconds
    pub timeout_secs: u64,

    /// Pause after each publish in milliseconds
    pub publish_delay_ms: u64,

    /// Posting API credentials
    pub credentials: Credentials,
}

/// OAuth 1.0a credentials for the posting API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_key: String,
    pub access_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_key", &self.access_key)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

/// Options of the settings section, keyed by lowercased name.
struct RawSettings(HashMap<String, String>);

impl RawSettings {
    fn parse(content: &str) -> Result<Self> {
        // Backslashes are literal, as in secrets copied from a developer portal.
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options)?;
        let section = ini
            .section(Some(SECTION))
            .ok_or_else(|| AppError::config(format!("No section: '{SECTION}'")))?;

        Ok(Self(
            section
                .iter()
                .map(|(key, value)| (key.to_ascii_lowercase(), value.to_string()))
                .collect(),
        ))
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }
}

impl Config {
    /// Load configuration from a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!(
                "cannot read {}: {e}. Does it exist, is it readable, and is there a [{SECTION}] section?",
                path.display()
            ))
        })?;
        Self::parse(&content)
    }

    /// Build configuration from settings file content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut raw = RawSettings::parse(content)?;

        let config = Self {
            base_url: optional(raw.take("baseurl"), "baseurl", defaults::base_url)?,
            max_len: number(raw.take("maxlen"), "maxlen", defaults::max_len)? as usize,
            hashtag: optional(raw.take("hashtag"), "hashtag", defaults::hashtag)?,
            api_url: optional(raw.take("api_url"), "api_url", defaults::api_url)?,
            user_agent: optional(raw.take("user_agent"), "user_agent", defaults::user_agent)?,
            timeout_secs: number(raw.take("timeout_secs"), "timeout_secs", defaults::timeout)?,
            publish_delay_ms: number(
                raw.take("publish_delay_ms"),
                "publish_delay_ms",
                defaults::publish_delay,
            )?,
            credentials: Credentials {
                consumer_key: required(raw.take("consumer_key"), "consumer_key")?,
                consumer_secret: required(raw.take("consumer_secret"), "consumer_secret")?,
                access_key: required(raw.take("access_key"), "access_key")?,
                access_secret: required(raw.take("access_secret"), "access_secret")?,
            },
        };
        for unknown in raw.0.keys() {
            log::warn!("Ignoring unknown option '{unknown}' in [{SECTION}]");
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| AppError::config(format!("baseurl '{}' is invalid: {e}", self.base_url)))?;
        url::Url::parse(&self.api_url)
            .map_err(|e| AppError::config(format!("api_url '{}' is invalid: {e}", self.api_url)))?;
        if self.max_len == 0 {
            return Err(AppError::config("maxlen must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config("timeout_secs must be > 0"));
        }
        let creds = &self.credentials;
        for (name, value) in [
            ("consumer_key", &creds.consumer_key),
            ("consumer_secret", &creds.consumer_secret),
            ("access_key", &creds.access_key),
            ("access_secret", &creds.access_secret),
        ] {
            if value.is_empty() {
                return Err(AppError::config(format!("{name} is not set")));
            }
        }
        Ok(())
    }

    /// URL of the developer tracker listing.
    pub fn tracker_url(&self) -> String {
        format!("{}{}", self.base_url, TRACKER_PATH)
    }

    /// Absolute URL of a post, from its relative tracker link.
    pub fn post_url(&self, relative: &str) -> String {
        format!("{}{}", self.base_url, relative)
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    let value = value
        .ok_or_else(|| AppError::config(format!("No option '{name}' in section: '{SECTION}'")))?;
    if value.is_empty() {
        return Err(AppError::config(format!("{name} is not set")));
    }
    Ok(value)
}

fn optional(value: Option<String>, name: &str, default: fn() -> String) -> Result<String> {
    match value {
        None => Ok(default()),
        Some(v) => required(Some(v), name),
    }
}

fn number(value: Option<String>, name: &str, default: fn() -> u64) -> Result<u64> {
    let Some(value) = value else {
        return Ok(default());
    };
    let text = required(Some(value), name)?;
    text.trim()
        .parse::<u64>()
        .map_err(|_| AppError::config(format!("{name} must be an integer, got '{text}'")))
}

mod defaults {
    pub fn base_url() -> String {
        "https://www.lotro.com/en/forums/".into()
    }
    pub fn max_len() -> u64 {
        280
    }
    pub fn hashtag() -> String {
        "LOTRO".into()
    }
    pub fn api_url() -> String {
        "https://api.twitter.com/1.1/statuses/update.json".into()
    }
    pub fn user_agent() -> String {
        concat!("devtracker/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        45
    }
    pub fn publish_delay() -> u64 {
        250
    }
}

// ============================
// crates/backend-lib/src/config/mod.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `HOSPITAL_`-prefixed environment variables (nested keys split on `__`,
//! e.g. `HOSPITAL_AUTH__SECRET_KEY`).
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;


/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "HOSPITAL_";

/// Smallest accepted signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime: one year
pub const MAX_TOKEN_TTL_MINUTES: u64 = 365 * 24 * 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub model: ModelSettings,
    /// Default tracing level, overridden by `RUST_LOG`
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the flat-file tables
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing secret. Rotating it invalidates every issued token.
    pub secret_key: String,
    pub token_ttl_minutes: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// JSON artifact of the premium classifier
    pub artifact_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            model: ModelSettings::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            // no usable default; must come from the config file or environment
            secret_key: String::new(),
            token_ttl_minutes: 20,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("model/insurance_premium.json"),
        }
    }
}

impl Settings {
    /// Load settings from the default config file and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load settings from `path` (missing file is fine) and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings: Settings = Self::figment(path)
            .extract()
            .with_context(|| format!("failed to load settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Provider chain used by [`Settings::load_from`]
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!(
                "invalid log_level '{}', expected one of {:?}",
                self.log_level,
                LOG_LEVELS
            );
        }
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.auth.secret_key.len() < MIN_SECRET_LEN {
            bail!("auth.secret_key must be at least {MIN_SECRET_LEN} bytes");
        }
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.auth.token_ttl_minutes) {
            bail!(
                "auth.token_ttl_minutes must be between 1 and {MAX_TOKEN_TTL_MINUTES}, got {}",
                self.auth.token_ttl_minutes
            );
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            bail!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            );
        }
        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid bind address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }

    /// Lifetime of issued access tokens. Saturates for values `validate`
    /// would reject; token issuing then fails instead of overflowing.
    pub fn token_ttl(&self) -> Duration {
        self.auth
            .token_ttl_minutes
            .checked_mul(60)
            .map_or(Duration::MAX, Duration::from_secs)
    }
}

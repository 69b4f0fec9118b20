//! Process configuration.
//!
//! `PrivatesConfig` controls where zones are stored, where the ownership webhook
//! listens, and how the approval service is reached. It provides defaults via
//! [`Default`] and a fluent [`PrivatesConfig::builder()`] with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use privates::config::PrivatesConfig;
//! let cfg = PrivatesConfig::default();
//! assert_eq!(cfg.webhook_addr.port(), 8081);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::time::Duration;
//! use privates::config::PrivatesConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = PrivatesConfig::builder()
//!     .data_dir("/srv/world/config/privates")
//!     .webhook_addr("127.0.0.1:9000".parse()?)
//!     .webhook_wait(Duration::from_secs(5))
//!     .build()?; // returns Result<PrivatesConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Environment
//!
//! [`PrivatesConfig::from_env`] starts from the defaults and overlays
//! `PRIVATES_DATA_DIR`, `PRIVATES_WEBHOOK_ADDR`, `PRIVATES_APPROVAL_URL` and
//! `PRIVATES_WEBHOOK_WORKERS` when they are set.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_APPROVAL_URL: &str = "http://localhost:3000/items";

#[derive(Debug, Clone)]
pub struct PrivatesConfig {
    /// Directory holding `zones.json` and its backups
    pub data_dir: PathBuf,
    /// Address the ownership webhook binds to
    pub webhook_addr: SocketAddr,
    /// Number of runtime worker threads serving webhook requests
    pub webhook_workers: usize,
    /// How long a webhook request waits for its ownership change
    pub webhook_wait: Duration,
    /// Endpoint receiving zone approval requests
    pub approval_url: url::Url,
    pub approval_connect_timeout: Duration,
    pub approval_timeout: Duration,
    pub game_id: u32,
    pub collection_id: u32,
    /// Copy the snapshot aside once at start-up
    pub backup_on_start: bool,
}

impl Default for PrivatesConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("config").join("privates"),
            webhook_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            webhook_workers: 4,
            webhook_wait: Duration::from_secs(10),
            approval_url: default_approval_url(),
            approval_connect_timeout: Duration::from_secs(10),
            approval_timeout: Duration::from_secs(15),
            game_id: 1,
            collection_id: 1,
            backup_on_start: true,
        }
    }
}

fn default_approval_url() -> url::Url {
    url::Url::parse(DEFAULT_APPROVAL_URL).expect("default approval url is valid")
}

impl PrivatesConfig {
    pub fn builder() -> PrivatesConfigBuilder {
        PrivatesConfigBuilder::default()
    }

    /// Defaults overlaid with the `PRIVATES_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(dir) = lookup("PRIVATES_DATA_DIR") {
            builder = builder.data_dir(dir);
        }
        if let Some(addr) = lookup("PRIVATES_WEBHOOK_ADDR") {
            let addr = addr.parse().map_err(|_| ConfigError::InvalidValue { key: "PRIVATES_WEBHOOK_ADDR", value: addr })?;
            builder = builder.webhook_addr(addr);
        }
        if let Some(url) = lookup("PRIVATES_APPROVAL_URL") {
            let parsed = url::Url::parse(&url).map_err(|_| ConfigError::InvalidValue { key: "PRIVATES_APPROVAL_URL", value: url })?;
            builder = builder.approval_url(parsed);
        }
        if let Some(workers) = lookup("PRIVATES_WEBHOOK_WORKERS") {
            let n = workers.parse().map_err(|_| ConfigError::InvalidValue { key: "PRIVATES_WEBHOOK_WORKERS", value: workers })?;
            builder = builder.webhook_workers(n);
        }

        builder.build()
    }
}

/// Builder for [`PrivatesConfig`].
#[derive(Debug, Clone, Default)]
pub struct PrivatesConfigBuilder {
    inner: PrivatesConfig,
}

impl PrivatesConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut PrivatesConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn data_dir<P: Into<PathBuf>>(self, dir: P) -> Self { self.map(|c| c.data_dir = dir.into()) }
    pub fn webhook_addr(self, addr: SocketAddr) -> Self { self.map(|c| c.webhook_addr = addr) }
    pub fn webhook_workers(self, n: usize) -> Self { self.map(|c| c.webhook_workers = n) }
    pub fn webhook_wait(self, wait: Duration) -> Self { self.map(|c| c.webhook_wait = wait) }
    pub fn approval_url(self, url: url::Url) -> Self { self.map(|c| c.approval_url = url) }
    pub fn approval_connect_timeout(self, t: Duration) -> Self { self.map(|c| c.approval_connect_timeout = t) }
    pub fn approval_timeout(self, t: Duration) -> Self { self.map(|c| c.approval_timeout = t) }
    pub fn game_id(self, id: u32) -> Self { self.map(|c| c.game_id = id) }
    pub fn collection_id(self, id: u32) -> Self { self.map(|c| c.collection_id = id) }
    pub fn backup_on_start(self, on: bool) -> Self { self.map(|c| c.backup_on_start = on) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<PrivatesConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroWorkers,
    ZeroWait,
    UnsupportedScheme(String),
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWorkers =>
                write!(f, "webhook_workers must be at least 1"),
            ConfigError::ZeroWait =>
                write!(f, "webhook_wait must be longer than zero"),
            ConfigError::UnsupportedScheme(s) =>
                write!(f, "approval_url scheme '{s}' is not supported (expected http or https)"),
            ConfigError::InvalidValue { key, value } =>
                write!(f, "{key} has an invalid value '{value}'"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn validate(c: &PrivatesConfig) -> Result<(), ConfigError> {
    if c.webhook_workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    if c.webhook_wait.is_zero() {
        return Err(ConfigError::ZeroWait);
    }
    if !matches!(c.approval_url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(c.approval_url.scheme().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let cfg = PrivatesConfig::builder().build().unwrap();
        assert_eq!(cfg.webhook_addr.port(), 8081);
        assert_eq!(cfg.webhook_wait, Duration::from_secs(10));
        assert_eq!(cfg.webhook_workers, 4);
        assert_eq!(cfg.approval_timeout, Duration::from_secs(15));
        assert!(cfg.data_dir.ends_with("privates"));
    }

    #[test]
    fn builder_rejects_invalid_values() {
        assert_eq!(PrivatesConfig::builder().webhook_workers(0).build().unwrap_err(), ConfigError::ZeroWorkers);
        assert_eq!(PrivatesConfig::builder().webhook_wait(Duration::ZERO).build().unwrap_err(), ConfigError::ZeroWait);

        let ftp = url::Url::parse("ftp://example.com/items").unwrap();
        assert_eq!(
            PrivatesConfig::builder().approval_url(ftp).build().unwrap_err(),
            ConfigError::UnsupportedScheme("ftp".into())
        );
    }

    #[test]
    fn environment_overlays_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PRIVATES_DATA_DIR", "/tmp/zones"),
            ("PRIVATES_WEBHOOK_ADDR", "127.0.0.1:9999"),
            ("PRIVATES_WEBHOOK_WORKERS", "2"),
        ]);
        let cfg = PrivatesConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/zones"));
        assert_eq!(cfg.webhook_addr, "127.0.0.1:9999".parse().unwrap());
        assert_eq!(cfg.webhook_workers, 2);
        assert_eq!(cfg.approval_url.as_str(), DEFAULT_APPROVAL_URL);
    }

    #[test]
    fn environment_with_garbage_is_reported() {
        let err = PrivatesConfig::from_lookup(|k| (k == "PRIVATES_WEBHOOK_ADDR").then(|| "not-an-addr".to_string()))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue { key: "PRIVATES_WEBHOOK_ADDR", value: "not-an-addr".into() });
        assert!(err.to_string().contains("PRIVATES_WEBHOOK_ADDR"));
    }
}

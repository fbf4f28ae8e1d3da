//! Relay configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). The binary lets `--host` / `--port` override the listen
//! address on top of this.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::domain::history_cache::MAX_TTL;
use crate::error::ConfigError;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// How long a room's history survives after its last message.
    pub history_ttl: Duration,

    /// Interval between background expiry sweeps.
    pub history_sweep_interval: Duration,

    /// Per-room history cap (0 = unbounded).
    pub history_max_messages: usize,

    /// Write deadline for a single delivery before the peer is dropped.
    pub write_timeout: Duration,

    /// Extra terms for the censor on top of the built-in list.
    pub censor_extra_words: Vec<String>,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            history_ttl: Duration::from_secs(24 * 60 * 60),
            history_sweep_interval: Duration::from_secs(5),
            history_max_messages: 1000,
            write_timeout: Duration::from_secs(10),
            censor_extra_words: Vec::new(),
            log_json: false,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `PORT` or `BIND_HOST` is set
    /// but cannot be parsed, or if a duration setting is zero or longer
    /// than one year.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Numeric tuning knobs fall back to their defaults when missing or
    /// unparseable; the listen address does not. Durations that parse but
    /// fall outside one second to one year are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `PORT` or `BIND_HOST` is set
    /// but cannot be parsed, or if a duration setting is zero or longer
    /// than one year.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host: IpAddr = match lookup("BIND_HOST") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BIND_HOST",
                value: raw,
            })?,
            None => defaults.listen_addr.ip(),
        };
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let censor_extra_words = lookup("CENSOR_EXTRA_WORDS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let log_json = lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            history_ttl: secs_or(&lookup, "HISTORY_TTL_SECS", defaults.history_ttl)?,
            history_sweep_interval: secs_or(
                &lookup,
                "HISTORY_SWEEP_INTERVAL_SECS",
                defaults.history_sweep_interval,
            )?,
            history_max_messages: parse_or(
                &lookup,
                "HISTORY_MAX_MESSAGES",
                defaults.history_max_messages,
            ),
            write_timeout: secs_or(&lookup, "WRITE_TIMEOUT_SECS", defaults.write_timeout)?,
            censor_extra_words,
            log_json,
        })
    }

    /// Applies command-line overrides for the listen address.
    #[must_use]
    pub fn with_listen_overrides(mut self, host: Option<IpAddr>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.listen_addr.set_ip(host);
        }
        if let Some(port) = port {
            self.listen_addr.set_port(port);
        }
        self
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Reads `key` as whole seconds in `1..=MAX_TTL`, returning `default` when
/// missing or unparseable.
fn secs_or<F>(lookup: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let Ok(secs) = raw.trim().parse::<u64>() else {
        return Ok(default);
    };
    let value = Duration::from_secs(secs);
    if value.is_zero() || value > MAX_TTL {
        return Err(ConfigError::InvalidValue { key, value: raw });
    }
    Ok(value)
}

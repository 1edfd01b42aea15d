//! Configuration for the dyndns daemon
//!
//! Configuration is read once at startup from a line-oriented `key=value`
//! file and is immutable for the process lifetime.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Minimum permitted poll interval, in seconds.
///
/// Lower configured values are clamped upward rather than rejected, so an
/// overly aggressive config cannot hammer the echo endpoints or the
/// provider API.
pub const MIN_INTERVAL_SECS: u64 = 60;

fn default_interval_secs() -> u64 {
    600
}

fn default_event_channel_capacity() -> usize {
    64
}

/// Daemon configuration
///
/// `ipv4_endpoint = None` means IPv4 tracking is disabled entirely, not
/// merely unconfigured: no IPv4 probe or resolution happens at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hostname label registered with the provider (e.g. "myhost")
    pub domain: String,

    /// Provider auth token
    pub token: String,

    /// Seconds between reconciliation cycles (>= 60)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// URL of the IPv6 "what is my IP" endpoint (required)
    pub ipv6_endpoint: String,

    /// URL of the IPv4 "what is my IP" endpoint (optional)
    #[serde(default)]
    pub ipv4_endpoint: Option<String>,

    /// Capacity of the cycle-event channel for external monitoring
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Config {
    /// Parse configuration from line-oriented `key=value` text.
    ///
    /// Blank lines, `#` comments, and unrecognized keys are ignored.
    /// Recognized keys: `domain`, `token`, `interval`, `ipv6_endpoint`,
    /// `ipv4_endpoint`.
    pub fn parse(text: &str) -> crate::Result<Self> {
        let mut domain = String::new();
        let mut token = String::new();
        let mut interval_secs = default_interval_secs();
        let mut ipv6_endpoint = String::new();
        let mut ipv4_endpoint: Option<String> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "domain" => domain = value.to_string(),
                "token" => token = value.to_string(),
                "interval" => {
                    interval_secs = value.parse().map_err(|_| {
                        crate::Error::config(format!("interval is not an integer: '{value}'"))
                    })?;
                }
                "ipv6_endpoint" => ipv6_endpoint = value.to_string(),
                "ipv4_endpoint" => {
                    if !value.is_empty() {
                        ipv4_endpoint = Some(value.to_string());
                    }
                }
                _ => {}
            }
        }

        if interval_secs < MIN_INTERVAL_SECS {
            warn!(
                configured = interval_secs,
                minimum = MIN_INTERVAL_SECS,
                "interval below minimum, clamping"
            );
            interval_secs = MIN_INTERVAL_SECS;
        }

        let config = Self {
            domain,
            token,
            interval_secs,
            ipv6_endpoint,
            ipv4_endpoint,
            event_channel_capacity: default_event_channel_capacity(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!("could not read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    /// Validate the configuration.
    ///
    /// Missing `domain`, `token`, or `ipv6_endpoint` is a fatal startup
    /// error; everything else has a usable default.
    pub fn validate(&self) -> crate::Result<()> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("domain is required"));
        }
        if self.token.is_empty() {
            return Err(crate::Error::config("token is required"));
        }
        if self.ipv6_endpoint.is_empty() {
            return Err(crate::Error::config("ipv6_endpoint is required"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event_channel_capacity must be > 0"));
        }
        Ok(())
    }

    /// Whether IPv4 tracking is enabled at all.
    pub fn ipv4_enabled(&self) -> bool {
        self.ipv4_endpoint.is_some()
    }
}

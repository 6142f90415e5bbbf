//! Node configuration with TOML file support.

use quadfund_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::NodeError;

/// Configuration for a quadfund node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Interface the HTTP API binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Credits given to voters registered without an explicit budget.
    #[serde(default = "default_credits")]
    pub default_credits: u64,

    /// Treasury fee on distribution, in basis points (500 = 5%).
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,

    /// Address receiving the distribution fee.
    #[serde(default)]
    pub treasury_address: String,

    /// Whether `/metrics` is served.
    #[serde(default = "default_true")]
    pub enable_metrics: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub whitelist: WhitelistConfig,

    #[serde(default)]
    pub payments: PaymentsConfig,
}

/// Remote allow-list settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WhitelistConfig {
    /// When false every address is admitted and `url` is ignored.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Endpoint returning the allow-list as JSON.
    #[serde(default)]
    pub url: String,

    /// How long a fetched list is trusted.
    #[serde(default = "default_whitelist_ttl")]
    pub ttl_secs: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_whitelist_timeout")]
    pub timeout_secs: u64,
}

/// Payment relayer settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Base URL of the transfer relayer.
    #[serde(default)]
    pub url: String,

    /// Delay between confirmation polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_payments_timeout")]
    pub timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_port() -> u16 {
    7077
}

fn default_credits() -> u64 {
    100
}

fn default_fee_bps() -> u32 {
    500
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_whitelist_ttl() -> u64 {
    300
}

fn default_whitelist_timeout() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_payments_timeout() -> u64 {
    30
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Check the settings a running node cannot do without.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.fee_bps >= 10_000 {
            return Err(NodeError::Config(format!(
                "fee_bps must be below 10000, got {}",
                self.fee_bps
            )));
        }
        if self.treasury_address.trim().is_empty() {
            return Err(NodeError::Config("treasury_address is required".into()));
        }
        if self.whitelist.enabled && self.whitelist.url.trim().is_empty() {
            return Err(NodeError::Config(
                "whitelist.url is required when the whitelist is enabled".into(),
            ));
        }
        if self.payments.url.trim().is_empty() {
            return Err(NodeError::Config("payments.url is required".into()));
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            rpc_port: default_rpc_port(),
            default_credits: default_credits(),
            fee_bps: default_fee_bps(),
            treasury_address: String::new(),
            whitelist: WhitelistConfig::default(),
            payments: PaymentsConfig::default(),
            enable_metrics: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            url: String::new(),
            ttl_secs: default_whitelist_ttl(),
            timeout_secs: default_whitelist_timeout(),
        }
    }
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_payments_timeout(),
        }
    }
}

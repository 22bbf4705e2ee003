use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::domain::anomaly::{ScanPolicy, DEFAULT_DEVIATION_THRESHOLD, DEFAULT_RECENCY_THRESHOLD};
use crate::domain::scan::DEFAULT_MAX_HISTORY;
use crate::infrastructure::chart::DEFAULT_CHART_DIR;
use crate::infrastructure::notify::DISCORD_MESSAGE_LIMIT;
use crate::infrastructure::storage::DEFAULT_HISTORY_PATH;
use crate::infrastructure::subgraph::{DEFAULT_BLOCKS_URL, DEFAULT_EXCHANGE_URL};

/// Which classifier a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Today is the period maximum without an outsized jump
    #[value(alias = "1")]
    NewMaximum,
    /// Today is a Chebyshev outlier
    #[value(alias = "2")]
    Deviation,
    /// Chebyshev outlier that is still accelerating
    #[value(alias = "3")]
    DeviationRecency,
}

impl PolicyKind {
    /// Build the policy, falling back to the mode's reference threshold
    pub fn into_policy(self, threshold: Option<f64>) -> ScanPolicy {
        match self {
            PolicyKind::NewMaximum => ScanPolicy::NewMaximum,
            PolicyKind::Deviation => ScanPolicy::Deviation {
                threshold: threshold.unwrap_or(DEFAULT_DEVIATION_THRESHOLD),
            },
            PolicyKind::DeviationRecency => ScanPolicy::DeviationRecency {
                threshold: threshold.unwrap_or(DEFAULT_RECENCY_THRESHOLD),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubgraphCfg {
    pub exchange_url: String,
    pub blocks_url: String,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for SubgraphCfg {
    fn default() -> Self {
        Self {
            exchange_url: DEFAULT_EXCHANGE_URL.to_string(),
            blocks_url: DEFAULT_BLOCKS_URL.to_string(),
            max_retries: 5,
            retry_backoff_ms: 500,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanCfg {
    pub lookback_days: u32,
    pub pair_count: usize,
    pub pair_offset: usize,
    pub request_delay_ms: u64,
    pub head_lag_secs: i64,
    pub interval_secs: u64,
    pub policy: PolicyKind,
    /// Chebyshev probability threshold, per-mode reference value when unset
    pub threshold: Option<f64>,
}

impl Default for ScanCfg {
    fn default() -> Self {
        Self {
            lookback_days: 10,
            pair_count: 1000,
            pair_offset: 0,
            request_delay_ms: 100,
            head_lag_secs: 300,
            interval_secs: 600,
            policy: PolicyKind::NewMaximum,
            threshold: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsCfg {
    /// Discord webhook; alerts are only logged when unset
    pub webhook_url: Option<String>,
    pub max_message_len: usize,
}

impl Default for AlertsCfg {
    fn default() -> Self {
        Self {
            webhook_url: None,
            max_message_len: DISCORD_MESSAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    pub history_path: String,
    pub max_history: usize,
    /// Directory for flagged-pair charts; charts are skipped when unset
    pub chart_dir: Option<String>,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            history_path: DEFAULT_HISTORY_PATH.to_string(),
            max_history: DEFAULT_MAX_HISTORY,
            chart_dir: Some(DEFAULT_CHART_DIR.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub subgraph: SubgraphCfg,
    pub scan: ScanCfg,
    pub alerts: AlertsCfg,
    pub storage: StorageCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.scan.lookback_days, 10);
        assert_eq!(cfg.scan.pair_count, 1000);
        assert_eq!(cfg.scan.head_lag_secs, 300);
        assert_eq!(cfg.storage.max_history, 5);
        assert_eq!(cfg.storage.history_path, "data.json");
        assert_eq!(cfg.alerts.max_message_len, 2000);
        assert!(cfg.alerts.webhook_url.is_none());
        assert_eq!(cfg.scan.policy, PolicyKind::NewMaximum);
    }

    #[test]
    fn test_partial_sections() {
        let cfg = Config::from_toml(
            r#"
            [scan]
            policy = "deviation-recency"
            pair_offset = 650
            pair_count = 350

            [alerts]
            webhook_url = "https://discord.com/api/webhooks/1/abc"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.scan.pair_offset, 650);
        assert_eq!(cfg.scan.pair_count, 350);
        assert_eq!(cfg.scan.lookback_days, 10);
        assert_eq!(
            cfg.scan.policy.into_policy(cfg.scan.threshold),
            ScanPolicy::DeviationRecency { threshold: 0.5 }
        );
        assert!(cfg.alerts.webhook_url.is_some());
        assert_eq!(cfg.subgraph.max_retries, 5);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = Config::from_toml("[scan]\npolicy = \"moon\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("parse Config.toml"));
    }

    #[test]
    fn test_numeric_policy_aliases() {
        assert_eq!(PolicyKind::from_str("1", true).unwrap(), PolicyKind::NewMaximum);
        assert_eq!(PolicyKind::from_str("2", true).unwrap(), PolicyKind::Deviation);
        assert_eq!(PolicyKind::from_str("3", true).unwrap(), PolicyKind::DeviationRecency);
        assert_eq!(
            PolicyKind::Deviation.into_policy(Some(0.25)),
            ScanPolicy::Deviation { threshold: 0.25 }
        );
    }
}

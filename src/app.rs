// src/app.rs
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::{ScanService, ScanSettings, Scheduler, VolumeScanner};
use crate::config::{Config, PolicyKind};
use crate::domain::anomaly::ScanPolicy;
use crate::infrastructure::chart::SvgChartRenderer;
use crate::infrastructure::notify::{AlertSink, DiscordWebhook, LogSink};
use crate::infrastructure::storage::JsonHistoryStore;
use crate::infrastructure::subgraph::{BlockSubgraph, RetryPolicy, SubgraphClient, UniswapSubgraph};
use crate::shared::clock::SystemClock;
use crate::shared::utils::Throttle;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub exchange_url: String,
    pub blocks_url: String,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,

    pub lookback_days: u32,
    pub pair_count: usize,
    pub pair_offset: usize,
    pub request_delay_ms: u64,
    pub head_lag_secs: i64,
    pub interval_secs: u64,
    pub policy: PolicyKind,
    pub threshold: Option<f64>,

    pub webhook_url: Option<String>,
    pub max_message_len: usize,

    pub history_path: String,
    pub max_history: usize,
    pub chart_dir: Option<String>,

    /// Run a single pass and exit
    pub once: bool,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Self {
        Self {
            exchange_url: cfg.subgraph.exchange_url,
            blocks_url: cfg.subgraph.blocks_url,
            max_retries: cfg.subgraph.max_retries,
            retry_backoff_ms: cfg.subgraph.retry_backoff_ms,
            timeout_secs: cfg.subgraph.timeout_secs,
            lookback_days: cfg.scan.lookback_days,
            pair_count: cfg.scan.pair_count,
            pair_offset: cfg.scan.pair_offset,
            request_delay_ms: cfg.scan.request_delay_ms,
            head_lag_secs: cfg.scan.head_lag_secs,
            interval_secs: cfg.scan.interval_secs,
            policy: cfg.scan.policy,
            threshold: cfg.scan.threshold,
            webhook_url: cfg.alerts.webhook_url,
            max_message_len: cfg.alerts.max_message_len,
            history_path: cfg.storage.history_path,
            max_history: cfg.storage.max_history,
            chart_dir: cfg.storage.chart_dir,
            once: false,
        }
    }

    pub fn policy(&self) -> ScanPolicy {
        self.policy.into_policy(self.threshold)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookback_days < 3 {
            anyhow::bail!(
                "lookback_days must be at least 3 to leave a baseline, got {}",
                self.lookback_days
            );
        }
        if self.pair_count == 0 {
            anyhow::bail!("pair_count must be positive");
        }
        if let Some(threshold) = self.threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                anyhow::bail!("threshold must be in (0, 1], got {}", threshold);
            }
        }
        if self.max_history == 0 {
            anyhow::bail!("max_history must be positive");
        }
        Ok(())
    }

    fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            lookback_days: self.lookback_days,
            pair_count: self.pair_count,
            pair_offset: self.pair_offset,
            head_lag_secs: self.head_lag_secs,
            throttle: Throttle::from_millis(self.request_delay_ms),
        }
    }
}

impl Default for AppCfg {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

/// Wire the subgraph sources, history, charts and alert sink into a service
pub fn build_service(app_cfg: &AppCfg) -> Result<ScanService> {
    let timeout = Duration::from_secs(app_cfg.timeout_secs);
    let retry = RetryPolicy {
        max_retries: app_cfg.max_retries,
        backoff: Duration::from_millis(app_cfg.retry_backoff_ms),
    };

    let exchange = SubgraphClient::new(&app_cfg.exchange_url, timeout, retry)
        .context("create exchange subgraph client")?;
    let blocks = SubgraphClient::new(&app_cfg.blocks_url, timeout, retry)
        .context("create blocks subgraph client")?;
    info!("📡 Exchange subgraph: {}", exchange.url());
    info!("📡 Blocks subgraph: {}", blocks.url());
    let exchange = Arc::new(UniswapSubgraph::new(exchange));
    let blocks = Arc::new(BlockSubgraph::new(blocks));

    let mut scanner = VolumeScanner::new(
        exchange.clone(),
        blocks,
        exchange,
        Arc::new(SystemClock),
        app_cfg.scan_settings(),
    );
    if let Some(dir) = &app_cfg.chart_dir {
        scanner = scanner.with_charts(Arc::new(SvgChartRenderer::new(dir)));
    }

    let sink: Arc<dyn AlertSink> = match &app_cfg.webhook_url {
        Some(url) => Arc::new(
            DiscordWebhook::new(url, app_cfg.max_message_len, timeout)
                .context("create Discord webhook client")?,
        ),
        None => {
            warn!("⚠️ No webhook configured, alerts will only be logged");
            Arc::new(LogSink)
        }
    };

    let history = Arc::new(JsonHistoryStore::new(&app_cfg.history_path, app_cfg.max_history));
    info!("💾 Scan history at {}", history.path().display());

    Ok(ScanService::new(scanner, history, sink, app_cfg.policy()))
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("Starting Uniswap volume scanner");
    info!("Configuration: {:?}", app_cfg);

    app_cfg.validate()?;
    let service = build_service(&app_cfg)?;

    if app_cfg.once {
        let report = service.run_once().await.context("scan pass failed")?;
        info!(
            "✅ Single pass done: {} flagged, {} new",
            report.record.pairs.len(),
            report.new_pairs.len()
        );
        return Ok(());
    }

    Scheduler::new(Duration::from_secs(app_cfg.interval_secs))
        .run(&service)
        .await;
    Ok(())
}

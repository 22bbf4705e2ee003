use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use volscan::app;
use volscan::config::{self, PolicyKind};

#[derive(Parser, Debug)]
#[command(version, about = "Uniswap v2 pair volume anomaly scanner")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Classifier: new-maximum (1), deviation (2) or deviation-recency (3)
    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// Chebyshev probability threshold for the deviation policies
    #[arg(long)]
    threshold: Option<f64>,

    /// Days of daily volume to look back over
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Number of pairs to scan, by descending transaction count
    #[arg(long)]
    pair_count: Option<usize>,

    /// Skip this many of the most active pairs
    #[arg(long)]
    pair_offset: Option<usize>,

    /// Pause between subgraph requests in milliseconds
    #[arg(long)]
    request_delay_ms: Option<u64>,

    /// Seconds between scan passes
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Discord webhook URL (overrides config)
    #[arg(long)]
    webhook_url: Option<String>,

    /// Uniswap v2 subgraph URL (overrides config)
    #[arg(long)]
    exchange_url: Option<String>,

    /// Ethereum blocks subgraph URL (overrides config)
    #[arg(long)]
    blocks_url: Option<String>,

    /// Scan history file (overrides config)
    #[arg(long)]
    history_path: Option<String>,

    /// Directory for flagged-pair charts (overrides config)
    #[arg(long)]
    chart_dir: Option<String>,

    /// Do not render charts
    #[arg(long)]
    no_charts: bool,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    // Load base configuration from file if provided
    let base_config = match &args.config {
        Some(config_path) => config::Config::from_file(config_path)?,
        None => config::Config::default(),
    };

    // Priority: CLI args > Config file > Defaults
    let mut app_cfg = app::AppCfg::from_config(base_config);

    if let Some(policy) = args.policy {
        app_cfg.policy = policy;
    }
    if let Some(threshold) = args.threshold {
        app_cfg.threshold = Some(threshold);
    }
    if let Some(lookback_days) = args.lookback_days {
        app_cfg.lookback_days = lookback_days;
    }
    if let Some(pair_count) = args.pair_count {
        app_cfg.pair_count = pair_count;
    }
    if let Some(pair_offset) = args.pair_offset {
        app_cfg.pair_offset = pair_offset;
    }
    if let Some(request_delay_ms) = args.request_delay_ms {
        app_cfg.request_delay_ms = request_delay_ms;
    }
    if let Some(interval_secs) = args.interval_secs {
        app_cfg.interval_secs = interval_secs;
    }
    if let Some(webhook_url) = args.webhook_url {
        app_cfg.webhook_url = Some(webhook_url);
    }
    if let Some(exchange_url) = args.exchange_url {
        app_cfg.exchange_url = exchange_url;
    }
    if let Some(blocks_url) = args.blocks_url {
        app_cfg.blocks_url = blocks_url;
    }
    if let Some(history_path) = args.history_path {
        app_cfg.history_path = history_path;
    }
    if let Some(chart_dir) = args.chart_dir {
        app_cfg.chart_dir = Some(chart_dir);
    }
    if args.no_charts {
        app_cfg.chart_dir = None;
    }
    app_cfg.once = args.once;

    app::run(app_cfg).await
}

//! quadfund daemon: entry point for running a quadfund node.

use anyhow::Context;
use clap::Parser;
use quadfund_node::{NodeConfig, QuadfundNode, ShutdownController};
use quadfund_payments::HttpPaymentGateway;
use quadfund_rpc::RpcServer;
use quadfund_types::SystemClock;
use quadfund_utils::{format_duration, init_logging, LogFormat};
use quadfund_whitelist::{HttpWhitelistSource, Whitelist};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "quadfund-daemon", about = "Quadratic funding ledger daemon")]
struct Cli {
    /// Interface the HTTP API binds to.
    #[arg(long, env = "QUADFUND_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// HTTP API port.
    #[arg(long, env = "QUADFUND_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Credits given to voters registered without an explicit budget.
    #[arg(long, env = "QUADFUND_DEFAULT_CREDITS")]
    default_credits: Option<u64>,

    /// Distribution fee in basis points (500 = 5%).
    #[arg(long, env = "QUADFUND_FEE_BPS")]
    fee_bps: Option<u32>,

    /// Address receiving distribution fees.
    #[arg(long, env = "QUADFUND_TREASURY_ADDRESS")]
    treasury_address: Option<String>,

    /// Allow-list endpoint.
    #[arg(long, env = "QUADFUND_WHITELIST_URL")]
    whitelist_url: Option<String>,

    /// Admit every address (development only).
    #[arg(long, env = "QUADFUND_DISABLE_WHITELIST")]
    disable_whitelist: bool,

    /// Payment relayer base URL.
    #[arg(long, env = "QUADFUND_PAYMENTS_URL")]
    payments_url: Option<String>,

    /// Do not serve `/metrics`.
    #[arg(long, env = "QUADFUND_DISABLE_METRICS")]
    disable_metrics: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "QUADFUND_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "QUADFUND_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "QUADFUND_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the node and its HTTP API.
    Run,
    /// Print the effective configuration as TOML and exit.
    Config,
}

impl Cli {
    /// Layer flags and env vars over the file (or default) configuration.
    fn apply(&self, mut config: NodeConfig) -> NodeConfig {
        if let Some(v) = &self.bind_address {
            config.bind_address = v.clone();
        }
        if let Some(v) = self.rpc_port {
            config.rpc_port = v;
        }
        if let Some(v) = self.default_credits {
            config.default_credits = v;
        }
        if let Some(v) = self.fee_bps {
            config.fee_bps = v;
        }
        if let Some(v) = &self.treasury_address {
            config.treasury_address = v.clone();
        }
        if let Some(v) = &self.whitelist_url {
            config.whitelist.url = v.clone();
        }
        if self.disable_whitelist {
            config.whitelist.enabled = false;
        }
        if let Some(v) = &self.payments_url {
            config.payments.url = v.clone();
        }
        if self.disable_metrics {
            config.enable_metrics = false;
        }
        if let Some(v) = self.log_format {
            config.log_format = v;
        }
        if let Some(v) = &self.log_level {
            config.log_level = v.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => NodeConfig::default(),
    };
    let config = cli.apply(base);

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Run => run(config).await,
    }
}

async fn run(config: NodeConfig) -> anyhow::Result<()> {
    init_logging(config.log_format, &config.log_level)
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;
    config.validate()?;

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.rpc_port)
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address))?;

    let source = HttpWhitelistSource::with_timeout(
        config.whitelist.url.clone(),
        Duration::from_secs(config.whitelist.timeout_secs),
    );
    let whitelist = if config.whitelist.enabled {
        tracing::info!(
            url = %config.whitelist.url,
            ttl = %format_duration(Duration::from_secs(config.whitelist.ttl_secs)),
            "whitelist enabled"
        );
        Whitelist::with_clock(source, Arc::new(SystemClock), config.whitelist.ttl_secs)
    } else {
        tracing::warn!("whitelist disabled, every address is admitted");
        Whitelist::disabled(source)
    };

    let payments = HttpPaymentGateway::with_settings(
        config.payments.url.clone(),
        Duration::from_secs(config.payments.timeout_secs),
        Duration::from_millis(config.payments.poll_interval_ms),
    );

    let node = Arc::new(QuadfundNode::new(&config, whitelist, payments)?);
    tracing::info!(
        %addr,
        default_credits = config.default_credits,
        fee_bps = config.fee_bps,
        treasury = %config.treasury_address,
        "starting quadfund node"
    );

    let shutdown = ShutdownController::new();
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.listen_for_signals().await });

    RpcServer::new(addr, node, config.enable_metrics)
        .serve(shutdown.wait())
        .await?;

    tracing::info!("quadfund daemon exited cleanly");
    Ok(())
}

// # dyndnsd - dynamic-DNS reconciliation daemon
//
// Thin integration layer only: all reconciliation logic lives in
// dyndns-core. The daemon is responsible for:
// 1. Locating and loading the configuration file
// 2. Initializing tracing
// 3. Wiring the prober, resolver, and provider into the Reconciler
// 4. Running the loop until SIGTERM/SIGINT
//
// ## Configuration
//
// The config file path is taken from the first CLI argument, then the
// `DYNDNSD_CONFIG` environment variable, then `/etc/dyndnsd.conf`.
//
// The file is line-oriented `key=value` text:
//
// ```text
// domain=myhost
// token=00000000-0000-0000-0000-000000000000
// interval=600
// ipv6_endpoint=https://ipv6.icanhazip.com
// ipv4_endpoint=https://ipv4.icanhazip.com
// ```
//
// `ipv4_endpoint` is optional; leaving it out disables IPv4 tracking.
// The log level is taken from `DYNDNSD_LOG_LEVEL` (default `info`).

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use dyndns_core::{Config, CycleEvent, Reconciler};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Default config file location
const DEFAULT_CONFIG_PATH: &str = "/etc/dyndnsd.conf";

/// Resolve the config file path: CLI arg, then env var, then default
fn config_path() -> String {
    if let Some(path) = env::args().nth(1) {
        return path;
    }
    env::var("DYNDNSD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

fn main() -> ExitCode {
    // Initialize tracing before config load so clamp warnings are visible
    let log_level = match env::var("DYNDNSD_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!("Invalid DYNDNSD_LOG_LEVEL '{other}'; valid: trace, debug, info, warn, error");
            return DaemonExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    let path = config_path();
    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %path, "configuration error: {e}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    info!("Starting dyndnsd");
    info!(
        domain = %config.domain,
        interval_secs = config.interval_secs,
        ipv4_enabled = config.ipv4_enabled(),
        "configuration loaded"
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {e}");
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    })
    .into()
}

/// Wire the components together and run the loop until a shutdown signal
async fn run_daemon(config: Config) -> Result<()> {
    let prober = Box::new(dyndns_probe_http::HttpProber::new());
    let resolver = Box::new(dyndns_resolver_sys::SystemResolver::new());
    let provider = Box::new(dyndns_provider_duckdns::DuckDnsProvider::new());

    let (reconciler, mut events) = Reconciler::new(prober, resolver, provider, config)?;

    // Drain cycle events into debug logs so the bounded channel never fills
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event {
                CycleEvent::UpdateApplied { .. } | CycleEvent::UpdateRejected { .. } => {
                    info!(?event, "cycle event")
                }
                _ => debug!(?event, "cycle event"),
            }
        }
    });

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(name) => info!("Received {name}, shutting down"),
            Err(e) => error!("Signal handler error: {e}"),
        }
        let _ = shutdown_tx.send(());
    });

    reconciler.run_with_shutdown(Some(shutdown_rx)).await?;
    info!("dyndnsd stopped");
    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {e}"))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for Ctrl-C (fallback for non-Unix platforms)
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {e}"))?;
    Ok("SIGINT")
}

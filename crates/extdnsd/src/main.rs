// # extdnsd - extdns Daemon
//
// Thin integration layer: all synchronization logic lives in extdns-core
// and the source/provider crates.
//
// The extdnsd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering sources and providers
// 4. Running the controller until a shutdown signal
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Source
// - `EXTDNS_SOURCE_TYPE`: Type of source (ingress)
// - `EXTDNS_NAMESPACE`: Namespace to watch (unset or empty = all namespaces)
//
// ### DNS Provider
// - `EXTDNS_PROVIDER_TYPE`: Provider type (inmemory)
// - `EXTDNS_ZONE`: Zone to keep in sync
//
// ### Controller
// - `EXTDNS_INTERVAL_SECS`: Seconds between cycles (1-3600, default 60)
// - `EXTDNS_DRY_RUN`: Plan but never apply (true/false)
// - `EXTDNS_ONCE`: Run a single cycle and exit (true/false)
// - `EXTDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export EXTDNS_NAMESPACE=web
// export EXTDNS_ZONE=example.com
// export EXTDNS_DRY_RUN=true
//
// extdnsd
// ```

use anyhow::{Context, Result};
use extdns_core::config::{ControllerConfig, ExtDnsConfig, ProviderConfig, SourceConfig};
use extdns_core::{Controller, ProviderRegistry};
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Source types compiled into this binary
const SUPPORTED_SOURCES: &str = if cfg!(feature = "ingress") {
    "ingress"
} else {
    "<none; rebuild with --features ingress>"
};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ExtDnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ExtDnsExitCode> for ExitCode {
    fn from(code: ExtDnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    source_type: String,
    namespace: Option<String>,
    provider_type: String,
    zone: String,
    interval_secs: u64,
    dry_run: bool,
    once: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            source_type: lookup("EXTDNS_SOURCE_TYPE").unwrap_or_else(|| "ingress".to_string()),
            namespace: lookup("EXTDNS_NAMESPACE")
                .map(|ns| ns.trim().to_string())
                .filter(|ns| !ns.is_empty()),
            provider_type: lookup("EXTDNS_PROVIDER_TYPE")
                .unwrap_or_else(|| "inmemory".to_string()),
            zone: lookup("EXTDNS_ZONE").unwrap_or_default(),
            interval_secs: match lookup("EXTDNS_INTERVAL_SECS") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("EXTDNS_INTERVAL_SECS is not a number: {}", raw))?,
                None => 60,
            },
            dry_run: parse_bool("EXTDNS_DRY_RUN", lookup("EXTDNS_DRY_RUN"))?,
            once: parse_bool("EXTDNS_ONCE", lookup("EXTDNS_ONCE"))?,
            log_level: lookup("EXTDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.zone.trim().is_empty() {
            anyhow::bail!(
                "EXTDNS_ZONE is required. \
                Set it via: export EXTDNS_ZONE=example.com"
            );
        }

        match self.source_type.as_str() {
            "ingress" if cfg!(feature = "ingress") => {}
            _ => anyhow::bail!(
                "EXTDNS_SOURCE_TYPE '{}' is not supported by this build. \
                Supported sources: {}",
                self.source_type,
                SUPPORTED_SOURCES
            ),
        }

        match self.provider_type.as_str() {
            "inmemory" => {}
            _ => anyhow::bail!(
                "EXTDNS_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: inmemory",
                self.provider_type
            ),
        }

        if !(1..=3600).contains(&self.interval_secs) {
            anyhow::bail!(
                "EXTDNS_INTERVAL_SECS must be between 1 and 3600 seconds. Got: {}",
                self.interval_secs
            );
        }

        parse_level(&self.log_level)?;

        Ok(())
    }

    /// Build the library configuration
    fn to_extdns_config(&self) -> ExtDnsConfig {
        ExtDnsConfig {
            source: SourceConfig::Ingress {
                namespace: self.namespace.clone(),
            },
            provider: ProviderConfig::InMemory {
                zones: vec![self.zone.clone()],
            },
            zone: self.zone.clone(),
            controller: ControllerConfig {
                interval_secs: self.interval_secs,
                dry_run: self.dry_run,
                ..Default::default()
            },
        }
    }
}

fn parse_bool(name: &str, value: Option<String>) -> Result<bool> {
    match value.as_deref().map(str::trim).map(str::to_lowercase).as_deref() {
        None | Some("") | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => anyhow::bail!("{} must be true or false. Got: {}", name, other),
    }
}

fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "EXTDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExtDnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return ExtDnsExitCode::ConfigError.into();
    }

    let log_level = parse_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExtDnsExitCode::ConfigError.into();
    }

    info!("Starting extdnsd daemon");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ExtDnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            ExtDnsExitCode::RuntimeError
        } else {
            ExtDnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let registry = ProviderRegistry::new();

    info!("Registering in-memory provider");
    extdns_core::provider::register(&registry);

    #[cfg(feature = "ingress")]
    {
        info!("Registering Ingress source");
        let client = kube::Client::try_default()
            .await
            .context("Failed to create Kubernetes client")?;
        extdns_source_ingress::register(&registry, client);
    }

    let extdns_config = config.to_extdns_config();
    let source = registry.create_source(&extdns_config.source)?;
    let provider = registry.create_provider(&extdns_config.provider)?;

    info!(
        source = source.source_name(),
        provider = provider.provider_name(),
        zone = %extdns_config.zone,
        namespace = config.namespace.as_deref().unwrap_or("<all>"),
        "Components created"
    );

    let (controller, mut events) = Controller::new(source, provider, extdns_config)?;

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(?event, "Controller event");
        }
    });

    if config.once {
        let changes = controller.run_once().await?;
        info!(
            created = changes.create.len(),
            updated = changes.update_new.len(),
            deleted = changes.delete.len(),
            "Single cycle complete"
        );
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => info!("Received shutdown signal: {}", signal),
            Err(e) => error!("Shutdown handler error: {:#}", e),
        }
        let _ = shutdown_tx.send(());
    });

    controller.run_with_shutdown(Some(shutdown_rx)).await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}

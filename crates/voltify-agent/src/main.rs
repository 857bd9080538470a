//! Voltify agent entry point.
//!
//! Wires the power monitor, flag store and overlay controller into the
//! [`HandlePowerEventUseCase`] and runs the event pump until Ctrl-C or SIGTERM.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config (file, then CLI overrides)
//!  └─ build use case
//!       ├─ KeyFileFlagStore           -- reads the app's active flag
//!       └─ ProcessOverlayController   -- or DryRunOverlayController
//!  └─ start_power_monitor()           -- sysfs polling thread
//!  └─ event pump: one event at a time, dispatched off the async runtime
//! ```
//!
//! # Usage
//!
//! ```text
//! voltify-agent [OPTIONS]
//!
//! Options:
//!   --config <PATH>          Config file [env: VOLTIFY_CONFIG]
//!   --dry-run                Log overlay commands instead of launching the host
//!   --no-gate                Act on every event regardless of the active flag
//!   --log-level <LEVEL>      Override the configured log level
//!   --simulate <EVENTS>      Handle the given events (comma separated) and exit
//! ```
//!
//! `RUST_LOG` takes precedence over both the file and `--log-level`.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use voltify_agent::application::handle_power_event::{dispatch, HandlePowerEventUseCase};
use voltify_agent::application::ports::{FlagReader, OverlayController};
use voltify_agent::infrastructure::{
    flag_store::KeyFileFlagStore,
    overlay::{DryRunOverlayController, ProcessOverlayConfig, ProcessOverlayController},
    power_source::{start_power_monitor, sysfs::SysfsPowerSource},
    storage::config::{load_config, load_config_from, AppConfig},
};
use voltify_core::{EventGate, OverlayCommand, PowerEvent};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Shows the Voltify charging alarm overlay while external power is attached.
#[derive(Debug, Parser)]
#[command(name = "voltify-agent", version)]
struct Cli {
    /// Path to the TOML config file.  Defaults to the platform config dir.
    #[arg(long, env = "VOLTIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Log overlay commands instead of launching the overlay host.
    #[arg(long)]
    dry_run: bool,

    /// Act on every power event regardless of the application's active flag.
    #[arg(long)]
    no_gate: bool,

    /// Log level (`error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long, env = "VOLTIFY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Handle these events (e.g. `connected,disconnected`) and exit instead of
    /// watching line power.
    #[arg(long, value_delimiter = ',')]
    simulate: Vec<PowerEvent>,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut AppConfig) {
        if self.dry_run {
            config.overlay.dry_run = true;
        }
        if self.no_gate {
            config.gate.gate_on_active_flag = false;
        }
        if let Some(level) = &self.log_level {
            config.agent.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("failed to load configuration")?;
    cli.apply(&mut config);

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level)),
        )
        .init();

    info!("Voltify agent starting");

    let flag_dir = config
        .flag_store_dir()
        .context("failed to resolve the flag store directory")?;
    info!(
        "active flag: {} (gating {})",
        flag_dir.join(format!("{}.txt", config.flag.key)).display(),
        if config.gate.gate_on_active_flag { "on" } else { "off" }
    );

    let flags: Arc<dyn FlagReader> = Arc::new(KeyFileFlagStore::new(flag_dir));
    let overlay: Arc<dyn OverlayController> = if config.overlay.dry_run {
        Arc::new(DryRunOverlayController::new(config.overlay.service_name.clone()))
    } else {
        Arc::new(ProcessOverlayController::new(ProcessOverlayConfig::from(
            &config.overlay,
        )))
    };

    let use_case = Arc::new(HandlePowerEventUseCase::new(
        EventGate::new(config.gate),
        config.flag.key.clone(),
        flags,
        Arc::clone(&overlay),
    ));

    // ── Simulation mode ───────────────────────────────────────────────────────
    if !cli.simulate.is_empty() {
        for event in cli.simulate.iter().copied() {
            handle_event(&use_case, event).await;
        }
        shutdown_overlay(overlay).await;
        return Ok(());
    }

    // ── Power monitor ─────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let source = SysfsPowerSource::new(&config.power.sysfs_root);
    let mut events = start_power_monitor(source, config.power.poll_interval(), Arc::clone(&running))
        .context("failed to start power monitor")?;

    // ── Ctrl-C / SIGTERM handler ──────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        running_clone.store(false, Ordering::Relaxed);
    });

    info!("Voltify agent ready.  Press Ctrl-C to exit.");

    // ── Event pump ────────────────────────────────────────────────────────────
    // The monitor drops its sender once `running` is cleared, ending the loop.
    while let Some(event) = events.recv().await {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        handle_event(&use_case, event).await;
    }

    shutdown_overlay(overlay).await;
    info!("Voltify agent stopped");
    Ok(())
}

/// Handles one event on the blocking pool.
///
/// Dispatch may block on process spawn/kill, so it stays off the async
/// workers.  Events are awaited one at a time, preserving delivery order.  A
/// panicking controller is contained here and logged.
async fn handle_event(use_case: &Arc<HandlePowerEventUseCase>, event: PowerEvent) {
    let uc = Arc::clone(use_case);
    if let Err(e) = tokio::task::spawn_blocking(move || uc.handle(event)).await {
        error!(event = %event, "power event handler aborted: {e}");
    }
}

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it.
///
/// Never resolves if no handler can be installed, so a failed registration
/// does not look like a shutdown request.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                let ctrl_c_error = tokio::select! {
                    result = tokio::signal::ctrl_c() => result.err(),
                    _ = terminate.recv() => None,
                };
                if let Some(e) = ctrl_c_error {
                    error!("failed to listen for Ctrl-C: {e}");
                    terminate.recv().await;
                }
                return;
            }
            Err(e) => warn!("failed to install SIGTERM handler: {e}"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Leaves no overlay host behind when the agent exits.
async fn shutdown_overlay(overlay: Arc<dyn OverlayController>) {
    match tokio::task::spawn_blocking(move || dispatch(overlay.as_ref(), &OverlayCommand::Stop))
        .await
    {
        Ok(outcome) => info!(outcome = %outcome, "overlay shut down"),
        Err(e) => error!("overlay shutdown aborted: {e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        // Arrange: parse with no flags
        let cli = Cli::parse_from(["voltify-agent"]);
        let mut config = AppConfig::default();
        let mut expected = AppConfig::default();
        if let Some(level) = &cli.log_level {
            // VOLTIFY_LOG_LEVEL may be set in the test environment.
            expected.agent.log_level = level.clone();
        }

        // Act
        cli.apply(&mut config);

        // Assert
        assert!(!cli.dry_run);
        assert!(!cli.no_gate);
        assert!(cli.simulate.is_empty());
        assert_eq!(config, expected);
    }

    #[test]
    fn test_cli_dry_run_overrides_file() {
        let cli = Cli::parse_from(["voltify-agent", "--dry-run"]);
        let mut config = AppConfig::default();

        cli.apply(&mut config);

        assert!(config.overlay.dry_run);
        assert!(config.gate.gate_on_active_flag);
    }

    #[test]
    fn test_cli_no_gate_disables_gating_only() {
        let cli = Cli::parse_from(["voltify-agent", "--no-gate"]);
        let mut config = AppConfig::default();

        cli.apply(&mut config);

        assert!(!config.gate.gate_on_active_flag);
        assert!(config.gate.enable_drag);
        assert!(!config.overlay.dry_run);
    }

    #[test]
    fn test_cli_log_level_overrides_file() {
        // Arrange: the file asks for warnings only
        let cli = Cli::parse_from(["voltify-agent", "--log-level", "trace"]);
        let mut config = AppConfig::default();
        config.agent.log_level = "warn".to_string();

        // Act
        cli.apply(&mut config);

        // Assert
        assert_eq!(config.agent.log_level, "trace");
    }

    #[test]
    fn test_cli_flags_do_not_clear_file_settings() {
        // A file that already enables dry-run and disables gating keeps both
        // when the flags are absent.
        let cli = Cli::parse_from(["voltify-agent"]);
        let mut config = AppConfig::default();
        config.overlay.dry_run = true;
        config.gate.gate_on_active_flag = false;

        cli.apply(&mut config);

        assert!(config.overlay.dry_run);
        assert!(!config.gate.gate_on_active_flag);
    }

    #[test]
    fn test_cli_simulate_parses_comma_separated_events() {
        let cli = Cli::parse_from(["voltify-agent", "--simulate", "connected,disconnected"]);
        assert_eq!(
            cli.simulate,
            vec![PowerEvent::Connected, PowerEvent::Disconnected]
        );
    }

    #[test]
    fn test_cli_simulate_accepts_aliases_with_other_flags() {
        let cli = Cli::try_parse_from([
            "voltify-agent",
            "--simulate",
            "connected,Unplugged",
            "--no-gate",
            "--dry-run",
        ])
        .expect("valid arguments");

        assert_eq!(
            cli.simulate,
            vec![PowerEvent::Connected, PowerEvent::Disconnected]
        );
        assert!(cli.no_gate);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_simulate_rejects_unknown_event() {
        let result = Cli::try_parse_from(["voltify-agent", "--simulate", "connected,brownout"]);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sigterm_resolves_shutdown_signal() {
        use std::time::Duration;
        use tokio::signal::unix::{signal, SignalKind};

        // Arrange: an extra handler keeps SIGTERM from terminating the test
        // binary even before `shutdown_signal` has registered its own.
        let _keep_handler = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        let waiter = tokio::spawn(shutdown_signal());

        // Act: resend until the waiter has registered and observed one.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !waiter.is_finished() && tokio::time::Instant::now() < deadline {
            std::process::Command::new("kill")
                .args(["-TERM", &std::process::id().to_string()])
                .status()
                .expect("run kill");
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        // Assert
        assert!(waiter.is_finished(), "SIGTERM must resolve shutdown_signal");
    }

    #[test]
    fn test_cli_config_path_is_captured() {
        let cli = Cli::parse_from(["voltify-agent", "--config", "/etc/voltify/config.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/voltify/config.toml")));
    }
}

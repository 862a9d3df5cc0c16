//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::control;
use serde_json::json;

use capture_watchdog::core::config::Config;
use capture_watchdog::core::deadline::Deadline;
use capture_watchdog::core::errors::Result;
use capture_watchdog::core::size::SizeThreshold;
use capture_watchdog::daemon::controller::CommandController;
use capture_watchdog::daemon::loop_main::{MonitorConfig, MonitorLoop};
use capture_watchdog::daemon::signals::SignalHandler;
use capture_watchdog::logger::console;
use capture_watchdog::scanner::dir_size::DirectorySizeScanner;

/// Capture watchdog: stop packet capture before the disk fills up.
#[derive(Debug, Parser)]
#[command(
    name = "capwatch",
    author,
    version,
    about = "Monitor a capture folder and stop the capture service at a size limit or end time",
    long_about = None
)]
pub struct Cli {
    /// Size limit that triggers the stop (e.g. 2MB, 1GB, 3.5TB).
    #[arg(value_name = "SIZE_LIMIT")]
    size_limit: String,
    /// Stop once this local time is reached (YYYY-MM-DDThh:mm).
    #[arg(long = "end-time", value_name = "YYYY-MM-DDThh:mm")]
    end_time: Option<String>,
    /// Folder to monitor [default: /data].
    #[arg(long, value_name = "PATH")]
    folder: Option<PathBuf>,
    /// Seconds between checks [default: 60].
    #[arg(long, value_name = "SECONDS")]
    interval: Option<u64>,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Whether colored output should be used on stderr.
    pub fn wants_color(&self) -> bool {
        !self.no_color && io::stderr().is_terminal()
    }
}

/// Validate inputs, then monitor until a trigger, an interrupt, or a failure.
///
/// Returns the process exit status for the finished session.
pub fn run(cli: &Cli) -> Result<i32> {
    control::set_override(cli.wants_color());

    let config = effective_config(cli)?;

    let threshold = SizeThreshold::parse(&cli.size_limit)?;
    console::info(&format!(
        "Size limit set to {} ({threshold} bytes)",
        cli.size_limit.trim()
    ));

    let deadline = cli.end_time.as_deref().map(Deadline::parse).transpose()?;
    if let Some(deadline) = deadline {
        console::info(&format!("End time set to {deadline}"));
    }

    if cli.print_config {
        let payload = json!({
            "config": &config,
            "config_hash": config.stable_hash()?,
            "size_limit_bytes": threshold.to_string(),
            "size_limit_trigger_bytes": threshold.ceil_bytes().to_string(),
            "end_time": deadline.map(|d| d.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(0);
    }

    let monitor_config = MonitorConfig::new(
        config.monitor.folder.clone(),
        threshold,
        deadline,
        Duration::from_secs(config.monitor.poll_interval_secs),
    )?;

    let controller = CommandController::from_config(&config.capture);
    console::info(&format!(
        "Stop command: {} (config {})",
        controller.argv().join(" "),
        config.stable_hash()?
    ));

    let mut monitor = MonitorLoop::new(
        monitor_config,
        DirectorySizeScanner::new(config.scanner.on_unreadable),
        controller,
        SignalHandler::new(),
    );
    let state = monitor.run()?;
    console::info(&format!("Monitoring finished ({state})"));
    Ok(state.exit_code())
}

/// Defaults, then config file and env, then command-line flags, then one
/// validation pass over the merged result.
fn effective_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(folder) = &cli.folder {
        config.monitor.folder.clone_from(folder);
    }
    if let Some(interval) = cli.interval {
        config.monitor.poll_interval_secs = interval;
    }
    config.validate()?;
    Ok(config)
}

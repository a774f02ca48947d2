use crate::error::ConfigError;
use crate::portwatch::ExportFormat;

use clap::Parser;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_INTERVAL_SECS: u64 = 15;
pub const MAX_INTERVAL_SECS: u64 = 3600;

/// Command line, with environment fallbacks for the polling knobs.
#[derive(Debug, Parser)]
#[command(name = "harboor-tray", version, about)]
pub struct Cli {
    /// Seconds between two samples of the listening sockets
    #[arg(long, env = "HARBOOR_TRAY_INTERVAL", value_name = "SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Seconds a single sample may take before it is abandoned [default: interval]
    #[arg(long, env = "HARBOOR_TRAY_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Take one sample, print the menu and exit
    #[arg(long)]
    pub once: bool,

    /// Format used for exports and for --once output
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Base directory for exported files
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Log file used while the terminal UI is running
    #[arg(long, env = "HARBOOR_TRAY_LOG", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub poll_interval: Duration,
    pub sampler_timeout: Duration,
    pub once: bool,
    pub export_format: ExportFormat,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            sampler_timeout: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            once: false,
            export_format: ExportFormat::Json,
            export_dir: PathBuf::from("."),
            log_file: default_log_file(),
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if !(1..=MAX_INTERVAL_SECS).contains(&cli.interval) {
            return Err(ConfigError::Interval {
                got: cli.interval,
                max: MAX_INTERVAL_SECS,
            });
        }

        let timeout = cli.timeout.unwrap_or(cli.interval);
        if timeout == 0 || timeout > cli.interval {
            return Err(ConfigError::Timeout {
                got: timeout,
                interval: cli.interval,
            });
        }

        Ok(Self {
            poll_interval: Duration::from_secs(cli.interval),
            sampler_timeout: Duration::from_secs(timeout),
            once: cli.once,
            export_format: cli.format,
            export_dir: cli.export_dir.unwrap_or_else(|| PathBuf::from(".")),
            log_file: cli.log_file.unwrap_or_else(default_log_file),
        })
    }
}

fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("harboor-tray.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        let cli = Cli::try_parse_from(std::iter::once("harboor-tray").chain(args.iter().copied()))
            .expect("arguments should parse");
        Config::try_from(cli)
    }

    #[test]
    fn timeout_defaults_to_interval() {
        let cfg = parse(&["--interval", "30"]).unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.sampler_timeout, Duration::from_secs(30));
    }

    #[test]
    fn timeout_longer_than_interval_is_rejected() {
        assert_eq!(
            parse(&["--interval", "5", "--timeout", "6"]),
            Err(ConfigError::Timeout { got: 6, interval: 5 })
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(parse(&["--interval", "0"]), Err(ConfigError::Interval { .. })));
    }

    #[test]
    fn export_options_are_carried() {
        let cfg = parse(&["--once", "--format", "yaml", "--export-dir", "/tmp/out"]).unwrap();
        assert!(cfg.once);
        assert_eq!(cfg.export_format, ExportFormat::Yaml);
        assert_eq!(cfg.export_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

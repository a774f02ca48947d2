use std::{io, time::Duration};

use thiserror::Error;

/// Why a sample could not be taken. None of these are fatal: the poller keeps
/// the previous menu and tries again next cycle.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} did not finish within {after:?}")]
    Timeout { program: String, after: Duration },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("i/o error while reading {program} output: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("poll interval must be between 1 and {max} seconds, got {got}")]
    Interval { got: u64, max: u64 },

    #[error("sampler timeout must be between 1 and the poll interval ({interval}s), got {got}s")]
    Timeout { got: u64, interval: u64 },
}

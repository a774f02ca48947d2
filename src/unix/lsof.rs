use crate::sampler::CommandSampler;

use std::time::Duration;

/// Numeric hosts and ports, TCP sockets in LISTEN state only.
pub const LSOF_ARGS: [&str; 4] = ["-nP", "-iTCP", "-sTCP:LISTEN", "+c0"];

/// The default sampler on Unix hosts.
pub fn lsof_sampler(timeout: Duration) -> CommandSampler {
    CommandSampler::new("lsof", LSOF_ARGS, timeout)
}

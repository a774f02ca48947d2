//! Live menu of the host's listening TCP ports.
//!
//! A background [`poller::PollLoop`] samples the listening sockets, parses
//! them into [`model::ListeningSocket`]s and reconciles them against the
//! [`menu::MenuStore`]. The UI sees the result only through a
//! [`poller::MenuAdapter`].

pub mod adapter;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod model;
pub mod poller;
pub mod portwatch;
pub mod sampler;
pub mod ui;
pub mod util;

#[cfg(target_family = "unix")]
pub mod unix;

/// Sampler for the current platform.
#[cfg(target_family = "unix")]
pub fn platform_sampler(timeout: std::time::Duration) -> sampler::CommandSampler {
    unix::lsof_sampler(timeout)
}

pub mod common;
pub mod export;
pub mod snapshot;
pub mod tracker;

pub use common::{ExportFormat, PortEvent};
pub use snapshot::export_snapshot;
pub use tracker::{PortChange, Tracker};

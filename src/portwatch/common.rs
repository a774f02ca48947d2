use crate::menu::MenuEntry;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    pub fn next(self) -> Self {
        match self {
            ExportFormat::Json => ExportFormat::Csv,
            ExportFormat::Csv => ExportFormat::Yaml,
            ExportFormat::Yaml => ExportFormat::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "event")]
pub enum PortEvent {
    #[serde(rename = "initial_state")]
    InitialState {
        timestamp: DateTime<Utc>,
        entries: Vec<MenuEntry>,
    },
    #[serde(rename = "port_opened")]
    PortOpened {
        timestamp: DateTime<Utc>,
        entry: MenuEntry,
    },
    #[serde(rename = "port_changed")]
    PortChanged {
        timestamp: DateTime<Utc>,
        entry: MenuEntry,
    },
    #[serde(rename = "port_closed")]
    PortClosed {
        timestamp: DateTime<Utc>,
        entry: MenuEntry,
    },
}

impl PortEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PortEvent::InitialState { .. } => "initial_state",
            PortEvent::PortOpened { .. } => "port_opened",
            PortEvent::PortChanged { .. } => "port_changed",
            PortEvent::PortClosed { .. } => "port_closed",
        }
    }
}

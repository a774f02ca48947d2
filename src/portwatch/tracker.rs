use crate::menu::MenuEntry;

use chrono::{DateTime, Utc};
use csv::Writer;

use crate::portwatch::{ExportFormat, common::PortEvent, export::export_to_file};
use std::{
    io::{Result, Write},
    path::{Path, PathBuf},
};

/// What happened to a menu entry, as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortChange {
    Opened,
    Changed,
    Closed,
}

/// Records menu changes while active so they can be exported later.
#[derive(Debug, Default)]
pub struct Tracker {
    pub events: Vec<PortEvent>,
    pub started_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub export_format: ExportFormat,
}

impl Tracker {
    pub fn new(export_format: ExportFormat) -> Self {
        Self {
            events: vec![],
            started_at: None,
            is_active: false,
            export_format,
        }
    }

    /// Starts recording with the currently visible entries as baseline.
    pub fn start(&mut self, current: Vec<MenuEntry>) {
        let now = Utc::now();
        self.started_at = Some(now);
        self.is_active = true;
        self.events.clear();
        self.events.push(PortEvent::InitialState {
            timestamp: now,
            entries: current,
        });
    }

    /// Stops recording and exports what was collected.
    pub fn stop(&mut self, base_dir: &Path) -> Result<PathBuf> {
        self.is_active = false;
        self.export(base_dir)
    }

    pub fn record(&mut self, change: PortChange, entry: MenuEntry) {
        if !self.is_active {
            return;
        }

        let timestamp = Utc::now();
        self.events.push(match change {
            PortChange::Opened => PortEvent::PortOpened { timestamp, entry },
            PortChange::Changed => PortEvent::PortChanged { timestamp, entry },
            PortChange::Closed => PortEvent::PortClosed { timestamp, entry },
        });
    }

    pub fn export(&self, base_dir: &Path) -> Result<PathBuf> {
        export_to_file(
            &self.events,
            self.export_format,
            "changes",
            base_dir,
            Self::write_events_csv,
        )
    }

    fn write_events_csv(file: &mut dyn Write, events: &[PortEvent]) -> Result<()> {
        let mut wtr = Writer::from_writer(file);
        wtr.write_record(["timestamp", "event", "port", "pid", "process_name", "title"])?;

        for event in events {
            let (timestamp, entries) = match event {
                PortEvent::InitialState { timestamp, entries } => (timestamp, entries.as_slice()),
                PortEvent::PortOpened { timestamp, entry }
                | PortEvent::PortChanged { timestamp, entry }
                | PortEvent::PortClosed { timestamp, entry } => {
                    (timestamp, std::slice::from_ref(entry))
                }
            };
            for e in entries {
                let socket = e.socket();
                wtr.write_record([
                    timestamp.to_rfc3339(),
                    event.name().to_string(),
                    socket.port.to_string(),
                    socket.pid.map(|pid| pid.to_string()).unwrap_or_default(),
                    socket.process_name.clone(),
                    e.title().to_string(),
                ])?;
            }
        }

        wtr.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListeningSocket, ProtocolFamily};

    fn entry(port: u16) -> MenuEntry {
        MenuEntry::from_socket(&ListeningSocket {
            port,
            family: ProtocolFamily::IPv4,
            pid: Some(42),
            process_name: "node".into(),
        })
    }

    #[test]
    fn inactive_tracker_ignores_changes() {
        let mut tracker = Tracker::new(ExportFormat::Json);
        tracker.record(PortChange::Opened, entry(3000));
        assert!(tracker.events.is_empty());
    }

    #[test]
    fn records_after_baseline() {
        let mut tracker = Tracker::new(ExportFormat::Json);
        tracker.start(vec![entry(80)]);
        tracker.record(PortChange::Opened, entry(3000));
        tracker.record(PortChange::Closed, entry(3000));

        let names: Vec<_> = tracker.events.iter().map(PortEvent::name).collect();
        assert_eq!(names, ["initial_state", "port_opened", "port_closed"]);
    }

    #[test]
    fn stop_exports_csv_rows_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::new(ExportFormat::Csv);
        tracker.start(vec![entry(80), entry(443)]);
        tracker.record(PortChange::Changed, entry(80));

        let path = tracker.stop(dir.path()).unwrap();
        assert!(!tracker.is_active);
        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains(",initial_state,80,42,node,80 -- node"));
        assert!(lines[3].contains(",port_changed,80,"));
    }

    #[test]
    fn json_export_tags_events() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::new(ExportFormat::Json);
        tracker.start(vec![]);
        tracker.record(PortChange::Opened, entry(5173));

        let path = tracker.export(dir.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value[1]["event"], "port_opened");
        assert_eq!(value[1]["entry"]["socket"]["port"], 5173);
    }
}

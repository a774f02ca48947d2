use crate::menu::MenuEntry;

use crate::portwatch::{ExportFormat, export::export_to_file, export::write_to};

use csv::Writer;
use std::{
    io::{Result, Write},
    path::{Path, PathBuf},
};

/// Exports the given menu entries to `<base_dir>/snapshots/ports-<ts>.<ext>`.
pub fn export_snapshot(entries: &[MenuEntry], format: ExportFormat, base_dir: &Path) -> Result<PathBuf> {
    export_to_file(entries, format, "ports", base_dir, write_snapshot_csv)
}

/// Prints the menu entries to a writer, used by one-shot runs.
pub fn write_snapshot(out: &mut dyn Write, entries: &[MenuEntry], format: ExportFormat) -> Result<()> {
    write_to(out, entries, format, write_snapshot_csv)
}

fn write_snapshot_csv(file: &mut dyn Write, entries: &[MenuEntry]) -> Result<()> {
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(["Port", "PID", "Process Name", "Title", "Tooltip", "Visible"])?;
    for e in entries {
        let socket = e.socket();
        wtr.write_record([
            socket.port.to_string(),
            socket.pid.map(|pid| pid.to_string()).unwrap_or_default(),
            socket.process_name.clone(),
            e.title().to_string(),
            e.tooltip().to_string(),
            e.visible().to_string(),
        ])?;
    }
    wtr.flush()
}

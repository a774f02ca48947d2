use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::portwatch::ExportFormat;
use chrono::Local;
use serde::Serialize;

pub type CsvWriter<T> = fn(&mut dyn Write, &[T]) -> io::Result<()>;

/// Writes any serializable entries to a JSON/YAML/CSV file under `<base_dir>/snapshots`.
pub fn export_to_file<T: Serialize>(
    data: &[T],
    format: ExportFormat,
    file_prefix: &str,
    base_dir: &Path,
    write_csv_fn: CsvWriter<T>,
) -> io::Result<PathBuf> {
    let snapshots_dir = base_dir.join("snapshots");
    std::fs::create_dir_all(&snapshots_dir)?;

    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let filename = format!("{file_prefix}-{ts}.{}", format.extension());
    let path = snapshots_dir.join(filename);
    let mut file = File::create(&path)?;

    write_to(&mut file, data, format, write_csv_fn)?;
    tracing::info!(path = %path.display(), ?format, "exported {file_prefix}");

    Ok(path)
}

/// Serializes `data` in the given format into any writer.
pub fn write_to<T: Serialize>(
    out: &mut dyn Write,
    data: &[T],
    format: ExportFormat,
    write_csv_fn: CsvWriter<T>,
) -> io::Result<()> {
    match format {
        ExportFormat::Csv => write_csv_fn(out, data),
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
            out.write_all(json.as_bytes())?;
            out.write_all(b"\n")
        }
        ExportFormat::Yaml => {
            let yaml = serde_yaml::to_string(data).map_err(io::Error::other)?;
            out.write_all(yaml.as_bytes())
        }
    }
}

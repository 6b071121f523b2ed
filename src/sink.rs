use crate::error::SinkError;
use crate::results::Record;
use std::fs;
use std::path::Path;

/// Write `records` to `path` as CSV: header row of `columns`, one row per record.
///
/// The parent directory is created if needed. Returns the number of data rows.
pub fn write_csv(columns: &[String], records: &[Record], path: &Path) -> Result<usize, SinkError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_err = |source: csv::Error| SinkError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(columns).map_err(csv_err)?;
    for record in records {
        writer.write_record(record.values()).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| SinkError::Flush {
        path: path.to_path_buf(),
        source,
    })?;

    ::log::debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(records.len())
}

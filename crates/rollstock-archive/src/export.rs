// SPDX-License-Identifier: Apache-2.0

use crate::ArchiveError;
use chrono::{DateTime, Local};
use rollstock_model::{RollField, RollRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the export artifact for `rows` into `dir` (created on demand) and
/// returns its final path. The file is written under a `.tmp` name and
/// renamed into place only once complete, so a partial artifact is never
/// visible under the final name. An existing artifact with the same
/// second-resolution timestamp is refused rather than overwritten.
pub fn write_export(dir: &Path, rows: &[RollRecord]) -> Result<PathBuf, ArchiveError> {
    fs::create_dir_all(dir).map_err(|e| io_error("create export dir", &e))?;

    let name = export_file_name(&Local::now());
    let final_path = dir.join(&name);
    if final_path.exists() {
        return Err(ArchiveError::ExportIo(format!(
            "export artifact {} already exists; retry after the current second",
            final_path.display()
        )));
    }

    let tmp_path = dir.join(format!("{name}.tmp"));
    if let Err(err) = write_rows(&tmp_path, rows) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    if let Err(e) = fs::rename(&tmp_path, &final_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error("publish export artifact", &e));
    }
    Ok(final_path)
}

#[must_use]
pub fn export_file_name(now: &DateTime<Local>) -> String {
    format!("export_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn write_rows(path: &Path, rows: &[RollRecord]) -> Result<(), ArchiveError> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| csv_error("open export artifact", &e))?;
    writer
        .write_record(RollField::ALL.iter().map(|field| field.column()))
        .map_err(|e| csv_error("write export header", &e))?;
    for row in rows {
        writer
            .write_record(RollField::ALL.iter().map(|field| field.value_in(row)))
            .map_err(|e| csv_error("write export row", &e))?;
    }
    writer
        .flush()
        .map_err(|e| io_error("flush export artifact", &e))?;
    Ok(())
}

fn io_error(context: &str, err: &std::io::Error) -> ArchiveError {
    ArchiveError::ExportIo(format!("{context}: {err}"))
}

fn csv_error(context: &str, err: &csv::Error) -> ArchiveError {
    ArchiveError::ExportIo(format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_embeds_second_resolution_timestamp() {
        let ts = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 59).unwrap();
        assert_eq!(export_file_name(&ts), "export_20240301_143059.csv");
    }
}

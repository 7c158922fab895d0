// SPDX-License-Identifier: Apache-2.0

//! The archival transaction: export the selected records to a durable CSV
//! artifact, then move them from the live table to history. Export runs
//! first so the artifact always reflects the pre-migration state and is
//! never lost, even when the database-side step fails.

#![forbid(unsafe_code)]

mod export;

pub use export::{export_file_name, write_export};

use rollstock_model::{RollId, RollRecord};
use rollstock_store::{RollStore, StoreError};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// The slice of the record store the archival transaction needs. Narrow on
/// purpose: tests drive the failure paths with faulty implementations.
pub trait ArchiveStore {
    fn get_by_ids(&self, ids: &[RollId]) -> Result<Vec<RollRecord>, StoreError>;
    fn archive(&mut self, ids: &[RollId]) -> Result<usize, StoreError>;
}

impl ArchiveStore for RollStore {
    fn get_by_ids(&self, ids: &[RollId]) -> Result<Vec<RollRecord>, StoreError> {
        RollStore::get_by_ids(self, ids)
    }

    fn archive(&mut self, ids: &[RollId]) -> Result<usize, StoreError> {
        RollStore::archive(self, ids)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArchiveError {
    /// Caller-level precondition failure: the selection resolved to nothing.
    /// No side effect was performed.
    NothingSelected,
    /// The artifact could not be written. The store was not touched.
    ExportIo(String),
    /// The store failed. When `export_path` is set, the artifact was already
    /// written and is kept; the caller can retry the migration step without
    /// re-exporting.
    Storage {
        message: String,
        export_path: Option<PathBuf>,
    },
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingSelected => f.write_str("nothing selected"),
            Self::ExportIo(msg) => write!(f, "export failed: {msg}"),
            Self::Storage {
                message,
                export_path: Some(path),
            } => write!(
                f,
                "migration to history failed after export: {message} (artifact kept at {})",
                path.display()
            ),
            Self::Storage { message, .. } => write!(f, "storage: {message}"),
        }
    }
}

impl std::error::Error for ArchiveError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub export_path: PathBuf,
    pub archived: usize,
}

/// Resolves the selection, writes the export artifact, and only then asks the
/// store to move the records to history. Ordering and failure policy:
///
/// 1. empty or unresolvable selection → [`ArchiveError::NothingSelected`],
///    zero side effects;
/// 2. export failure aborts before any store mutation;
/// 3. store failure after a successful export keeps the artifact on disk and
///    reports its path.
pub fn export_and_archive<S: ArchiveStore>(
    store: &mut S,
    ids: &[RollId],
    export_dir: &Path,
) -> Result<ArchiveOutcome, ArchiveError> {
    if ids.is_empty() {
        return Err(ArchiveError::NothingSelected);
    }
    let rows = store.get_by_ids(ids).map_err(|e| ArchiveError::Storage {
        message: e.to_string(),
        export_path: None,
    })?;
    if rows.is_empty() {
        return Err(ArchiveError::NothingSelected);
    }

    let export_path = write_export(export_dir, &rows)?;
    tracing::info!(path = %export_path.display(), rows = rows.len(), "export artifact written");

    let archived = store.archive(ids).map_err(|e| ArchiveError::Storage {
        message: e.to_string(),
        export_path: Some(export_path.clone()),
    })?;
    tracing::info!(archived, "records moved to history");

    Ok(ArchiveOutcome {
        export_path,
        archived,
    })
}

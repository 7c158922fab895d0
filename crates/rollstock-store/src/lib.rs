// SPDX-License-Identifier: Apache-2.0

//! SQLite-backed record store for live and historical rolls. The sole
//! reader/writer of the production database file; every mutating operation
//! commits or rolls back before returning.

#![forbid(unsafe_code)]

mod error;
mod schema;

pub use error::StoreError;

use chrono::Utc;
use rollstock_model::{ArchivedRoll, RollDraft, RollId, RollRecord};
use rollstock_query::{build_filter_sql, select_columns, FilterSpec};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RollStore {
    conn: Connection,
}

impl RollStore {
    /// Opens (creating on demand) the database at `path` and bootstraps the
    /// schema. Parent directories are created if missing.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Storage(e.to_string()))?;
            }
        }
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self { conn })
    }

    /// Validates the draft, assigns id and `created_at`, and inserts. The
    /// returned id comes from the live table's own sequence.
    pub fn create(&self, draft: &RollDraft) -> Result<RollId, StoreError> {
        let roll = draft.validate()?;
        let created_at = now_stamp();
        self.conn.execute(
            "INSERT INTO rolls (
               shift, width, diameter, basis_weight, net_weight, roll_number,
               sequence, work_order, production_date, quality_code,
               quality_description, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                roll.shift,
                roll.width,
                roll.diameter,
                roll.basis_weight,
                roll.net_weight,
                roll.roll_number,
                roll.sequence,
                roll.work_order,
                roll.production_date,
                roll.quality_code,
                roll.quality_description,
                created_at,
            ],
        )?;
        let id = RollId::new(self.conn.last_insert_rowid());
        tracing::debug!(id = %id, roll_number = %roll.roll_number, "roll created");
        Ok(id)
    }

    /// All live records, most recent first. The `id DESC` ordering is a
    /// contract, not an artifact.
    pub fn list_all(&self) -> Result<Vec<RollRecord>, StoreError> {
        let sql = format!("SELECT {} FROM rolls ORDER BY id DESC", select_columns());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], decode_roll)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Live records matching `ids`; unknown ids are silently omitted.
    pub fn get_by_ids(&self, ids: &[RollId]) -> Result<Vec<RollRecord>, StoreError> {
        let ids = dedupe(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM rolls WHERE id IN ({}) ORDER BY id DESC",
            select_columns(),
            placeholders(ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(ids.iter()), decode_roll)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Deletes matching live records inside one transaction and reports how
    /// many actually existed. Missing ids do not count and are not an error.
    pub fn delete(&mut self, ids: &[RollId]) -> Result<usize, StoreError> {
        let ids = dedupe(ids);
        if ids.is_empty() {
            return Err(StoreError::NothingSelected);
        }
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            &format!("DELETE FROM rolls WHERE id IN ({})", placeholders(ids.len())),
            params_from_iter(ids.iter()),
        )?;
        tx.commit()?;
        tracing::info!(requested = ids.len(), deleted, "rolls deleted");
        Ok(deleted)
    }

    /// Copies the matching live records into the history table (fresh history
    /// ids, `archived_at` stamped now) and removes them from the live table,
    /// all inside a single transaction. Any failure rolls the whole move back.
    pub fn archive(&mut self, ids: &[RollId]) -> Result<usize, StoreError> {
        let ids = dedupe(ids);
        if ids.is_empty() {
            return Err(StoreError::NothingSelected);
        }
        let archived_at = now_stamp();
        let tx = self.conn.transaction()?;
        let moved = {
            let select = format!(
                "SELECT {} FROM rolls WHERE id IN ({}) ORDER BY id DESC",
                select_columns(),
                placeholders(ids.len())
            );
            let mut stmt = tx.prepare(&select)?;
            let rows = stmt
                .query_map(params_from_iter(ids.iter()), decode_roll)?
                .collect::<Result<Vec<_>, _>>()?;

            let mut insert = tx.prepare(
                "INSERT INTO rolls_history (
                   shift, width, diameter, basis_weight, net_weight, roll_number,
                   sequence, work_order, production_date, quality_code,
                   quality_description, created_at, archived_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for roll in &rows {
                insert.execute(params![
                    roll.shift,
                    roll.width,
                    roll.diameter,
                    roll.basis_weight,
                    roll.net_weight,
                    roll.roll_number,
                    roll.sequence,
                    roll.work_order,
                    roll.production_date,
                    roll.quality_code,
                    roll.quality_description,
                    roll.created_at,
                    archived_at,
                ])?;
            }

            let deleted = tx.execute(
                &format!("DELETE FROM rolls WHERE id IN ({})", placeholders(ids.len())),
                params_from_iter(ids.iter()),
            )?;
            if deleted != rows.len() {
                // Dropping the uncommitted transaction rolls everything back.
                return Err(StoreError::Storage(format!(
                    "archive moved {} rows but deleted {deleted}",
                    rows.len()
                )));
            }
            rows.len()
        };
        tx.commit()?;
        tracing::info!(moved, "rolls archived to history");
        Ok(moved)
    }

    /// Evaluates the filter against current committed state. Delegates SQL
    /// construction to the filter engine; an empty spec is `list_all`.
    pub fn filter(&self, spec: &FilterSpec) -> Result<Vec<RollRecord>, StoreError> {
        let (sql, params) = build_filter_sql(spec);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), decode_roll)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Archived copies, most recently archived first.
    pub fn history(&self) -> Result<Vec<ArchivedRoll>, StoreError> {
        let sql = format!(
            "SELECT {}, archived_at FROM rolls_history ORDER BY id DESC",
            select_columns()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], decode_archived)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Test hook: raw access for fault injection and fixture setup.
    #[doc(hidden)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn decode_roll(row: &Row<'_>) -> rusqlite::Result<RollRecord> {
    Ok(RollRecord {
        id: RollId::new(row.get(0)?),
        shift: row.get(1)?,
        width: row.get(2)?,
        diameter: row.get(3)?,
        basis_weight: row.get(4)?,
        net_weight: row.get(5)?,
        roll_number: row.get(6)?,
        sequence: row.get(7)?,
        work_order: row.get(8)?,
        production_date: row.get(9)?,
        quality_code: row.get(10)?,
        quality_description: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn decode_archived(row: &Row<'_>) -> rusqlite::Result<ArchivedRoll> {
    Ok(ArchivedRoll {
        id: RollId::new(row.get(0)?),
        shift: row.get(1)?,
        width: row.get(2)?,
        diameter: row.get(3)?,
        basis_weight: row.get(4)?,
        net_weight: row.get(5)?,
        roll_number: row.get(6)?,
        sequence: row.get(7)?,
        work_order: row.get(8)?,
        production_date: row.get(9)?,
        quality_code: row.get(10)?,
        quality_description: row.get(11)?,
        created_at: row.get(12)?,
        archived_at: row.get(13)?,
    })
}

fn dedupe(ids: &[RollId]) -> Vec<i64> {
    ids.iter()
        .map(|id| id.get())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// SPDX-License-Identifier: Apache-2.0

/// Bootstrap DDL, applied on every open. `roll_number` is deliberately not
/// UNIQUE: duplicate roll numbers are a soft constraint in the deployments
/// this serves. The history table has its own id sequence; archived rows do
/// not keep their live id.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rolls (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  shift TEXT NOT NULL,
  width REAL NOT NULL,
  diameter REAL NOT NULL,
  basis_weight REAL NOT NULL,
  net_weight REAL NOT NULL,
  roll_number TEXT NOT NULL,
  sequence TEXT,
  work_order TEXT NOT NULL,
  production_date TEXT NOT NULL,
  quality_code TEXT,
  quality_description TEXT,
  created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS rolls_history (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  shift TEXT NOT NULL,
  width REAL NOT NULL,
  diameter REAL NOT NULL,
  basis_weight REAL NOT NULL,
  net_weight REAL NOT NULL,
  roll_number TEXT NOT NULL,
  sequence TEXT,
  work_order TEXT NOT NULL,
  production_date TEXT NOT NULL,
  quality_code TEXT,
  quality_description TEXT,
  created_at TEXT NOT NULL,
  archived_at TEXT NOT NULL
);
";

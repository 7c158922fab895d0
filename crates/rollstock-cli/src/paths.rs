// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

pub const ENV_ROLLSTOCK_DATA_DIR: &str = "ROLLSTOCK_DATA_DIR";
pub const ENV_ROLLSTOCK_LOG: &str = "ROLLSTOCK_LOG";

/// Data directory resolution order: explicit env override, XDG data home,
/// the conventional home fallback, then a directory next to the process.
#[must_use]
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(explicit) = std::env::var(ENV_ROLLSTOCK_DATA_DIR) {
        let trimmed = explicit.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        let trimmed = xdg_data_home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed).join("rollstock");
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed)
                .join(".local")
                .join("share")
                .join("rollstock");
        }
    }

    PathBuf::from("rollstock-data")
}

#[must_use]
pub fn db_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("production.db")
}

#[must_use]
pub fn export_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("exports")
}

#[must_use]
pub fn credentials_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("credentials.json")
}

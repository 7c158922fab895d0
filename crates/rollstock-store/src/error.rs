// SPDX-License-Identifier: Apache-2.0

use rollstock_model::ValidationError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// Boundary rejection; no partial record was created.
    Validation(ValidationError),
    /// Empty id set passed to a mutating operation. Reported distinctly so
    /// callers can message it without implying a storage fault.
    NothingSelected,
    /// Underlying SQLite fault. Write paths roll back before surfacing this.
    Storage(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation: {err}"),
            Self::NothingSelected => f.write_str("nothing selected"),
            Self::Storage(msg) => write!(f, "storage: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

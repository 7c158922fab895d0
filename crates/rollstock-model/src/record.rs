// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifier of a live roll record. Assigned by the store, never by callers.
///
/// Historical rows carry ids from an independent identity space; a `RollId`
/// read from the history table must not be used against the live table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RollId(i64);

impl RollId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for RollId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RollId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// One physical produced roll, as stored in the live table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    pub id: RollId,
    pub shift: String,
    pub width: f64,
    pub diameter: f64,
    pub basis_weight: f64,
    pub net_weight: f64,
    pub roll_number: String,
    pub sequence: Option<String>,
    pub work_order: String,
    pub production_date: String,
    pub quality_code: Option<String>,
    pub quality_description: Option<String>,
    pub created_at: String,
}

/// A roll copied into the append-only history table. The id belongs to the
/// history table's own sequence, not to the live table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedRoll {
    pub id: RollId,
    pub shift: String,
    pub width: f64,
    pub diameter: f64,
    pub basis_weight: f64,
    pub net_weight: f64,
    pub roll_number: String,
    pub sequence: Option<String>,
    pub work_order: String,
    pub production_date: String,
    pub quality_code: Option<String>,
    pub quality_description: Option<String>,
    pub created_at: String,
    pub archived_at: String,
}

/// Raw record input as collected at the boundary (form fields, CLI flags).
/// All values are untrusted text until `validate` has run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDraft {
    pub shift: String,
    pub width: String,
    pub diameter: String,
    pub basis_weight: String,
    pub net_weight: String,
    pub roll_number: String,
    pub sequence: Option<String>,
    pub work_order: String,
    pub production_date: String,
    pub quality_code: Option<String>,
    pub quality_description: Option<String>,
}

/// A draft that passed validation; numeric fields are parsed, required text
/// fields are non-empty. Still lacks the store-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoll {
    pub shift: String,
    pub width: f64,
    pub diameter: f64,
    pub basis_weight: f64,
    pub net_weight: f64,
    pub roll_number: String,
    pub sequence: Option<String>,
    pub work_order: String,
    pub production_date: String,
    pub quality_code: Option<String>,
    pub quality_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    MissingField(&'static str),
    InvalidNumber { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "{name} is required"),
            Self::InvalidNumber { field, value } => {
                write!(f, "{field} must be a decimal number, got {value:?}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl RollDraft {
    /// Checks required fields and parses the measurement columns. Numeric
    /// fields must be finite decimals; anything else is rejected here so the
    /// store never persists non-numeric text in a numeric column.
    pub fn validate(&self) -> Result<NewRoll, ValidationError> {
        Ok(NewRoll {
            shift: required_text("shift", &self.shift)?,
            width: required_number("width", &self.width)?,
            diameter: required_number("diameter", &self.diameter)?,
            basis_weight: required_number("basis_weight", &self.basis_weight)?,
            net_weight: required_number("net_weight", &self.net_weight)?,
            roll_number: required_text("roll_number", &self.roll_number)?,
            sequence: optional_text(self.sequence.as_deref()),
            work_order: required_text("work_order", &self.work_order)?,
            production_date: required_text("production_date", &self.production_date)?,
            quality_code: optional_text(self.quality_code.as_deref()),
            quality_description: optional_text(self.quality_description.as_deref()),
        })
    }
}

fn required_text(name: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    Ok(trimmed.to_string())
}

fn required_number(name: &'static str, value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ValidationError::InvalidNumber {
            field: name,
            value: value.to_string(),
        }),
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RollDraft {
        RollDraft {
            shift: "A".to_string(),
            width: "125.0".to_string(),
            diameter: "90".to_string(),
            basis_weight: "80.5".to_string(),
            net_weight: "1450".to_string(),
            roll_number: "R-001".to_string(),
            sequence: Some("1".to_string()),
            work_order: "85500".to_string(),
            production_date: "2024-03-01".to_string(),
            quality_code: None,
            quality_description: None,
        }
    }

    #[test]
    fn valid_draft_parses_measurements() {
        let roll = draft().validate().expect("valid draft");
        assert_eq!(roll.width, 125.0);
        assert_eq!(roll.net_weight, 1450.0);
        assert_eq!(roll.sequence.as_deref(), Some("1"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut d = draft();
        d.work_order = "   ".to_string();
        assert_eq!(
            d.validate().expect_err("blank work_order"),
            ValidationError::MissingField("work_order")
        );
    }

    #[test]
    fn non_numeric_measurement_is_rejected() {
        let mut d = draft();
        d.width = "wide".to_string();
        let err = d.validate().expect_err("non-numeric width");
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                field: "width",
                value: "wide".to_string()
            }
        );
    }

    #[test]
    fn non_finite_measurement_is_rejected() {
        let mut d = draft();
        d.diameter = "inf".to_string();
        assert!(matches!(
            d.validate().expect_err("infinite diameter"),
            ValidationError::InvalidNumber { field: "diameter", .. }
        ));
    }

    #[test]
    fn blank_optionals_collapse_to_none() {
        let mut d = draft();
        d.quality_code = Some("  ".to_string());
        let roll = d.validate().expect("valid draft");
        assert_eq!(roll.quality_code, None);
    }
}

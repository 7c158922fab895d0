// SPDX-License-Identifier: Apache-2.0

use crate::record::RollRecord;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Typed selector over the columns of a roll record. The order of
/// [`RollField::ALL`] is the canonical column order for projections and for
/// the export artifact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RollField {
    Id,
    Shift,
    Width,
    Diameter,
    BasisWeight,
    NetWeight,
    RollNumber,
    Sequence,
    WorkOrder,
    ProductionDate,
    QualityCode,
    QualityDescription,
    CreatedAt,
}

impl RollField {
    pub const ALL: [Self; 13] = [
        Self::Id,
        Self::Shift,
        Self::Width,
        Self::Diameter,
        Self::BasisWeight,
        Self::NetWeight,
        Self::RollNumber,
        Self::Sequence,
        Self::WorkOrder,
        Self::ProductionDate,
        Self::QualityCode,
        Self::QualityDescription,
        Self::CreatedAt,
    ];

    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Shift => "shift",
            Self::Width => "width",
            Self::Diameter => "diameter",
            Self::BasisWeight => "basis_weight",
            Self::NetWeight => "net_weight",
            Self::RollNumber => "roll_number",
            Self::Sequence => "sequence",
            Self::WorkOrder => "work_order",
            Self::ProductionDate => "production_date",
            Self::QualityCode => "quality_code",
            Self::QualityDescription => "quality_description",
            Self::CreatedAt => "created_at",
        }
    }

    /// Numeric columns filter by exact equality and sort numerically.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Id | Self::Width | Self::Diameter | Self::BasisWeight | Self::NetWeight
        )
    }

    /// The field's value in `record`, rendered as display text. Missing
    /// optionals render as the empty string.
    #[must_use]
    pub fn value_in(self, record: &RollRecord) -> String {
        match self {
            Self::Id => record.id.to_string(),
            Self::Shift => record.shift.clone(),
            Self::Width => record.width.to_string(),
            Self::Diameter => record.diameter.to_string(),
            Self::BasisWeight => record.basis_weight.to_string(),
            Self::NetWeight => record.net_weight.to_string(),
            Self::RollNumber => record.roll_number.clone(),
            Self::Sequence => record.sequence.clone().unwrap_or_default(),
            Self::WorkOrder => record.work_order.clone(),
            Self::ProductionDate => record.production_date.clone(),
            Self::QualityCode => record.quality_code.clone().unwrap_or_default(),
            Self::QualityDescription => {
                record.quality_description.clone().unwrap_or_default()
            }
            Self::CreatedAt => record.created_at.clone(),
        }
    }
}

impl Display for RollField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl Display for UnknownField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown field {:?}", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for RollField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

// SPDX-License-Identifier: Apache-2.0

use rollstock_model::RollField;
use rusqlite::types::Value;
use std::collections::BTreeMap;

/// A set of per-field constraints, AND-combined. Empty values never enter the
/// map, so an empty spec means "all records".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    entries: BTreeMap<RollField, String>,
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint for `field`. Blank input is ignored, matching the
    /// "empty filter box imposes no constraint" rule.
    pub fn set(&mut self, field: RollField, raw: impl Into<String>) {
        let raw = raw.into();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            self.entries.insert(field, trimmed.to_string());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (RollField, &str)> {
        self.entries.iter().map(|(field, raw)| (*field, raw.as_str()))
    }
}

/// The canonical projection over the live table, in [`RollField::ALL`] order.
#[must_use]
pub fn select_columns() -> String {
    RollField::ALL
        .iter()
        .map(|field| field.column())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compiles a filter spec into a parameterized SELECT over the live table.
///
/// Text fields match by case-insensitive substring containment; numeric
/// fields require exact equality after parsing the raw value. A numeric
/// constraint whose value does not parse is dropped, it neither errors nor
/// matches everything on its own. Result order is `id DESC`, which is a
/// contract shared with `list_all`.
#[must_use]
pub fn build_filter_sql(spec: &FilterSpec) -> (String, Vec<Value>) {
    let mut sql = format!("SELECT {} FROM rolls", select_columns());
    let mut where_parts: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    for (field, raw) in spec.entries() {
        if field == RollField::Id {
            match raw.parse::<i64>() {
                Ok(id) => {
                    where_parts.push("id = ?".to_string());
                    params.push(Value::Integer(id));
                }
                Err(_) => {
                    tracing::debug!(field = %field, value = raw, "dropping unparseable id filter");
                }
            }
        } else if field.is_numeric() {
            match raw.parse::<f64>() {
                Ok(number) if number.is_finite() => {
                    where_parts.push(format!("{} = ?", field.column()));
                    params.push(Value::Real(number));
                }
                _ => {
                    tracing::debug!(field = %field, value = raw, "dropping unparseable numeric filter");
                }
            }
        } else {
            where_parts.push(format!("LOWER({}) LIKE ? ESCAPE '!'", field.column()));
            params.push(Value::Text(format!(
                "%{}%",
                escape_like(&raw.to_lowercase())
            )));
        }
    }

    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    sql.push_str(" ORDER BY id DESC");

    (sql, params)
}

fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_selects_everything_id_desc() {
        let (sql, params) = build_filter_sql(&FilterSpec::new());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY id DESC"));
        assert!(params.is_empty());
    }

    #[test]
    fn blank_values_impose_no_constraint() {
        let mut spec = FilterSpec::new();
        spec.set(RollField::WorkOrder, "   ");
        assert!(spec.is_empty());
    }

    #[test]
    fn text_field_compiles_to_lowered_substring_match() {
        let mut spec = FilterSpec::new();
        spec.set(RollField::WorkOrder, "85%5");
        let (sql, params) = build_filter_sql(&spec);
        assert!(sql.contains("LOWER(work_order) LIKE ? ESCAPE '!'"));
        assert_eq!(params, vec![Value::Text("%85!%5%".to_string())]);
    }

    #[test]
    fn numeric_field_compiles_to_exact_equality() {
        let mut spec = FilterSpec::new();
        spec.set(RollField::Width, "125.0");
        let (sql, params) = build_filter_sql(&spec);
        assert!(sql.contains("width = ?"));
        assert_eq!(params, vec![Value::Real(125.0)]);
    }

    #[test]
    fn unparseable_numeric_filter_is_dropped_not_errored() {
        let mut spec = FilterSpec::new();
        spec.set(RollField::Width, "wide");
        spec.set(RollField::Shift, "A");
        let (sql, params) = build_filter_sql(&spec);
        assert!(!sql.contains("width = ?"));
        assert!(sql.contains("LOWER(shift) LIKE ?"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn id_filter_parses_as_integer() {
        let mut spec = FilterSpec::new();
        spec.set(RollField::Id, "42");
        let (sql, params) = build_filter_sql(&spec);
        assert!(sql.contains("id = ?"));
        assert_eq!(params, vec![Value::Integer(42)]);
    }

    #[test]
    fn constraints_are_and_combined() {
        let mut spec = FilterSpec::new();
        spec.set(RollField::WorkOrder, "855");
        spec.set(RollField::Shift, "a");
        let (sql, params) = build_filter_sql(&spec);
        assert!(sql.contains(" AND "));
        assert_eq!(params.len(), 2);
    }
}

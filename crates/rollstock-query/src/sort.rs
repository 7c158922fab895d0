// SPDX-License-Identifier: Apache-2.0

use rollstock_model::{RollField, RollRecord};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Orders an in-memory batch by one field. Values that parse as numbers sort
/// numerically and come before values that do not, which sort
/// case-insensitively as text; missing optionals compare as the empty string
/// (text class). Classifying each value on its own keeps the order total even
/// when a field mixes numeric and free-form entries. The sort is stable, so
/// repeated invocations on an already-ordered batch keep ties in their prior
/// relative order. Display concern only; the store's own `id DESC` contract
/// is unaffected.
pub fn sort_records(records: &mut [RollRecord], field: RollField, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare_values(&field.value_in(a), &field.value_in(b));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(left), Ok(right)) => left.total_cmp(&right),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

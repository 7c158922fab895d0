// SPDX-License-Identifier: Apache-2.0

//! Compiles multi-field filter specs into parameterized SQL and orders
//! fetched record batches. This crate never opens a connection; execution
//! belongs to the store.

#![forbid(unsafe_code)]

mod filter;
mod sort;

pub use filter::{build_filter_sql, select_columns, FilterSpec};
pub use sort::{sort_records, SortDirection};

// SPDX-License-Identifier: Apache-2.0

//! Record types and boundary validation for roll ("bobina") production data.

#![forbid(unsafe_code)]

mod field;
mod record;

pub use field::{RollField, UnknownField};
pub use record::{ArchivedRoll, NewRoll, RollDraft, RollId, RollRecord, ValidationError};

//! Totals engine API.
//!
//! This module provides the computation behind every table recalculation:
//!
//! - [`parse_number`] - Lenient cell value parsing (invalid input counts as zero)
//! - [`Totals`], [`ColumnMap`] - Row/column/grand accumulation with column alignment checks
//! - [`TotalFormat`], [`to_fixed`] - Display formatting of totals

mod format;
mod number;
mod totals;

pub use format::{HOURS_PER_PERSON_MONTH, TotalFormat, ZeroDisplay, person_months, to_fixed};
pub use number::parse_number;
pub use totals::{ColumnMap, ColumnMismatch, Totals};

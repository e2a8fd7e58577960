//! Row, column and grand totals for one table pass.
//!
//! A table pass pushes each row's values in order. Values are keyed by their
//! position within the row: position `i` of every row lands in column `i`.
//! A [`ColumnMap`] declares how many columns the table's headers promise so
//! that rows which drifted out of alignment are reported instead of silently
//! summed into the wrong column.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A row whose cell count disagrees with the declared columns.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("row {row} has {found} cells but {expected} columns are declared")]
pub struct ColumnMismatch {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// Declared column layout of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    declared: Option<usize>,
}

impl ColumnMap {
    /// Columns declared by `count` headers.
    pub fn declared(count: usize) -> ColumnMap {
        ColumnMap {
            declared: Some(count),
        }
    }

    /// Columns declared by a table's header cells. A table without headers
    /// declares nothing.
    pub fn from_headers(count: usize) -> ColumnMap {
        if count == 0 {
            ColumnMap::undeclared()
        } else {
            ColumnMap::declared(count)
        }
    }

    /// No header declares the columns; any row width is accepted.
    pub fn undeclared() -> ColumnMap {
        ColumnMap { declared: None }
    }

    pub fn width(&self) -> Option<usize> {
        self.declared
    }

    /// Check a row's cell count against the declared columns.
    pub fn check(&self, row: usize, found: usize) -> Result<(), ColumnMismatch> {
        match self.declared {
            Some(expected) if expected != found => Err(ColumnMismatch {
                row,
                expected,
                found,
            }),
            _ => Ok(()),
        }
    }
}

/// Accumulated totals of a table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    map: ColumnMap,
    rows: Vec<f64>,
    columns: Vec<f64>,
    grand: f64,
    mismatches: Vec<ColumnMismatch>,
}

impl Totals {
    pub fn new(map: ColumnMap) -> Totals {
        Totals {
            map,
            rows: Vec::new(),
            columns: vec![0.0; map.width().unwrap_or(0)],
            grand: 0.0,
            mismatches: Vec::new(),
        }
    }

    /// Add one row and return its total.
    ///
    /// Misaligned rows are recorded in [`Totals::mismatches`] and still summed
    /// by position, so the grand total always agrees with both the row and the
    /// column totals.
    ///
    /// A sum that overflows reads as `0`, like an unparseable cell does.
    pub fn push_row<I>(&mut self, values: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut row_total = 0.0;
        let mut count = 0;
        for (index, value) in values.into_iter().enumerate() {
            if index >= self.columns.len() {
                self.columns.resize(index + 1, 0.0);
            }
            self.columns[index] = finite_or_zero(self.columns[index] + value);
            row_total += value;
            count += 1;
        }
        let row_total = finite_or_zero(row_total);

        if let Err(mismatch) = self.map.check(self.rows.len(), count) {
            self.mismatches.push(mismatch);
        }
        self.rows.push(row_total);
        self.grand = finite_or_zero(self.grand + row_total);
        row_total
    }

    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    pub fn columns(&self) -> &[f64] {
        &self.columns
    }

    /// Total of column `index`; columns no row reached read as `0`.
    pub fn column(&self, index: usize) -> f64 {
        self.columns.get(index).copied().unwrap_or(0.0)
    }

    pub fn grand(&self) -> f64 {
        self.grand
    }

    pub fn mismatches(&self) -> &[ColumnMismatch] {
        &self.mismatches
    }

    /// Largest disagreement between the grand total and the sums of row and
    /// column totals. Zero up to floating point noise.
    pub fn balance_error(&self) -> f64 {
        let by_rows: f64 = self.rows.iter().sum();
        let by_columns: f64 = self.columns.iter().sum();
        (self.grand - by_rows).abs().max((self.grand - by_columns).abs())
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

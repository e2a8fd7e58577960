//! Estimate total: the sum of every line item's hours.
//!
//! In edit mode a line item exposes an hours input; in view mode only the
//! rendered hours cell is there, and its text is summed instead.

use worktally_engine::engine::{TotalFormat, parse_number};

use super::{Outcome, Writes};
use crate::document::{Document, NodeId};
use crate::markers::EstimateSelectors;

/// `0.00` is a legitimate estimate, so zero is shown as is.
const TOTAL: TotalFormat = TotalFormat::new(2, "");

pub(super) fn recalculate(doc: &mut Document, table: NodeId, markers: &EstimateSelectors) -> Outcome {
    let mut total = 0.0;
    for row in doc.query_all(table, &markers.row) {
        if let Some(input) = doc.query(row, &markers.input) {
            total += parse_number(doc.value(input).unwrap_or(""));
        } else if let Some(cell) = doc.query(row, &markers.display) {
            total += parse_number(&doc.text_content(cell));
        }
    }

    let mut writes = Writes::default();
    if let Some(total_row) = doc.query(table, &markers.total_row) {
        let slot = doc
            .query_all(total_row, &markers.total_cell)
            .get(markers.total_cell_index)
            .copied();
        writes.put(doc, slot, TOTAL.render(total), "total");
    }

    Outcome::Updated {
        writes: writes.count,
        mismatches: Vec::new(),
    }
}

//! Work log totals: hours per task row, per date column, and overall.

use tracing::warn;
use worktally_engine::engine::{ColumnMap, TotalFormat, Totals, ZeroDisplay, parse_number};

use super::{Outcome, Writes};
use crate::document::{Document, NodeId};
use crate::markers::WorkLogSelectors;

const ROW_TOTAL: TotalFormat = TotalFormat::new(2, "h").with_zero(ZeroDisplay::Dash);
const COLUMN_TOTAL: TotalFormat = TotalFormat::new(2, "").with_zero(ZeroDisplay::Dash);
/// Always shown, even when nothing was logged.
const GRAND_TOTAL: TotalFormat = TotalFormat::new(2, "h");

pub(super) fn recalculate(doc: &mut Document, table: NodeId, markers: &WorkLogSelectors) -> Outcome {
    let headers = doc.query_all(table, &markers.date_header).len();
    let mut totals = Totals::new(ColumnMap::from_headers(headers));
    let mut writes = Writes::default();

    for row in doc.query_all(table, &markers.row) {
        let values: Vec<f64> = doc
            .query_all(row, &markers.input)
            .into_iter()
            .map(|input| parse_number(doc.value(input).unwrap_or("")))
            .collect();
        let row_total = totals.push_row(values);

        let slot = doc.query(row, &markers.row_total);
        writes.put(doc, slot, ROW_TOTAL.render(row_total), "row_total");
    }

    for mismatch in totals.mismatches() {
        warn!(table = "work_log", %mismatch, "inputs do not line up with date headers");
    }

    if let Some(total_row) = doc.query(table, &markers.total_row) {
        let cells = doc.query_all(total_row, &markers.column_total);
        for (index, cell) in cells.into_iter().enumerate() {
            writes.put(doc, Some(cell), COLUMN_TOTAL.render(totals.column(index)), "column_total");
        }
        let slot = doc.query(total_row, &markers.grand_total);
        writes.put(doc, slot, GRAND_TOTAL.render(totals.grand()), "grand_total");
    }

    Outcome::Updated {
        writes: writes.count,
        mismatches: totals.mismatches().to_vec(),
    }
}

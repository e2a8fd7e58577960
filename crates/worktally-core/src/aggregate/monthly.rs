//! Monthly assignment totals: planned hours per user, per project, overall.

use tracing::{debug, warn};
use worktally_engine::engine::{
    ColumnMap, TotalFormat, Totals, ZeroDisplay, parse_number, person_months,
};

use super::{Outcome, SkipReason, Writes};
use crate::document::{Document, NodeId};
use crate::markers::MonthlySelectors;

const ROW_HOURS: TotalFormat = TotalFormat::new(1, "h").with_zero(ZeroDisplay::Dash);
const ROW_PERSON_MONTHS: TotalFormat = TotalFormat::new(2, "MM").with_zero(ZeroDisplay::Blank);
const COLUMN_TOTAL: TotalFormat = TotalFormat::new(1, "h").with_zero(ZeroDisplay::Dash);
const GRAND_TOTAL: TotalFormat = TotalFormat::new(1, "h").with_zero(ZeroDisplay::Dash);

pub(super) fn recalculate(doc: &mut Document, table: NodeId, markers: &MonthlySelectors) -> Outcome {
    // Detailed mode shows planned/actual figures only the server can compute.
    if doc.query(table, &markers.detailed_mode).is_some() {
        debug!("monthly assignment table is in detailed mode, leaving totals as rendered");
        return Outcome::Skipped(SkipReason::DetailedMode);
    }

    let total_row = doc.query(table, &markers.total_row);
    let column_cells = total_row
        .map(|row| doc.query_all(row, &markers.column_total))
        .unwrap_or_default();
    let mut totals = Totals::new(ColumnMap::from_headers(column_cells.len()));
    let mut writes = Writes::default();

    for row in doc.query_all(table, &markers.row) {
        let values: Vec<f64> = doc
            .query_all(row, &markers.input)
            .into_iter()
            .map(|input| parse_number(doc.value(input).unwrap_or("")))
            .collect();
        let user_total = totals.push_row(values);

        let Some(cell) = doc.query(row, &markers.row_total) else {
            continue;
        };
        let hours = doc.query(cell, &markers.row_hours);
        let months = doc.query(cell, &markers.row_person_months);
        writes.put(doc, hours, ROW_HOURS.render(user_total), "row_hours");
        writes.put(
            doc,
            months,
            ROW_PERSON_MONTHS.render(person_months(user_total)),
            "row_person_months",
        );
    }

    for mismatch in totals.mismatches() {
        warn!(table = "monthly_assignment", %mismatch, "inputs do not line up with project totals");
    }

    if let Some(total_row) = total_row {
        for (index, cell) in column_cells.into_iter().enumerate() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;
    use crate::markers::CompiledMarkers;
    use worktally_engine::engine::ColumnMismatch;

    struct Month {
        doc: Document,
        table: NodeId,
        hours: Vec<NodeId>,
        months: Vec<NodeId>,
        columns: Vec<NodeId>,
        grand: NodeId,
    }

    fn month(values: &[&[&str]]) -> Month {
        let mut doc = Document::new();
        let width = values.first().map(|r| r.len()).unwrap_or(0);
        let table = doc.append(doc.root(), Element::new("table").class("assign-table"));
        let body = doc.append(table, Element::new("tbody"));

        let mut hours = Vec::new();
        let mut months = Vec::new();
        for row_values in values {
            let row = doc.append(body, Element::new("tr").class("user-row"));
            doc.append(row, Element::new("td").text("user"));
            for value in *row_values {
                let cell = doc.append(row, Element::new("td").class("assign-cell"));
                doc.append(cell, Element::input().class("assign-input").value(value));
            }
            let total = doc.append(row, Element::new("td").class("row-total"));
            hours.push(doc.append(total, Element::new("div").class("total-hours").text("stale")));
            months.push(doc.append(total, Element::new("div").class("total-mm").text("stale")));
        }

        let total_row = doc.append(body, Element::new("tr").class("total-row"));
        doc.append(total_row, Element::new("td").text("Total"));
        let columns = (0..width)
            .map(|_| doc.append(total_row, Element::new("td").class("col-total")))
            .collect();
        let grand = doc.append(total_row, Element::new("td").class("grand-total"));

        Month {
            doc,
            table,
            hours,
            months,
            columns,
            grand,
        }
    }

    fn run(m: &mut Month) -> Outcome {
        recalculate(&mut m.doc, m.table, &CompiledMarkers::default().monthly)
    }

    fn texts(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|&n| doc.text_content(n)).collect()
    }

    #[test]
    fn test_single_full_month() {
        let mut m = month(&[&["320"]]);
        run(&mut m);
        assert_eq!(texts(&m.doc, &m.hours), vec!["320.0h"]);
        assert_eq!(texts(&m.doc, &m.months), vec!["2.00MM"]);
        assert_eq!(texts(&m.doc, &m.columns), vec!["320.0h"]);
        assert_eq!(m.doc.text_content(m.grand), "320.0h");
    }

    #[test]
    fn test_zero_user_has_dash_and_blank() {
        let mut m = month(&[&["", "0"], &["40", "x"]]);
        run(&mut m);
        assert_eq!(texts(&m.doc, &m.hours), vec!["-", "40.0h"]);
        assert_eq!(texts(&m.doc, &m.months), vec!["", "0.25MM"]);
        assert_eq!(texts(&m.doc, &m.columns), vec!["40.0h", "-"]);
        assert_eq!(m.doc.text_content(m.grand), "40.0h");
    }

    #[test]
    fn test_empty_grand_total_shows_dash() {
        let mut m = month(&[&["", ""]]);
        run(&mut m);
        assert_eq!(m.doc.text_content(m.grand), "-");
    }

    #[test]
    fn test_quarter_hours_round_half_up() {
        let mut m = month(&[&["0.25", "0.5"]]);
        run(&mut m);
        assert_eq!(texts(&m.doc, &m.columns), vec!["0.3h", "0.5h"]);
        assert_eq!(texts(&m.doc, &m.hours), vec!["0.8h"]);
    }

    #[test]
    fn test_user_and_project_totals_balance() {
        let mut m = month(&[
            &["40", "80", "0.5", ""],
            &["", "120", "16", "24"],
            &["8", "", "", "152"],
        ]);
        run(&mut m);

        let sum = |nodes: &[NodeId]| -> f64 {
            texts(&m.doc, nodes).iter().map(|t| parse_number(t)).sum()
        };
        let grand = parse_number(&m.doc.text_content(m.grand));
        assert_eq!(texts(&m.doc, &m.hours), vec!["120.5h", "160.0h", "160.0h"]);
        assert_eq!(texts(&m.doc, &m.columns), vec!["48.0h", "200.0h", "16.5h", "176.0h"]);
        assert_eq!(m.doc.text_content(m.grand), "440.5h");
        assert_eq!(sum(&m.hours), grand);
        assert_eq!(sum(&m.columns), grand);
    }

    #[test]
    fn test_misaligned_user_is_reported_and_summed() {
        let mut m = month(&[&["10", "20"], &["5"]]);
        let outcome = run(&mut m);

        assert_eq!(texts(&m.doc, &m.hours), vec!["30.0h", "5.0h"]);
        assert_eq!(texts(&m.doc, &m.columns), vec!["15.0h", "20.0h"]);
        assert_eq!(m.doc.text_content(m.grand), "35.0h");
        match outcome {
            Outcome::Updated { mismatches, .. } => assert_eq!(
                mismatches,
                vec![ColumnMismatch { row: 1, expected: 2, found: 1 }]
            ),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_detailed_mode_writes_nothing() {
        let mut m = month(&[&["80", "80"]]);
        let row = m.doc.parent(m.doc.parent(m.hours[0]).unwrap()).unwrap();
        append_detailed_cell(&mut m.doc, row);

        let outcome = run(&mut m);
        assert_eq!(outcome, Outcome::Skipped(SkipReason::DetailedMode));
        assert_eq!(texts(&m.doc, &m.hours), vec!["stale"]);
        assert_eq!(texts(&m.doc, &m.months), vec!["stale"]);
        assert_eq!(texts(&m.doc, &m.columns), vec!["", ""]);
        assert_eq!(m.doc.text_content(m.grand), "");
    }

    fn append_detailed_cell(doc: &mut Document, row: NodeId) {
        doc.append(
            row,
            Element::new("td")
                .class("assign-cell")
                .style("padding: 4px 8px; vertical-align: top; min-width: 80px;"),
        );
    }

    #[test]
    fn test_row_total_without_sub_cells() {
        let mut m = month(&[&["16"]]);
        let months = m.months[0];
        m.doc.detach(months);
        let outcome = run(&mut m);
        assert_eq!(texts(&m.doc, &m.hours), vec!["16.0h"]);
        assert_eq!(
            outcome,
            Outcome::Updated {
                writes: 3,
                mismatches: vec![]
            }
        );
    }
}

//! Page builders mirroring the markup the server renders.

#![allow(dead_code)]

use worktally::{Document, Element, NodeId};

pub struct WorkLogPage {
    pub inputs: Vec<Vec<NodeId>>,
    pub row_totals: Vec<NodeId>,
    pub column_totals: Vec<NodeId>,
    pub grand_total: NodeId,
}

/// A week table: one `.log-row` per task, one `.log-input` per date.
pub fn work_log(doc: &mut Document, values: &[&[&str]]) -> WorkLogPage {
    let width = values.first().map(|r| r.len()).unwrap_or(0);
    let table = doc.append(doc.root(), Element::new("table").class("log-table week-table"));
    let head = doc.append(table, Element::new("thead"));
    let header = doc.append(head, Element::new("tr"));
    doc.append(header, Element::new("th").text("Task"));
    for day in 0..width {
        doc.append(
            header,
            Element::new("th")
                .class("date-header weekday-header")
                .text(&format!("10/{}", day + 1)),
        );
    }
    doc.append(header, Element::new("th").text("Total"));

    let body = doc.append(table, Element::new("tbody"));
    let mut inputs = Vec::new();
    let mut row_totals = Vec::new();
    for (task, row_values) in values.iter().enumerate() {
        let row = doc.append(
            body,
            Element::new("tr")
                .class("log-row")
                .attr("data-issue-id", &task.to_string()),
        );
        doc.append(row, Element::new("td").text("task"));
        let mut row_inputs = Vec::new();
        for value in row_values.iter() {
            let cell = doc.append(row, Element::new("td"));
            row_inputs.push(doc.append(
                cell,
                Element::input()
                    .class("log-input")
                    .attr("type", "number")
                    .attr("step", "0.25")
                    .value(value),
            ));
        }
        inputs.push(row_inputs);
        row_totals.push(doc.append(row, Element::new("td").class("row-total").text("-")));
    }

    let total_row = doc.append(body, Element::new("tr").class("total-row"));
    doc.append(total_row, Element::new("td").text("Daily total"));
    let column_totals = (0..width)
        .map(|_| doc.append(total_row, Element::new("td").class("col-total").text("-")))
        .collect();
    let grand_total = doc.append(total_row, Element::new("td").class("grand-total").text("0.00h"));

    WorkLogPage {
        inputs,
        row_totals,
        column_totals,
        grand_total,
    }
}

pub enum Hours<'a> {
    Editing(&'a str),
    Viewing(&'a str),
}

pub struct EstimatePage {
    pub body: NodeId,
    pub inputs: Vec<NodeId>,
    pub total: NodeId,
}

/// An estimate table with one row per line item and a total row.
pub fn estimate(doc: &mut Document, items: &[Hours]) -> EstimatePage {
    let table = doc.append(doc.root(), Element::new("table").id("estimate-table"));
    let body = doc.append(table, Element::new("tbody"));
    let mut inputs = Vec::new();
    for (id, item) in items.iter().enumerate() {
        let row = doc.append(body, Element::new("tr").id(&format!("estimate-{}", id)));
        doc.append(row, Element::new("td").text("item"));
        match item {
            Hours::Editing(hours) => {
                let cell = doc.append(row, Element::new("td"));
                inputs.push(doc.append(cell, Element::input().attr("name", "hours").value(hours)));
            }
            Hours::Viewing(hours) => {
                doc.append(row, Element::new("td").class("hours-cell").text(hours));
            }
        }
    }
    let total_row = doc.append(body, Element::new("tr").class("total-row"));
    doc.append(total_row, Element::new("td").text("Total"));
    let total = doc.append(total_row, Element::new("td").class("hours-cell"));
    EstimatePage {
        body,
        inputs,
        total,
    }
}

pub struct MonthlyPage {
    pub table: NodeId,
    pub inputs: Vec<Vec<NodeId>>,
    pub hours: Vec<NodeId>,
    pub person_months: Vec<NodeId>,
    pub column_totals: Vec<NodeId>,
    pub grand_total: NodeId,
}

/// A simple-mode assignment table: one `.user-row` per user, one
/// `.assign-input` per project.
pub fn monthly(doc: &mut Document, values: &[&[&str]]) -> MonthlyPage {
    let width = values.first().map(|r| r.len()).unwrap_or(0);
    let table = doc.append(doc.root(), Element::new("table").class("assign-table"));
    let body = doc.append(table, Element::new("tbody"));

    let mut inputs = Vec::new();
    let mut hours = Vec::new();
    let mut person_months = Vec::new();
    for row_values in values {
        let row = doc.append(body, Element::new("tr").class("user-row"));
        doc.append(row, Element::new("td").text("user"));
        let mut row_inputs = Vec::new();
        for value in row_values.iter() {
            let cell = doc.append(row, Element::new("td").class("assign-cell"));
            row_inputs.push(doc.append(cell, Element::input().class("assign-input").value(value)));
        }
        inputs.push(row_inputs);
        let total = doc.append(row, Element::new("td").class("row-total"));
        hours.push(doc.append(total, Element::new("div").class("total-hours")));
        person_months.push(doc.append(total, Element::new("div").class("total-mm")));
    }

    let total_row = doc.append(body, Element::new("tr").class("total-row"));
    doc.append(total_row, Element::new("td").text("Total"));
    let column_totals = (0..width)
        .map(|_| doc.append(total_row, Element::new("td").class("col-total")))
        .collect();
    let grand_total = doc.append(total_row, Element::new("td").class("grand-total"));

    MonthlyPage {
        table,
        inputs,
        hours,
        person_months,
        column_totals,
        grand_total,
    }
}

pub fn texts(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|&node| doc.text_content(node)).collect()
}

/// Parse a rendered total (`"7.00h"`, `"-"`, `""`) back into hours.
pub fn hours_of(text: &str) -> f64 {
    worktally::parse_number(text)
}

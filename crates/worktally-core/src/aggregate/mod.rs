//! Table aggregators and the dispatcher that runs them.
//!
//! Every pass starts from scratch: it locates each table variant present in
//! the document, re-reads its inputs, and rewrites its total cells. Nothing is
//! remembered between passes, so running a pass twice yields the same text.

mod estimate;
mod monthly;
mod work_log;

use serde::Serialize;
use tracing::{debug, trace};
use worktally_engine::engine::ColumnMismatch;

use crate::document::{Document, NodeId};
use crate::markers::CompiledMarkers;

/// The table layouts the engine knows how to total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableVariant {
    /// Work log: tasks by dates.
    WorkLog,
    /// Issue estimate: line items with a single total.
    Estimate,
    /// Monthly assignment: users by projects.
    MonthlyAssignment,
}

impl TableVariant {
    /// Every variant, in the order a pass runs them.
    pub const ALL: [TableVariant; 3] = [
        TableVariant::WorkLog,
        TableVariant::Estimate,
        TableVariant::MonthlyAssignment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TableVariant::WorkLog => "work_log",
            TableVariant::Estimate => "estimate",
            TableVariant::MonthlyAssignment => "monthly_assignment",
        }
    }

    /// The first table of this variant in the document, if any.
    pub fn locate(&self, doc: &Document, markers: &CompiledMarkers) -> Option<NodeId> {
        let selector = match self {
            TableVariant::WorkLog => &markers.work_log.table,
            TableVariant::Estimate => &markers.estimate.table,
            TableVariant::MonthlyAssignment => &markers.monthly.table,
        };
        doc.query(doc.root(), selector)
    }

    fn recalculate(&self, doc: &mut Document, table: NodeId, markers: &CompiledMarkers) -> Outcome {
        match self {
            TableVariant::WorkLog => work_log::recalculate(doc, table, &markers.work_log),
            TableVariant::Estimate => estimate::recalculate(doc, table, &markers.estimate),
            TableVariant::MonthlyAssignment => monthly::recalculate(doc, table, &markers.monthly),
        }
    }
}

/// Why a located table was left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The server rendered pre-aggregated totals that must not be overwritten.
    DetailedMode,
}

/// What a pass did to one table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Updated {
        writes: usize,
        mismatches: Vec<ColumnMismatch>,
    },
    Skipped(SkipReason),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub variant: TableVariant,
    pub outcome: Outcome,
}

/// Summary of one recalculation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub tables: Vec<TableReport>,
}

impl PassReport {
    /// Whether the pass found a table of `variant`.
    pub fn found(&self, variant: TableVariant) -> bool {
        self.tables.iter().any(|t| t.variant == variant)
    }

    pub fn outcome(&self, variant: TableVariant) -> Option<&Outcome> {
        self.tables
            .iter()
            .find(|t| t.variant == variant)
            .map(|t| &t.outcome)
    }

    /// Total number of cells written.
    pub fn writes(&self) -> usize {
        self.tables
            .iter()
            .map(|t| match &t.outcome {
                Outcome::Updated { writes, .. } => *writes,
                Outcome::Skipped(_) => 0,
            })
            .sum()
    }
}

/// Table variants present in the document.
pub fn detect(doc: &Document, markers: &CompiledMarkers) -> Vec<TableVariant> {
    TableVariant::ALL
        .into_iter()
        .filter(|variant| variant.locate(doc, markers).is_some())
        .collect()
}

/// Recalculate every table present in the document.
pub fn recalculate_all(doc: &mut Document, markers: &CompiledMarkers) -> PassReport {
    let mut report = PassReport::default();
    for variant in TableVariant::ALL {
        let Some(table) = variant.locate(doc, markers) else {
            continue;
        };
        let outcome = variant.recalculate(doc, table, markers);
        report.tables.push(TableReport { variant, outcome });
    }
    debug!(
        tables = report.tables.len(),
        writes = report.writes(),
        "recalculated totals"
    );
    report
}

/// Counts text written into total cells during one table pass.
#[derive(Default)]
struct Writes {
    count: usize,
}

impl Writes {
    /// Write `text` into `slot`; a missing slot is skipped.
    fn put(&mut self, doc: &mut Document, slot: Option<NodeId>, text: String, what: &str) {
        match slot {
            Some(node) if doc.set_text_content(node, &text) => self.count += 1,
            _ => trace!(slot = what, "total slot missing, skipped"),
        }
    }
}

//! Structural markers identifying tables, rows and total slots.
//!
//! Each marker is a selector string. The defaults match the markup the
//! server renders; a TOML file may override any subset of them:
//!
//! ```toml
//! [work_log]
//! table = ".timesheet"
//!
//! [estimate]
//! total_cell_index = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::{Document, NodeId, Selector};
use crate::error::{Result, TallyError};

const MAX_MARKERS_FILE_BYTES: u64 = 65_536; // 64 KiB

/// Marker configuration for all table variants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    pub work_log: WorkLogMarkers,
    pub estimate: EstimateMarkers,
    pub monthly: MonthlyMarkers,
}

/// Weekly/monthly work log: one row per task, one column per date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkLogMarkers {
    pub table: String,
    pub date_header: String,
    pub row: String,
    pub input: String,
    pub row_total: String,
    pub total_row: String,
    pub column_total: String,
    pub grand_total: String,
}

impl Default for WorkLogMarkers {
    fn default() -> Self {
        WorkLogMarkers {
            table: ".log-table, .week-table".to_string(),
            date_header: ".date-header".to_string(),
            row: ".log-row".to_string(),
            input: ".log-input".to_string(),
            row_total: ".row-total".to_string(),
            total_row: ".total-row".to_string(),
            column_total: ".col-total".to_string(),
            grand_total: ".grand-total".to_string(),
        }
    }
}

/// Issue estimate: line items with hours and a single total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimateMarkers {
    pub table: String,
    pub row: String,
    pub input: String,
    pub display: String,
    pub total_row: String,
    pub total_cell: String,
    /// Position of the total among the `total_cell` matches of the total row.
    pub total_cell_index: usize,
}

impl Default for EstimateMarkers {
    fn default() -> Self {
        EstimateMarkers {
            table: "#estimate-table".to_string(),
            row: "tbody tr:not(.total-row)".to_string(),
            input: "input[name=\"hours\"]".to_string(),
            display: ".hours-cell".to_string(),
            total_row: ".total-row".to_string(),
            total_cell: "td".to_string(),
            total_cell_index: 1,
        }
    }
}

/// Monthly assignment: one row per user, one column per project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonthlyMarkers {
    pub table: String,
    /// Present when the server rendered the detailed (planned/actual) view.
    pub detailed_mode: String,
    pub row: String,
    pub input: String,
    pub row_total: String,
    pub row_hours: String,
    pub row_person_months: String,
    pub total_row: String,
    pub column_total: String,
    pub grand_total: String,
}

impl Default for MonthlyMarkers {
    fn default() -> Self {
        MonthlyMarkers {
            table: ".assign-table".to_string(),
            detailed_mode: ".assign-cell[style*=\"vertical-align\"]".to_string(),
            row: ".user-row".to_string(),
            input: ".assign-input".to_string(),
            row_total: ".row-total".to_string(),
            row_hours: ".total-hours".to_string(),
            row_person_months: ".total-mm".to_string(),
            total_row: ".total-row".to_string(),
            column_total: ".col-total".to_string(),
            grand_total: ".grand-total".to_string(),
        }
    }
}

impl Markers {
    /// Parse markers from TOML; missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Markers> {
        Ok(toml::from_str(content)?)
    }

    /// Load markers from a TOML file.
    pub fn load(path: &Path) -> Result<Markers> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_MARKERS_FILE_BYTES {
            return Err(TallyError::ConfigTooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                max: MAX_MARKERS_FILE_BYTES,
            });
        }
        Markers::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Parse every selector, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledMarkers> {
        let w = &self.work_log;
        let e = &self.estimate;
        let m = &self.monthly;

        let work_log = WorkLogSelectors {
            table: compile("work_log.table", &w.table)?,
            date_header: compile("work_log.date_header", &w.date_header)?,
            row: compile("work_log.row", &w.row)?,
            input: compile("work_log.input", &w.input)?,
            row_total: compile("work_log.row_total", &w.row_total)?,
            total_row: compile("work_log.total_row", &w.total_row)?,
            column_total: compile("work_log.column_total", &w.column_total)?,
            grand_total: compile("work_log.grand_total", &w.grand_total)?,
        };
        let estimate = EstimateSelectors {
            table: compile("estimate.table", &e.table)?,
            row: compile("estimate.row", &e.row)?,
            input: compile("estimate.input", &e.input)?,
            display: compile("estimate.display", &e.display)?,
            total_row: compile("estimate.total_row", &e.total_row)?,
            total_cell: compile("estimate.total_cell", &e.total_cell)?,
            total_cell_index: e.total_cell_index,
        };
        let monthly = MonthlySelectors {
            table: compile("monthly.table", &m.table)?,
            detailed_mode: compile("monthly.detailed_mode", &m.detailed_mode)?,
            row: compile("monthly.row", &m.row)?,
            input: compile("monthly.input", &m.input)?,
            row_total: compile("monthly.row_total", &m.row_total)?,
            row_hours: compile("monthly.row_hours", &m.row_hours)?,
            row_person_months: compile("monthly.row_person_months", &m.row_person_months)?,
            total_row: compile("monthly.total_row", &m.total_row)?,
            column_total: compile("monthly.column_total", &m.column_total)?,
            grand_total: compile("monthly.grand_total", &m.grand_total)?,
        };

        Ok(CompiledMarkers {
            work_log,
            estimate,
            monthly,
        })
    }
}

fn compile(field: &str, source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|err| TallyError::Marker {
        field: field.to_string(),
        message: err.to_string(),
    })
}

#[derive(Clone, Debug)]
pub struct WorkLogSelectors {
    pub table: Selector,
    pub date_header: Selector,
    pub row: Selector,
    pub input: Selector,
    pub row_total: Selector,
    pub total_row: Selector,
    pub column_total: Selector,
    pub grand_total: Selector,
}

#[derive(Clone, Debug)]
pub struct EstimateSelectors {
    pub table: Selector,
    pub row: Selector,
    pub input: Selector,
    pub display: Selector,
    pub total_row: Selector,
    pub total_cell: Selector,
    pub total_cell_index: usize,
}

#[derive(Clone, Debug)]
pub struct MonthlySelectors {
    pub table: Selector,
    pub detailed_mode: Selector,
    pub row: Selector,
    pub input: Selector,
    pub row_total: Selector,
    pub row_hours: Selector,
    pub row_person_months: Selector,
    pub total_row: Selector,
    pub column_total: Selector,
    pub grand_total: Selector,
}

/// Markers with every selector parsed, ready for recalculation passes.
#[derive(Clone, Debug)]
pub struct CompiledMarkers {
    pub work_log: WorkLogSelectors,
    pub estimate: EstimateSelectors,
    pub monthly: MonthlySelectors,
}

impl CompiledMarkers {
    /// Whether editing `node` changes a value some table sums.
    pub fn is_tracked_input(&self, doc: &Document, node: NodeId) -> bool {
        [
            &self.work_log.input,
            &self.monthly.input,
            &self.estimate.input,
        ]
        .into_iter()
        .any(|selector| doc.matches(node, selector))
    }
}

impl Default for CompiledMarkers {
    fn default() -> Self {
        // The default selectors are fixed strings covered by tests.
        Markers::default()
            .compile()
            .expect("default markers are valid selectors")
    }
}

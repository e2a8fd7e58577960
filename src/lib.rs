//! Worktally - live totals for work log, estimate and monthly assignment tables.
//!
//! The host mirrors its page into a [`Document`], opens a [`Session`], and
//! forwards UI notifications; every relevant notification recomputes row,
//! column and grand totals and writes them back into the total cells.
//!
//! ```ignore
//! let mut session = Session::from_config(None)?;
//! // ... append the page's tables to session.document_mut() ...
//! session.ready();
//! session.type_into(hours_input, "7.5");
//! ```

pub mod config;
#[cfg(feature = "logging")]
pub mod logging;
pub mod session;

pub use session::Session;

pub use worktally_core::{
    ColumnMismatch, CompiledMarkers, Document, Element, Event, EventHub, Markers, NodeId, Outcome,
    PassReport, Result, Selector, SkipReason, Subscription, TableReport, TableVariant, TallyError,
    detect, recalculate_all,
};
pub use worktally_engine::engine::{HOURS_PER_PERSON_MONTH, parse_number, to_fixed};

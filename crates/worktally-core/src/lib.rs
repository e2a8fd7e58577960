//! worktally-core - UI-agnostic document model, table aggregators and triggers.

pub mod aggregate;
pub mod document;
pub mod error;
pub mod events;
pub mod markers;

pub use aggregate::{Outcome, PassReport, SkipReason, TableReport, TableVariant, detect, recalculate_all};
pub use document::{Document, Element, NodeId, Selector};
pub use error::{Result, TallyError};
pub use events::{Event, EventHub, ListenerId, Subscription, triggers_recalculation};
pub use markers::{CompiledMarkers, Markers};

pub use worktally_engine::engine::ColumnMismatch;

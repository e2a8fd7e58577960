//! Document state the engine reads and writes (UI-agnostic).
//!
//! The host owns the document and mirrors its UI into it; recalculation only
//! reads input values and text, and writes text into total cells.

mod element;
mod selector;
mod tree;

pub use element::{Element, NodeId};
pub use selector::Selector;
pub use tree::Document;

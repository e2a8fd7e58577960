//! worktally_engine - Number parsing, totals and display formatting.

pub mod engine;

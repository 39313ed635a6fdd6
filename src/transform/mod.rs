//! The five cleaning stages, each a function from [`Table`](crate::table::Table)
//! to `Table` plus the counts it reports.

pub mod dedup;
pub mod infer;
pub mod prune;
pub mod standardize;
pub mod string_ops;
pub mod trim;

//! Bundle materialization: turn a traced file closure into a self-contained,
//! relocatable on-disk bundle.

mod ancestor;
mod entry;
mod materialize;

pub use ancestor::common_ancestor;
pub use entry::{FileEntry, classify};
pub use materialize::{BundleReport, materialize};

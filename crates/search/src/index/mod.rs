//! Index naming, lifecycle and bulk loading.

pub mod bulk;
mod lifecycle;
mod naming;

pub use bulk::{BulkLoader, BulkOptions, BulkSummary};
pub use lifecycle::ensure_index;
pub use naming::IndexNames;

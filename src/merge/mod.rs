//! Folder merging: target resolution, per-target coordination and the
//! document backend that does the actual appending.

pub mod coordinator;
pub mod pdf;
pub mod resolver;

pub use coordinator::{merge_all, merge_folder, BatchReport, MergeReport, TargetOutcome};
pub use pdf::{DocumentMerger, LopdfMerger, MergeStats};
pub use resolver::{merge_candidates, resolve_targets};

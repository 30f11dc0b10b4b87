//! Naming Rules
//!
//! Pure, I/O-free rules over file names: prefix classification, natural
//! ordering and the merge-candidate guard.

pub mod guard;
pub mod natural;
pub mod prefix;

pub use guard::{is_candidate, output_name};
pub use natural::{natural_cmp, natural_sort};
pub use prefix::group_key;

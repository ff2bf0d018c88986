//! In-memory stores
//!
//! Three independent collections, each behind its own lock:
//!
//! - **groups**: named bookmark groups with lazy sorting
//! - **recents**: bounded list of recently tuned entries
//! - **ranges**: saved frequency spans with lazy sorting

pub mod groups;
pub mod ranges;
pub mod recents;

pub use groups::GroupStore;
pub use ranges::RangeStore;
pub use recents::{RecentsRing, RECENTS_MAX};

//! Tree operations applied to resource bodies before comparison.
//!
//! Order within one comparison: [`select`] → [`prune`] → [`flatten`].

pub mod flatten;
pub mod prune;
pub mod select;

pub use flatten::{flatten, FlatView};
pub use prune::{prune, prune_in_place};
pub use select::select_relevant;

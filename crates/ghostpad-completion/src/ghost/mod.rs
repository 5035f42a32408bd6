//! Ghost regions: removed placeholder text the user retypes

pub mod merge;
pub mod region;
pub mod store;

pub use merge::{GhostMergeResolver, PlaceholderOutcome};
pub use region::{GhostMatch, GhostRegion};
pub use store::{AcceptLineOutcome, GhostRegionStore};

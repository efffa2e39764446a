pub mod attribute;
pub mod commit;
pub mod graph;

pub use attribute::{AttributionStrategy, FirstParentAttribution};
pub use commit::{BranchHead, Commit};
pub use graph::CommitGraph;

pub mod core;
pub mod emit;
pub mod error;
pub mod git_backend;
pub mod render;
pub mod root;
pub mod schedule;

pub use crate::core::{AttributionStrategy, BranchHead, Commit, CommitGraph, FirstParentAttribution};
pub use emit::{BranchAnchor, CommitMeta, EventEmitter, RecordingSink, RenderOp, RenderSink};
pub use error::{Diagnostic, GraphError};
pub use git_backend::{GitWalker, Snapshot};
pub use render::GitgraphJsSink;
pub use root::RootLocator;
pub use schedule::{Schedule, Scheduled, TraversalScheduler};

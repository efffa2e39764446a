use thiserror::Error;

/// Fatal pipeline errors: processing halts and no output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A commit references a parent that is not present in the snapshot.
    #[error("commit {commit} references missing parent {parent}")]
    DanglingParent { commit: String, parent: String },

    /// A two-parent commit never became eligible: the frontier drained
    /// while one of its parents was still unemitted.
    #[error("merge commit {commit} is blocked with no remaining candidates (unreachable parent)")]
    OrphanedMerge { commit: String },
}

/// Recoverable data-quality findings collected during traversal.
///
/// A run that produced diagnostics yielded best-effort output: the
/// offending commits were processed but not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Neither or both parents of a merge commit share its branch, so
    /// the merge direction cannot be resolved.
    #[error("parent branches of merge commit {commit} do not match its own branch")]
    BranchMismatch { commit: String },

    /// Octopus merges are out of scope.
    #[error("commit {commit} has {parents} parents; octopus merges are not supported")]
    OctopusMerge { commit: String, parents: usize },

    /// The frontier emptied before every commit in the graph was
    /// emitted; the remainder is unreachable from the chosen root.
    #[error("traversal emitted {emitted} of {total} commits")]
    IncompleteTraversal { emitted: usize, total: usize },
}

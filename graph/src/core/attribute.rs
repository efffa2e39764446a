use super::commit::BranchHead;
use super::graph::CommitGraph;
use tracing::debug;

/// Policy for assigning each commit to the branch that introduced it.
///
/// Attribution is a heuristic, not ground truth; it is kept behind this
/// trait so an alternative policy can be substituted without touching
/// the traversal scheduler.
pub trait AttributionStrategy {
    fn attribute(&self, graph: &mut CommitGraph);
}

/// First-parent attribution: a commit belongs to the first branch whose
/// first-parent chain reaches it.
///
/// The default branch is processed first, so its entire first-parent
/// ancestry is labeled before any other branch can claim shared
/// history. Ties among the remaining branches are broken by their order
/// in the snapshot.
pub struct FirstParentAttribution;

impl AttributionStrategy for FirstParentAttribution {
    fn attribute(&self, graph: &mut CommitGraph) {
        let Some(default) = graph.default_head().cloned() else {
            return;
        };

        // The graph is unlabeled at this point, so the default branch
        // labels its whole first-parent chain down to the root.
        Self::label_chain(graph, &default);

        let others: Vec<BranchHead> = graph
            .heads
            .iter()
            .filter(|h| h.name != default.name)
            .cloned()
            .collect();
        for head in &others {
            Self::label_chain(graph, head);
        }
    }
}

impl FirstParentAttribution {
    /// Walk the first-parent chain from `head`, labeling commits until
    /// an already-labeled commit (never overwritten) or a root is
    /// reached.
    fn label_chain(graph: &mut CommitGraph, head: &BranchHead) {
        let mut cursor = head.target.clone();
        loop {
            let Some(commit) = graph.commits.get_mut(&cursor) else {
                debug!(branch = %head.name, commit = %cursor, "chain left the snapshot");
                break;
            };
            if commit.branch.is_some() {
                break;
            }
            commit.branch = Some(head.name.clone());
            match commit.first_parent() {
                Some(parent) => cursor = parent.to_string(),
                None => break,
            }
        }
    }
}

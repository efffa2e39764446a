use crate::core::CommitGraph;

/// Selects the commit that seeds traversal: the oldest commit in the
/// graph.
pub struct RootLocator;

impl RootLocator {
    /// Scan all commits for the minimum timestamp, starting from the
    /// default branch tip as the initial bound. Equal timestamps are
    /// broken by identifier order so the choice is reproducible.
    pub fn select(graph: &CommitGraph) -> Option<String> {
        let default = graph.default_head()?;
        let mut best = graph.get(&default.target)?;

        for commit in graph.commits.values() {
            if (commit.timestamp, commit.id.as_str()) < (best.timestamp, best.id.as_str()) {
                best = commit;
            }
        }

        Some(best.id.clone())
    }
}

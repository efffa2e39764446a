use super::attribute::{AttributionStrategy, FirstParentAttribution};
use super::commit::{BranchHead, Commit};
use crate::error::GraphError;
use std::collections::HashMap;
use tracing::debug;

/// Directed acyclic graph of commit history, annotated with branch labels.
///
/// Built once per run from a complete snapshot; treated as read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    /// All commits indexed by commit ID
    pub commits: HashMap<String, Commit>,
    /// Branch heads the snapshot was taken from
    pub heads: Vec<BranchHead>,
}

impl CommitGraph {
    /// Build the graph with first-parent branch attribution.
    pub fn build(
        commits: Vec<Commit>,
        heads: Vec<BranchHead>,
        tags: Vec<(String, String)>,
    ) -> Result<Self, GraphError> {
        Self::build_with(commits, heads, tags, &FirstParentAttribution)
    }

    /// Build the graph with an explicit attribution policy.
    pub fn build_with(
        commits: Vec<Commit>,
        heads: Vec<BranchHead>,
        tags: Vec<(String, String)>,
        attribution: &dyn AttributionStrategy,
    ) -> Result<Self, GraphError> {
        let mut graph = Self {
            commits: commits.into_iter().map(|c| (c.id.clone(), c)).collect(),
            heads,
        };

        graph.link_children()?;
        graph.attach_tags(tags);
        attribution.attribute(&mut graph);
        graph.mark_branch_tips();

        Ok(graph)
    }

    /// Populate every commit's children list as the inverse of the
    /// parent relation. A parent ID missing from the snapshot is a
    /// fatal data error.
    fn link_children(&mut self) -> Result<(), GraphError> {
        let mut links = Vec::new();
        for commit in self.commits.values() {
            for parent in &commit.parents {
                if !self.commits.contains_key(parent) {
                    return Err(GraphError::DanglingParent {
                        commit: commit.id.clone(),
                        parent: parent.clone(),
                    });
                }
                links.push((parent.clone(), commit.id.clone()));
            }
        }

        for (parent, child) in links {
            if let Some(parent) = self.commits.get_mut(&parent) {
                // Idempotent under duplicate input records
                if !parent.children.contains(&child) {
                    parent.children.push(child);
                }
            }
        }

        Ok(())
    }

    /// Attach tag names to their target commits. Last write wins if a
    /// commit carries more than one tag in the input.
    fn attach_tags(&mut self, tags: Vec<(String, String)>) {
        for (target, name) in tags {
            match self.commits.get_mut(&target) {
                Some(commit) => commit.tag = Some(name),
                None => debug!(tag = %name, %target, "tag target not in snapshot, ignoring"),
            }
        }
    }

    /// Record on each tip commit the branch names pointing at it.
    fn mark_branch_tips(&mut self) {
        let tips: Vec<(String, String)> = self
            .heads
            .iter()
            .map(|h| (h.target.clone(), h.name.clone()))
            .collect();
        for (target, name) in tips {
            if let Some(commit) = self.commits.get_mut(&target) {
                commit.branch_tips.push(name);
            }
        }
    }

    /// Look up a commit by ID
    pub fn get(&self, id: &str) -> Option<&Commit> {
        self.commits.get(id)
    }

    /// The default branch head, falling back to the first head when
    /// none is flagged (e.g. detached HEAD).
    pub fn default_head(&self) -> Option<&BranchHead> {
        self.heads
            .iter()
            .find(|h| h.is_default)
            .or_else(|| self.heads.first())
    }

    /// Number of commits in the graph
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

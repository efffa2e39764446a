use crate::core::{Commit, CommitGraph};
use crate::error::{Diagnostic, GraphError};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One entry in the emission order produced by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheduled {
    /// Commit with zero or one parent, drawn on its attributed branch.
    Commit { id: String },
    /// Resolved two-parent merge: `source` merged into `receiving`.
    Merge {
        id: String,
        receiving: String,
        source: String,
    },
    /// Commit processed but not drawn; see the matching diagnostic.
    Skipped { id: String },
}

impl Scheduled {
    pub fn id(&self) -> &str {
        match self {
            Self::Commit { id } | Self::Merge { id, .. } | Self::Skipped { id } => id,
        }
    }
}

/// Result of a traversal run: the total emission order plus any
/// recoverable diagnostics collected along the way.
#[derive(Debug, Default)]
pub struct Schedule {
    pub order: Vec<Scheduled>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Frontier-based scheduler that serializes the DAG into a total order.
///
/// Candidates are taken oldest-first (ties broken by identifier). A
/// two-parent commit is held back until both parents have been emitted:
/// when selected too early it is dropped from the frontier and the
/// next-oldest candidate runs instead, letting sibling branches catch
/// up. The dropped commit re-enters the frontier as a child of the
/// parent it was waiting on.
pub struct TraversalScheduler<'a> {
    graph: &'a CommitGraph,
    frontier: Vec<String>,
    emitted: HashSet<String>,
}

impl<'a> TraversalScheduler<'a> {
    pub fn new(graph: &'a CommitGraph) -> Self {
        Self {
            graph,
            frontier: Vec::new(),
            emitted: HashSet::new(),
        }
    }

    /// Run the traversal from `root`, producing the emission order.
    ///
    /// Every `Merge` entry is guaranteed to appear after both of its
    /// parents; every single-parent `Commit` after its parent. The
    /// order is a topological order of the subgraph reachable from
    /// `root`.
    pub fn run(mut self, root: &str) -> Result<Schedule, GraphError> {
        let mut schedule = Schedule::default();
        if self.graph.get(root).is_some() {
            self.frontier.push(root.to_string());
        }

        while let Some(id) = self.take_oldest() {
            let Some(commit) = self.graph.get(&id) else {
                continue;
            };

            match commit.parents.len() {
                0 | 1 => {
                    debug!(commit = %id, "scheduling commit");
                    schedule.order.push(Scheduled::Commit { id: id.clone() });
                }
                2 => {
                    if let Some(pending) = self.pending_parent(commit) {
                        if self.frontier.is_empty() {
                            return Err(GraphError::OrphanedMerge { commit: id });
                        }
                        debug!(
                            commit = %id,
                            waiting_on = %pending,
                            "merge blocked, ceding to sibling branches"
                        );
                        // Dropped from the frontier; re-enters as a
                        // child of the parent it is waiting on.
                        continue;
                    }

                    match self.resolve_merge(commit) {
                        Some((receiving, source)) => {
                            debug!(commit = %id, %receiving, %source, "scheduling merge");
                            schedule.order.push(Scheduled::Merge {
                                id: id.clone(),
                                receiving,
                                source,
                            });
                        }
                        None => {
                            warn!(commit = %id, "parent branches do not match merge commit branch");
                            schedule
                                .diagnostics
                                .push(Diagnostic::BranchMismatch { commit: id.clone() });
                            schedule.order.push(Scheduled::Skipped { id: id.clone() });
                        }
                    }
                }
                n => {
                    warn!(commit = %id, parents = n, "octopus merge not supported");
                    schedule.diagnostics.push(Diagnostic::OctopusMerge {
                        commit: id.clone(),
                        parents: n,
                    });
                    schedule.order.push(Scheduled::Skipped { id: id.clone() });
                }
            }

            self.emitted.insert(id.clone());
            for child in &commit.children {
                if !self.emitted.contains(child) && !self.frontier.contains(child) {
                    self.frontier.push(child.clone());
                }
            }
        }

        if self.emitted.len() < self.graph.len() {
            warn!(
                emitted = self.emitted.len(),
                total = self.graph.len(),
                "traversal ended before covering the full graph"
            );
            schedule.diagnostics.push(Diagnostic::IncompleteTraversal {
                emitted: self.emitted.len(),
                total: self.graph.len(),
            });
        }

        Ok(schedule)
    }

    /// Remove and return the frontier candidate with the earliest
    /// timestamp, ties broken by identifier.
    fn take_oldest(&mut self) -> Option<String> {
        let best = self
            .frontier
            .iter()
            .enumerate()
            .filter_map(|(i, id)| self.graph.get(id).map(|c| (i, c)))
            .min_by(|(_, a), (_, b)| {
                a.timestamp
                    .cmp(&b.timestamp)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|(i, _)| i)?;
        Some(self.frontier.remove(best))
    }

    /// First parent of `commit` that has not been emitted yet, if any.
    fn pending_parent<'c>(&self, commit: &'c Commit) -> Option<&'c str> {
        commit
            .parents
            .iter()
            .map(String::as_str)
            .find(|p| !self.emitted.contains(*p))
    }

    /// Determine merge direction: exactly one parent must share the
    /// commit's own branch (the receiving side); the other parent's
    /// branch is the source merged in.
    fn resolve_merge(&self, commit: &Commit) -> Option<(String, String)> {
        let own = commit.branch.as_deref().unwrap_or_default();
        let first = self.parent_branch(commit, 0);
        let second = self.parent_branch(commit, 1);

        match (first == own, second == own) {
            (true, false) => Some((own.to_string(), second.to_string())),
            (false, true) => Some((own.to_string(), first.to_string())),
            _ => None,
        }
    }

    fn parent_branch(&self, commit: &Commit, idx: usize) -> &str {
        commit
            .parents
            .get(idx)
            .and_then(|p| self.graph.get(p))
            .and_then(|c| c.branch.as_deref())
            .unwrap_or_default()
    }
}

use crate::core::{Commit, CommitGraph};
use crate::schedule::{Schedule, Scheduled};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

/// Where a newly created branch attaches in the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchAnchor {
    /// The branch starts at the root of the rendered graph.
    Root,
    /// The branch forks off an already-created branch.
    Branch(String),
}

/// Metadata carried by every commit and merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMeta {
    pub id: String,
    pub subject: String,
    pub body: String,
    pub author: String,
    pub email: String,
    pub timestamp: DateTime<Utc>,
    /// Tag attached to the commit, carried with the operation rather
    /// than emitted standalone.
    pub tag: Option<String>,
}

impl CommitMeta {
    fn from_commit(commit: &Commit) -> Self {
        Self {
            id: commit.id.clone(),
            subject: commit.subject.clone(),
            body: commit.body.clone(),
            author: commit.author.clone(),
            email: commit.email.clone(),
            timestamp: commit.timestamp,
            tag: commit.tag.clone(),
        }
    }
}

/// Abstract drawing operation forwarded to the rendering sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    CreateBranch { name: String, anchor: BranchAnchor },
    Commit { branch: String, meta: CommitMeta },
    Merge {
        receiving: String,
        source: String,
        meta: CommitMeta,
    },
}

/// Consumer of the operation stream.
///
/// The `details` and `selected` hooks are invoked once per drawn
/// commit, before its operation, so interactive sinks can register
/// per-commit callbacks; non-interactive sinks keep the default no-op
/// implementations.
pub trait RenderSink {
    fn create_branch(&mut self, name: &str, anchor: &BranchAnchor);
    fn commit(&mut self, branch: &str, meta: &CommitMeta);
    fn merge(&mut self, receiving: &str, source: &str, meta: &CommitMeta);

    fn details(&mut self, _meta: &CommitMeta) {}
    fn selected(&mut self, _id: &str) {}
}

/// Sink that records the operation stream as values, for tests and
/// callers that post-process operations.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub ops: Vec<RenderOp>,
}

impl RenderSink for RecordingSink {
    fn create_branch(&mut self, name: &str, anchor: &BranchAnchor) {
        self.ops.push(RenderOp::CreateBranch {
            name: name.to_string(),
            anchor: anchor.clone(),
        });
    }

    fn commit(&mut self, branch: &str, meta: &CommitMeta) {
        self.ops.push(RenderOp::Commit {
            branch: branch.to_string(),
            meta: meta.clone(),
        });
    }

    fn merge(&mut self, receiving: &str, source: &str, meta: &CommitMeta) {
        self.ops.push(RenderOp::Merge {
            receiving: receiving.to_string(),
            source: source.to_string(),
            meta: meta.clone(),
        });
    }
}

/// Branch name used for commits the attribution heuristic could not
/// label, e.g. the second-parent ancestry of a merge whose source
/// branch was deleted.
const UNNAMED_BRANCH: &str = "unnamed";

fn display_branch(label: &str) -> &str {
    if label.is_empty() {
        UNNAMED_BRANCH
    } else {
        label
    }
}

/// Translates the scheduled emission order into drawing operations.
///
/// A branch is created the first time its label is encountered,
/// anchored at the graph root for parentless commits and at the
/// mainline parent's branch otherwise. Unlabeled commits are drawn on
/// the shared fallback branch, so a branch is never created with an
/// empty name.
pub struct EventEmitter<'a> {
    graph: &'a CommitGraph,
    created: HashSet<String>,
}

impl<'a> EventEmitter<'a> {
    pub fn new(graph: &'a CommitGraph) -> Self {
        Self {
            graph,
            created: HashSet::new(),
        }
    }

    /// Stream the schedule into `sink`. Skipped entries produce no
    /// operations.
    pub fn emit(mut self, schedule: &Schedule, sink: &mut dyn RenderSink) {
        for entry in &schedule.order {
            match entry {
                Scheduled::Commit { id } => self.emit_commit(id, sink),
                Scheduled::Merge {
                    id,
                    receiving,
                    source,
                } => self.emit_merge(id, receiving, source, sink),
                Scheduled::Skipped { id } => {
                    debug!(commit = %id, "skipped entry, no operation emitted");
                }
            }
        }
    }

    fn emit_commit(&mut self, id: &str, sink: &mut dyn RenderSink) {
        let Some(commit) = self.graph.get(id) else {
            return;
        };
        let branch = display_branch(commit.branch.as_deref().unwrap_or_default());

        self.ensure_branch(branch, commit, sink);

        let meta = CommitMeta::from_commit(commit);
        sink.details(&meta);
        sink.selected(&commit.id);

        info!(commit = %commit.id, %branch, "adding commit");
        sink.commit(branch, &meta);
    }

    fn emit_merge(&mut self, id: &str, receiving: &str, source: &str, sink: &mut dyn RenderSink) {
        let Some(commit) = self.graph.get(id) else {
            return;
        };
        let receiving = display_branch(receiving);
        let source = display_branch(source);

        self.ensure_branch(receiving, commit, sink);

        let meta = CommitMeta::from_commit(commit);
        sink.details(&meta);
        sink.selected(&commit.id);

        info!(commit = %commit.id, %receiving, %source, "adding merge");
        sink.merge(receiving, source, &meta);
    }

    /// Create `branch` if this is the first commit carrying its label.
    fn ensure_branch(&mut self, branch: &str, commit: &Commit, sink: &mut dyn RenderSink) {
        if self.created.contains(branch) {
            return;
        }

        let anchor = match commit.first_parent() {
            None => BranchAnchor::Root,
            Some(parent) => BranchAnchor::Branch(
                display_branch(
                    self.graph
                        .get(parent)
                        .and_then(|p| p.branch.as_deref())
                        .unwrap_or_default(),
                )
                .to_string(),
            ),
        };

        info!(%branch, ?anchor, "creating branch");
        self.created.insert(branch.to_string());
        sink.create_branch(branch, &anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BranchHead, CommitGraph};
    use crate::root::RootLocator;
    use crate::schedule::TraversalScheduler;
    use chrono::{TimeZone, Utc};

    fn commit(id: &str, parents: &[&str], secs: i64) -> crate::core::Commit {
        crate::core::Commit::new(
            id.to_string(),
            parents.iter().map(|p| p.to_string()).collect(),
            "Author".to_string(),
            "author@example.com".to_string(),
            Utc.timestamp_opt(secs, 0).single().unwrap(),
            format!("commit {id}"),
            String::new(),
        )
    }

    fn pipeline(graph: &CommitGraph) -> Vec<RenderOp> {
        let root = RootLocator::select(graph).unwrap();
        let schedule = TraversalScheduler::new(graph).run(&root).unwrap();
        let mut sink = RecordingSink::default();
        EventEmitter::new(graph).emit(&schedule, &mut sink);
        sink.ops
    }

    fn linear_graph() -> CommitGraph {
        CommitGraph::build(
            vec![
                commit("a", &[], 0),
                commit("b", &["a"], 1),
                commit("c", &["b"], 2),
            ],
            vec![BranchHead::new("main", "c", true)],
            vec![],
        )
        .unwrap()
    }

    fn merge_graph() -> CommitGraph {
        let mut tagged = commit("e", &["c", "d"], 4);
        tagged.tag = Some("v1.0".to_string());
        CommitGraph::build(
            vec![
                commit("a", &[], 0),
                commit("b", &["a"], 1),
                commit("c", &["b"], 2),
                commit("d", &["a"], 3),
                tagged,
            ],
            vec![
                BranchHead::new("main", "e", true),
                BranchHead::new("feature", "d", false),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn linear_history_creates_one_branch() {
        let ops = pipeline(&linear_graph());

        assert_eq!(ops.len(), 4);
        assert_eq!(
            ops[0],
            RenderOp::CreateBranch {
                name: "main".to_string(),
                anchor: BranchAnchor::Root,
            }
        );
        for (op, id) in ops[1..].iter().zip(["a", "b", "c"]) {
            match op {
                RenderOp::Commit { branch, meta } => {
                    assert_eq!(branch, "main");
                    assert_eq!(meta.id, id);
                }
                other => panic!("unexpected op: {other:?}"),
            }
        }
    }

    #[test]
    fn feature_branch_anchored_on_main() {
        let ops = pipeline(&merge_graph());

        let creates: Vec<&RenderOp> = ops
            .iter()
            .filter(|op| matches!(op, RenderOp::CreateBranch { .. }))
            .collect();
        assert_eq!(creates.len(), 2);
        assert_eq!(
            creates[1],
            &RenderOp::CreateBranch {
                name: "feature".to_string(),
                anchor: BranchAnchor::Branch("main".to_string()),
            }
        );
    }

    #[test]
    fn merge_carries_direction_and_tag() {
        let ops = pipeline(&merge_graph());

        match ops.last() {
            Some(RenderOp::Merge {
                receiving,
                source,
                meta,
            }) => {
                assert_eq!(receiving, "main");
                assert_eq!(source, "feature");
                assert_eq!(meta.id, "e");
                assert_eq!(meta.tag.as_deref(), Some("v1.0"));
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn deleted_branch_commits_render_on_fallback_branch() {
        // d is only reachable as the second parent of the merge e, so
        // no first-parent chain from a live head labels it.
        let graph = CommitGraph::build(
            vec![
                commit("a", &[], 0),
                commit("b", &["a"], 1),
                commit("d", &["a"], 2),
                commit("e", &["b", "d"], 3),
            ],
            vec![BranchHead::new("main", "e", true)],
            vec![],
        )
        .unwrap();

        let ops = pipeline(&graph);

        assert!(ops.contains(&RenderOp::CreateBranch {
            name: "unnamed".to_string(),
            anchor: BranchAnchor::Branch("main".to_string()),
        }));
        match ops.last() {
            Some(RenderOp::Merge {
                receiving, source, ..
            }) => {
                assert_eq!(receiving, "main");
                assert_eq!(source, "unnamed");
            }
            other => panic!("unexpected op: {other:?}"),
        }
        assert!(ops
            .iter()
            .all(|op| !matches!(op, RenderOp::CreateBranch { name, .. } if name.is_empty())));
    }

    #[test]
    fn rerun_is_deterministic() {
        let graph = merge_graph();
        assert_eq!(pipeline(&graph), pipeline(&graph));
    }

    #[test]
    fn hooks_fire_once_per_drawn_commit() {
        #[derive(Default)]
        struct HookSink {
            details: Vec<String>,
            selected: Vec<String>,
        }

        impl RenderSink for HookSink {
            fn create_branch(&mut self, _: &str, _: &BranchAnchor) {}
            fn commit(&mut self, _: &str, _: &CommitMeta) {}
            fn merge(&mut self, _: &str, _: &str, _: &CommitMeta) {}

            fn details(&mut self, meta: &CommitMeta) {
                self.details.push(meta.id.clone());
            }

            fn selected(&mut self, id: &str) {
                self.selected.push(id.to_string());
            }
        }

        let graph = linear_graph();
        let schedule = TraversalScheduler::new(&graph).run("a").unwrap();
        let mut sink = HookSink::default();
        EventEmitter::new(&graph).emit(&schedule, &mut sink);

        assert_eq!(sink.details, vec!["a", "b", "c"]);
        assert_eq!(sink.selected, vec!["a", "b", "c"]);
    }
}

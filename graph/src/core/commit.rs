use chrono::{DateTime, Utc};
use smallvec::SmallVec;

/// A commit node in the history DAG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Unique commit ID (full SHA or a unique fixed prefix)
    pub id: String,
    /// Parent commit IDs; the first entry is the mainline parent
    pub parents: SmallVec<[String; 2]>,
    /// Author name
    pub author: String,
    /// Author contact
    pub email: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
    /// First line of the commit message
    pub subject: String,
    /// Message body with the subject line stripped
    pub body: String,
    /// At most one tag pointing at this commit
    pub tag: Option<String>,
    /// Names of branch heads pointing directly at this commit
    pub branch_tips: Vec<String>,
    /// Child commit IDs, the exact inverse of the parent relation.
    /// Populated by the graph builder.
    pub children: Vec<String>,
    /// Branch this commit is attributed to; `None` until the
    /// attribution pass has run.
    pub branch: Option<String>,
}

impl Commit {
    pub fn new(
        id: String,
        parents: Vec<String>,
        author: String,
        email: String,
        timestamp: DateTime<Utc>,
        subject: String,
        body: String,
    ) -> Self {
        Self {
            id,
            parents: SmallVec::from_vec(parents),
            author,
            email,
            timestamp,
            subject,
            body,
            tag: None,
            branch_tips: Vec::new(),
            children: Vec::new(),
            branch: None,
        }
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// The mainline parent, i.e. the first listed one
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

/// A named pointer to the commit a branch currently sits on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchHead {
    /// Branch name
    pub name: String,
    /// Commit ID the branch points at
    pub target: String,
    /// Whether this is the default/primary branch
    pub is_default: bool,
}

impl BranchHead {
    pub fn new(name: impl Into<String>, target: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            is_default,
        }
    }
}

use crate::core::{BranchHead, Commit};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use git2::{BranchType, Repository};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Flat snapshot of a repository: every commit reachable from a local
/// branch head, the heads themselves, and tag assignments.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub commits: Vec<Commit>,
    pub heads: Vec<BranchHead>,
    /// (commit id, tag name) pairs, tags peeled to their target commit
    pub tags: Vec<(String, String)>,
}

/// Extracts commit snapshots from a git repository via libgit2.
pub struct GitWalker {
    repo: Repository,
    short_len: Option<usize>,
}

impl GitWalker {
    pub fn new(repo_path: Option<&Path>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::open(path),
            None => Repository::open_from_env(),
        }
        .context("Failed to open repository")?;

        Ok(Self {
            repo,
            short_len: None,
        })
    }

    /// Shorten commit hashes to a fixed prefix. Prefixes must stay
    /// unique within the repository; 7 characters is enough in
    /// practice.
    pub fn short_hashes(mut self, len: usize) -> Self {
        self.short_len = Some(len);
        self
    }

    /// Materialize the full snapshot the graph builder consumes.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::default();

        // HEAD identifies the default branch; detached HEAD leaves no
        // head flagged and the builder falls back to the first one.
        let default_name = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.shorthand().map(str::to_string));

        let mut seen = HashSet::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()? else { continue };
            let Some(target) = branch.get().target() else {
                continue;
            };

            snapshot.heads.push(BranchHead::new(
                name,
                self.short(&target.to_string()),
                Some(name) == default_name.as_deref(),
            ));

            let mut revwalk = self.repo.revwalk()?;
            revwalk.push(target)?;
            for oid in revwalk {
                let oid = oid?;
                if !seen.insert(oid) {
                    continue;
                }
                let commit = self.repo.find_commit(oid)?;
                snapshot.commits.push(self.commit_record(&commit)?);
            }
        }
        debug!(
            commits = snapshot.commits.len(),
            heads = snapshot.heads.len(),
            "walked repository"
        );

        // Tags, peeled to the commit they ultimately point at
        for reference in self.repo.references_glob("refs/tags/*")? {
            let reference = reference?;
            let Some(name) = reference.shorthand().map(str::to_string) else {
                continue;
            };
            if let Ok(commit) = reference.peel_to_commit() {
                snapshot
                    .tags
                    .push((self.short(&commit.id().to_string()), name));
            }
        }

        Ok(snapshot)
    }

    /// Convert a git2 commit into the builder's record form.
    fn commit_record(&self, commit: &git2::Commit) -> Result<Commit> {
        let id = self.short(&commit.id().to_string());
        let parents = commit
            .parent_ids()
            .map(|oid| self.short(&oid.to_string()))
            .collect();

        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .context("Invalid commit timestamp")?;

        let author = commit.author().name().unwrap_or("Unknown").to_string();
        let email = commit.author().email().unwrap_or("").to_string();

        let message = commit.message().unwrap_or("").trim().to_string();
        let subject = message.lines().next().unwrap_or("").to_string();
        let body = message
            .strip_prefix(subject.as_str())
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(Commit::new(id, parents, author, email, timestamp, subject, body))
    }

    fn short(&self, id: &str) -> String {
        match self.short_len {
            Some(len) if id.len() > len => id[..len].to_string(),
            _ => id.to_string(),
        }
    }
}

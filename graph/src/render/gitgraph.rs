use crate::emit::{BranchAnchor, CommitMeta, RenderSink};
use std::fmt::Write;

/// GitgraphJS template preamble shared by every rendered graph.
const TEMPLATE: &str = r##"
const gitgraph_template = GitgraphJS.templateExtend(GitgraphJS.TemplateName.Metro,
{
    colors: ["#fff", "#999", "#ccc", "#666"],
    tag: {
        color: "#000",
        font: "normal 10pt monospace",
    },
    branch: {
        lineWidth: 4,
        spacing: 20,
        label: {
            color: "#000",
            font: "normal 10pt monospace",
        },
    },
    commit: {
        dot: {
            size: 8,
        },
        spacing: 30,
        message: {
            color: "#fff",
            font: "normal 10pt monospace",
        },
    },
});
const gitgraph = GitgraphJS.createGitgraph(document.getElementById("gitGraphContainer"), {
    mode: "extended",
    template: gitgraph_template,
});
"##;

/// Sink that encodes the operation stream as GitgraphJS source text.
///
/// Branch names become JS variables (`b_<name>` with `-`, `.` and `/`
/// mapped to `_`); the `details`/`selected` hooks become per-commit
/// callback functions wired into the commit options.
pub struct GitgraphJsSink {
    out: String,
}

impl GitgraphJsSink {
    pub fn new() -> Self {
        Self {
            out: TEMPLATE.to_string(),
        }
    }

    /// Consume the sink and return the generated source.
    pub fn finish(self) -> String {
        self.out
    }

    fn branch_var(name: &str) -> String {
        format!("b_{}", name.replace(['-', '.', '/'], "_"))
    }

    fn commit_options(meta: &CommitMeta) -> String {
        format!(
            "{{subject: \"{subject}\", onMouseOver: show_commit_details_{id}, onMouseOut: hide_commit_details, onClick: commit_click_{id}, onMessageClick: commit_click_{id}, author: \"{author} <{email}>\", timestamp: \"{timestamp}\", hash: \"{id}\", tag: \"{tag}\"}}",
            subject = js_str(&meta.subject),
            id = meta.id,
            author = js_str(&meta.author),
            email = js_str(&meta.email),
            timestamp = meta.timestamp,
            tag = meta.tag.as_deref().map(js_str).unwrap_or_default(),
        )
    }
}

impl Default for GitgraphJsSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for GitgraphJsSink {
    fn create_branch(&mut self, name: &str, anchor: &BranchAnchor) {
        let parent_var = match anchor {
            BranchAnchor::Root => "gitgraph".to_string(),
            BranchAnchor::Branch(parent) => Self::branch_var(parent),
        };
        let _ = writeln!(
            self.out,
            "const {} = {}.branch(\"{}\");",
            Self::branch_var(name),
            parent_var,
            js_str(name),
        );
    }

    fn commit(&mut self, branch: &str, meta: &CommitMeta) {
        let _ = writeln!(
            self.out,
            "{}.commit({});",
            Self::branch_var(branch),
            Self::commit_options(meta),
        );
    }

    fn merge(&mut self, receiving: &str, source: &str, meta: &CommitMeta) {
        let tag_call = meta
            .tag
            .as_deref()
            .map(|t| format!(".tag(\"{}\")", js_str(t)))
            .unwrap_or_default();
        let _ = writeln!(
            self.out,
            "{}.merge({{branch: {}, commitOptions: {}}}){};",
            Self::branch_var(receiving),
            Self::branch_var(source),
            Self::commit_options(meta),
            tag_call,
        );
    }

    fn details(&mut self, meta: &CommitMeta) {
        let mut tooltip = format!(
            "{}\n{}\non {}\n\n{}",
            meta.author, meta.email, meta.timestamp, meta.subject
        );
        if !meta.body.is_empty() {
            tooltip.push_str("\n\n");
            tooltip.push_str(&meta.body);
        }
        let _ = writeln!(
            self.out,
            "function show_commit_details_{}() {{\n    show_commit_details(`{}`)\n}}",
            meta.id,
            tooltip.replace('`', "'"),
        );
    }

    fn selected(&mut self, id: &str) {
        let _ = writeln!(
            self.out,
            "function commit_click_{id}() {{\n    commit_click(\"{id}\")\n}}",
        );
    }
}

/// Escape a value for embedding in a double-quoted JS string.
fn js_str(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn meta(id: &str, tag: Option<&str>) -> CommitMeta {
        CommitMeta {
            id: id.to_string(),
            subject: format!("commit {id}"),
            body: String::new(),
            author: "Author".to_string(),
            email: "author@example.com".to_string(),
            timestamp: Utc.timestamp_opt(0, 0).single().unwrap(),
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn root_branch_uses_gitgraph_anchor() {
        let mut sink = GitgraphJsSink::new();
        sink.create_branch("main", &BranchAnchor::Root);
        assert!(sink
            .finish()
            .contains("const b_main = gitgraph.branch(\"main\");"));
    }

    #[test]
    fn forked_branch_uses_parent_variable() {
        let mut sink = GitgraphJsSink::new();
        sink.create_branch("feature", &BranchAnchor::Branch("main".to_string()));
        assert!(sink
            .finish()
            .contains("const b_feature = b_main.branch(\"feature\");"));
    }

    #[test]
    fn branch_names_are_mangled_into_identifiers() {
        assert_eq!(
            GitgraphJsSink::branch_var("feature/x-y.z"),
            "b_feature_x_y_z"
        );
    }

    #[test]
    fn commit_references_callback_functions() {
        let mut sink = GitgraphJsSink::new();
        let m = meta("abc1234", None);
        sink.details(&m);
        sink.selected(&m.id);
        sink.commit("main", &m);

        let out = sink.finish();
        assert!(out.contains("function show_commit_details_abc1234()"));
        assert!(out.contains("function commit_click_abc1234()"));
        assert!(out.contains("b_main.commit({subject: \"commit abc1234\""));
        assert!(out.contains("onMouseOver: show_commit_details_abc1234"));
    }

    #[test]
    fn tagged_merge_appends_tag_call() {
        let mut sink = GitgraphJsSink::new();
        sink.merge("main", "feature", &meta("abc1234", Some("v1.0")));

        let out = sink.finish();
        assert!(out.contains("b_main.merge({branch: b_feature, commitOptions:"));
        assert!(out.ends_with(".tag(\"v1.0\");\n"));
    }
}
